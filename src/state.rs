//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum. Solo contiene el pool y configuración
//! inmutable: ninguna petición deja estado en memoria.

use sqlx::PgPool;
use std::sync::Arc;

use crate::{
    config::environment::EnvironmentConfig, services::media_storage::MediaStorage,
    utils::jwt::JwtConfig,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<EnvironmentConfig>,
    pub jwt: JwtConfig,
    pub media: MediaStorage,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        let jwt = JwtConfig::from(&config);
        let media = MediaStorage::from_config(&config);
        Self {
            pool,
            config: Arc::new(config),
            jwt,
            media,
        }
    }
}
