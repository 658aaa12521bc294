//! Middleware de CORS
//!
//! Este módulo maneja la configuración de CORS para permitir
//! requests desde diferentes orígenes.

use axum::http::{header, HeaderValue, Method};
use std::time::Duration;
use tower_http::cors::CorsLayer;

use crate::config::EnvironmentConfig;

/// CORS según la configuración: permisivo en desarrollo sin orígenes
/// configurados, lista explícita en cualquier otro caso.
pub fn cors_layer(config: &EnvironmentConfig) -> CorsLayer {
    if config.cors_origins.is_empty() && config.is_development() {
        CorsLayer::very_permissive()
    } else {
        cors_middleware_with_origins(&config.cors_origins)
    }
}

/// Crear middleware de CORS con orígenes específicos
pub fn cors_middleware_with_origins(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
