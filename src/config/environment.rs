//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use anyhow::{bail, Context, Result};
use std::{env, path::PathBuf, str::FromStr};

/// Secreto usado solo fuera de producción cuando `JWT_SECRET` no está definido
const DEVELOPMENT_JWT_SECRET: &str = "development-only-jwt-secret";

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub jwt_secret: String,
    /// Vida de los tokens en segundos
    pub jwt_expiration: u64,
    pub cors_origins: Vec<String>,
    pub allow_admin_registration: bool,
    pub media_root: PathBuf,
    pub media_base_url: String,
    pub media_max_file_size: usize,
    pub max_body_size: usize,
    pub request_timeout_secs: u64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 8000,
            host: "0.0.0.0".to_string(),
            jwt_secret: DEVELOPMENT_JWT_SECRET.to_string(),
            jwt_expiration: 86_400,
            cors_origins: Vec::new(),
            allow_admin_registration: false,
            media_root: PathBuf::from("media"),
            media_base_url: "/media".to_string(),
            media_max_file_size: 5 * 1024 * 1024,
            max_body_size: 25 * 1024 * 1024,
            request_timeout_secs: 30,
        }
    }
}

impl EnvironmentConfig {
    /// Cargar configuración desde variables de entorno, con valores por defecto
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let environment = env::var("ENVIRONMENT").unwrap_or(defaults.environment);

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ if environment == "production" => {
                bail!("JWT_SECRET must be set in production")
            }
            _ => {
                tracing::warn!("⚠️ JWT_SECRET not set, using development secret");
                defaults.jwt_secret
            }
        };

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            port: parse_var("PORT", defaults.port)?,
            host: env::var("HOST").unwrap_or(defaults.host),
            jwt_secret,
            jwt_expiration: parse_var("JWT_EXPIRATION", defaults.jwt_expiration)?,
            cors_origins,
            allow_admin_registration: parse_var(
                "ALLOW_ADMIN_REGISTRATION",
                defaults.allow_admin_registration,
            )?,
            media_root: env::var("MEDIA_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.media_root),
            media_base_url: env::var("MEDIA_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.media_base_url),
            media_max_file_size: parse_var("MEDIA_MAX_FILE_SIZE", defaults.media_max_file_size)?,
            max_body_size: parse_var("MAX_BODY_SIZE", defaults.max_body_size)?,
            request_timeout_secs: parse_var("REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs)?,
            environment,
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Lee una variable opcional; si está definida debe ser válida
fn parse_var<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid value, got '{}'", key, raw)),
        Err(_) => Ok(default),
    }
}
