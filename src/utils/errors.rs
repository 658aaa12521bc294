//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{BytesRejection, JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("JWT error: {0}")]
    Jwt(String),

    #[error("Hash error: {0}")]
    Hash(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    code: String,
}

impl ErrorResponse {
    fn new(error: &str, message: String, code: &str) -> Self {
        Self {
            error: error.to_string(),
            message,
            details: None,
            code: code.to_string(),
        }
    }
}

impl AppError {
    /// Código HTTP asociado a cada variante
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Internal(_) | AppError::Hash(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) | AppError::Jwt(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_response = match self {
            AppError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                ErrorResponse::new(
                    "Database Error",
                    "An error occurred while accessing the database".to_string(),
                    "DB_ERROR",
                )
            }

            AppError::Validation(e) => {
                tracing::debug!(error = %e, "Validation error");
                ErrorResponse {
                    details: Some(json!(e)),
                    ..ErrorResponse::new(
                        "Validation Error",
                        "The provided data is invalid".to_string(),
                        "VALIDATION_ERROR",
                    )
                }
            }

            AppError::Unauthorized(msg) => {
                tracing::warn!("Unauthorized access: {}", msg);
                ErrorResponse::new("Unauthorized", msg, "UNAUTHORIZED")
            }

            // Los fallos de token se reportan igual que cualquier otro 401
            AppError::Jwt(msg) => {
                tracing::warn!("JWT error: {}", msg);
                ErrorResponse::new(
                    "Unauthorized",
                    "Invalid or expired token".to_string(),
                    "UNAUTHORIZED",
                )
            }

            AppError::Forbidden(msg) => {
                tracing::warn!("Forbidden access: {}", msg);
                ErrorResponse::new("Forbidden", msg, "FORBIDDEN")
            }

            AppError::NotFound(msg) => {
                tracing::debug!("Resource not found: {}", msg);
                ErrorResponse::new("Not Found", msg, "NOT_FOUND")
            }

            AppError::Conflict(msg) => {
                tracing::debug!("Conflict: {}", msg);
                ErrorResponse::new("Conflict", msg, "CONFLICT")
            }

            AppError::BadRequest(msg) => {
                tracing::debug!("Bad request: {}", msg);
                ErrorResponse::new("Bad Request", msg, "BAD_REQUEST")
            }

            AppError::PayloadTooLarge(msg) => {
                tracing::debug!("Payload too large: {}", msg);
                ErrorResponse::new("Payload Too Large", msg, "PAYLOAD_TOO_LARGE")
            }

            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                ErrorResponse::new(
                    "Internal Server Error",
                    "An unexpected error occurred".to_string(),
                    "INTERNAL_ERROR",
                )
            }

            AppError::Hash(msg) => {
                tracing::error!("Hash error: {}", msg);
                ErrorResponse::new(
                    "Internal Server Error",
                    "An error occurred while processing credentials".to_string(),
                    "HASH_ERROR",
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<BytesRejection> for AppError {
    fn from(rejection: BytesRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(rejection.body_text())
        } else {
            AppError::BadRequest(rejection.body_text())
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartError> for AppError {
    fn from(error: MultipartError) -> Self {
        if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(error.body_text())
        } else {
            AppError::BadRequest(error.body_text())
        }
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de validación
pub fn validation_error(field: &'static str, message: &'static str) -> AppError {
    use validator::ValidationError;

    let mut error = ValidationError::new("custom");
    error.message = Some(message.into());

    let mut errors = validator::ValidationErrors::new();
    errors.add(field, error);

    AppError::Validation(errors)
}

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Convierte una violación de unicidad de PostgreSQL en `Conflict`
pub fn map_unique_violation(err: sqlx::Error, message: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::Conflict(message.to_string())
        }
        _ => AppError::Database(err),
    }
}
