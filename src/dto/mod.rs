//! DTOs de la API
//!
//! Requests validados con `validator` y responses serializables. Los DTOs
//! que aceptan `multipart/form-data` implementan [`FromForm`].

pub mod auth_dto;
pub mod gallery_dto;
pub mod image_dto;
pub mod stats_dto;
pub mod vehicle_dto;
pub mod wishlist_dto;

use serde::Serialize;

use crate::utils::{errors::AppResult, multipart::FormData};

/// Construcción de un request a partir de un formulario multipart
pub trait FromForm: Sized {
    fn from_form(form: &FormData) -> AppResult<Self>;
}

// Response genérica
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }
}

/// Respuesta con solo un mensaje
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
