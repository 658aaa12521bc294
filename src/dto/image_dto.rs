//! DTOs de imágenes de vehículo

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::FromForm,
    models::vehicle_image::VehicleImage,
    utils::{
        errors::{validation_error, AppResult},
        multipart::FormData,
        validation::{parse_form_bool, validate_image_url},
    },
};

/// Imagen nueva por URL (JSON) o por fichero `image` (multipart)
#[derive(Debug, Default, Deserialize, Validate)]
pub struct AttachImageRequest {
    #[validate(custom = "validate_image_url")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
}

impl FromForm for AttachImageRequest {
    fn from_form(form: &FormData) -> AppResult<Self> {
        let is_primary = match form.text("is_primary") {
            None => false,
            Some(raw) => parse_form_bool(raw)
                .ok_or_else(|| validation_error("is_primary", "Must be a valid boolean."))?,
        };

        Ok(Self {
            image_url: form.text("image_url").map(str::to_string),
            is_primary,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct VehicleImageResponse {
    pub id: Uuid,
    pub image_url: String,
    pub is_primary: bool,
    pub uploaded_at: DateTime<Utc>,
}

impl From<VehicleImage> for VehicleImageResponse {
    fn from(image: VehicleImage) -> Self {
        Self {
            id: image.id,
            image_url: image.image_url,
            is_primary: image.is_primary,
            uploaded_at: image.uploaded_at,
        }
    }
}
