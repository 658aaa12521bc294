//! DTOs de la galería

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::FromForm,
    models::gallery::GalleryImageWithOwner,
    utils::{
        errors::{validation_error, AppResult},
        multipart::FormData,
        validation::validate_image_url,
    },
};

pub const DEFAULT_SAMPLE_SIZE: usize = 50;
pub const MAX_SAMPLE_SIZE: usize = 200;

#[derive(Debug, Default, Deserialize)]
pub struct GalleryQuery {
    pub limit: Option<String>,
}

impl GalleryQuery {
    /// Tamaño de la muestra: 50 por defecto, como máximo 200
    pub fn sample_size(&self) -> AppResult<usize> {
        match self.limit.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            None => Ok(DEFAULT_SAMPLE_SIZE),
            Some(raw) => raw
                .parse::<usize>()
                .map(|limit| limit.min(MAX_SAMPLE_SIZE))
                .map_err(|_| validation_error("limit", "A valid integer is required.")),
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateGalleryImageRequest {
    #[validate(length(max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(custom = "validate_image_url")]
    pub image_url: Option<String>,
}

impl FromForm for CreateGalleryImageRequest {
    fn from_form(form: &FormData) -> AppResult<Self> {
        Ok(Self {
            title: form.text("title").map(str::to_string),
            description: form.text("description").map(str::to_string),
            image_url: form.text("image_url").map(str::to_string),
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateGalleryImageRequest {
    #[validate(length(max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
}

impl FromForm for UpdateGalleryImageRequest {
    fn from_form(form: &FormData) -> AppResult<Self> {
        Ok(Self {
            title: form.text("title").map(str::to_string),
            description: form.text("description").map(str::to_string),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct GalleryImageResponse {
    pub id: Uuid,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: String,
    pub uploaded_by: Uuid,
    pub uploaded_by_username: String,
    pub uploaded_at: DateTime<Utc>,
    pub is_active: bool,
}

impl From<GalleryImageWithOwner> for GalleryImageResponse {
    fn from(row: GalleryImageWithOwner) -> Self {
        let image = row.image;
        Self {
            id: image.id,
            title: image.title,
            description: image.description,
            image_url: image.image_url,
            uploaded_by: image.uploaded_by,
            uploaded_by_username: row.uploaded_by_username,
            uploaded_at: image.uploaded_at,
            is_active: image.is_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(limit: Option<&str>) -> GalleryQuery {
        GalleryQuery {
            limit: limit.map(str::to_string),
        }
    }

    #[test]
    fn test_sample_size_defaults_and_clamps() {
        assert_eq!(query(None).sample_size().unwrap(), 50);
        assert_eq!(query(Some("")).sample_size().unwrap(), 50);
        assert_eq!(query(Some("10")).sample_size().unwrap(), 10);
        assert_eq!(query(Some("0")).sample_size().unwrap(), 0);
        assert_eq!(query(Some("1000")).sample_size().unwrap(), 200);
    }

    #[test]
    fn test_sample_size_rejects_garbage() {
        assert!(query(Some("-3")).sample_size().is_err());
        assert!(query(Some("many")).sample_size().is_err());
    }
}
