//! Modelo de Gallery
//!
//! Imágenes independientes de los vehículos, con propietario y borrado lógico.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Imagen de galería - mapea a la tabla gallery_images
#[derive(Debug, Clone, FromRow)]
pub struct GalleryImage {
    pub id: Uuid,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: String,
    pub uploaded_by: Uuid,
    pub uploaded_at: DateTime<Utc>,
    pub is_active: bool,
}

/// Imagen de galería con el nombre de quien la subió
#[derive(Debug, Clone, FromRow)]
pub struct GalleryImageWithOwner {
    #[sqlx(flatten)]
    pub image: GalleryImage,
    pub uploaded_by_username: String,
}

/// Datos de una imagen de galería nueva
#[derive(Debug, Clone)]
pub struct NewGalleryImage {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: String,
}
