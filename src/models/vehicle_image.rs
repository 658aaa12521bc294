//! Modelo de VehicleImage
//!
//! Imágenes asociadas a un vehículo. El contenido binario vive fuera de la
//! base de datos y se referencia por URL.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Imagen de vehículo - mapea a la tabla vehicle_images
#[derive(Debug, Clone, FromRow)]
pub struct VehicleImage {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub image_url: String,
    pub is_primary: bool,
    pub uploaded_at: DateTime<Utc>,
}

/// Imagen pendiente de insertar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVehicleImage {
    pub image_url: String,
    pub is_primary: bool,
}

impl NewVehicleImage {
    /// Marca como principal la primera imagen de un lote cuando el vehículo
    /// todavía no tiene ninguna.
    pub fn batch(urls: Vec<String>, vehicle_has_images: bool) -> Vec<Self> {
        urls.into_iter()
            .enumerate()
            .map(|(i, image_url)| Self {
                image_url,
                is_primary: !vehicle_has_images && i == 0,
            })
            .collect()
    }
}
