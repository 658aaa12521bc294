//! Estadísticas agregadas del catálogo

use sqlx::FromRow;

/// Totales calculados en una sola consulta
#[derive(Debug, Clone, FromRow)]
pub struct CatalogStats {
    pub total_vehicles: i64,
    pub total_wishlists: i64,
    pub total_images: i64,
    pub total_gallery_images: i64,
    pub total_users: i64,
}
