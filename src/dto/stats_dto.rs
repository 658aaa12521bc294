//! DTO de estadísticas

use serde::Serialize;

use crate::models::stats::CatalogStats;

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_vehicles: i64,
    pub total_wishlists: i64,
    pub total_images: i64,
    pub total_gallery_images: i64,
    pub total_users: i64,
}

impl From<CatalogStats> for StatsResponse {
    fn from(stats: CatalogStats) -> Self {
        Self {
            total_vehicles: stats.total_vehicles,
            total_wishlists: stats.total_wishlists,
            total_images: stats.total_images,
            total_gallery_images: stats.total_gallery_images,
            total_users: stats.total_users,
        }
    }
}
