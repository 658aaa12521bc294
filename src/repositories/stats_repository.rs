//! Repositorio de estadísticas del catálogo

use sqlx::PgPool;

use crate::{models::stats::CatalogStats, utils::errors::AppError};

pub struct StatsRepository {
    pool: PgPool,
}

impl StatsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Totales en una sola consulta. Wishlist e imágenes solo cuentan las de
    /// vehículos activos, igual que `total_vehicles`.
    pub async fn totals(&self) -> Result<CatalogStats, AppError> {
        let stats = sqlx::query_as::<_, CatalogStats>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM vehicles WHERE status = 'active') AS total_vehicles,
                (SELECT COUNT(*) FROM wishlist_items w
                   JOIN vehicles v ON v.id = w.vehicle_id
                  WHERE v.status = 'active') AS total_wishlists,
                (SELECT COUNT(*) FROM vehicle_images vi
                   JOIN vehicles v ON v.id = vi.vehicle_id
                  WHERE v.status = 'active') AS total_images,
                (SELECT COUNT(*) FROM gallery_images WHERE is_active) AS total_gallery_images,
                (SELECT COUNT(*) FROM users) AS total_users
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(stats)
    }
}
