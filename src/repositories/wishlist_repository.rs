//! Repositorio de wishlist
//!
//! La pertenencia (usuario, vehículo) es única por la restricción
//! `uq_wishlist_user_vehicle`; el toggle se apoya en ella en vez de leer
//! antes de escribir.

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    models::wishlist::{WishlistEntry, WishlistItem, WishlistToggle},
    utils::errors::AppError,
};

/// Intentos de alta/baja antes de rendirse ante toggles concurrentes
const MAX_TOGGLE_ATTEMPTS: usize = 8;

pub struct WishlistRepository {
    pool: PgPool,
}

impl WishlistRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Alterna la pertenencia en una sola transacción.
    ///
    /// Cada intento inserta o borra; si un toggle concurrente ya borró la
    /// fila, el `DELETE` no afecta a nada y se vuelve a intentar el alta, así
    /// que cada llamada cambia el estado exactamente una vez.
    pub async fn toggle(&self, user_id: Uuid, vehicle_id: Uuid) -> Result<WishlistToggle, AppError> {
        let mut tx = self.pool.begin().await?;

        for _ in 0..MAX_TOGGLE_ATTEMPTS {
            let inserted: Option<Uuid> = sqlx::query_scalar(
                r#"
                INSERT INTO wishlist_items (id, user_id, vehicle_id)
                VALUES ($1, $2, $3)
                ON CONFLICT (user_id, vehicle_id) DO NOTHING
                RETURNING id
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(vehicle_id)
            .fetch_optional(&mut *tx)
            .await?;

            if inserted.is_some() {
                tx.commit().await?;
                return Ok(WishlistToggle::Added);
            }

            let deleted =
                sqlx::query("DELETE FROM wishlist_items WHERE user_id = $1 AND vehicle_id = $2")
                    .bind(user_id)
                    .bind(vehicle_id)
                    .execute(&mut *tx)
                    .await?;

            if deleted.rows_affected() > 0 {
                tx.commit().await?;
                return Ok(WishlistToggle::Removed);
            }
        }

        tracing::warn!(%user_id, %vehicle_id, "Wishlist toggle kept racing, giving up");
        Err(AppError::Conflict(
            "Wishlist entry is being modified concurrently, try again".to_string(),
        ))
    }

    /// Alta explícita; `None` si el par ya existía
    pub async fn add(&self, user_id: Uuid, vehicle_id: Uuid) -> Result<Option<WishlistItem>, AppError> {
        let item = sqlx::query_as::<_, WishlistItem>(
            r#"
            INSERT INTO wishlist_items (id, user_id, vehicle_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, vehicle_id) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(vehicle_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Baja explícita; `false` si el par no existía
    pub async fn remove(&self, user_id: Uuid, vehicle_id: Uuid) -> Result<bool, AppError> {
        let result =
            sqlx::query("DELETE FROM wishlist_items WHERE user_id = $1 AND vehicle_id = $2")
                .bind(user_id)
                .bind(vehicle_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Wishlist del usuario, solo vehículos activos, lo más reciente primero
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<WishlistEntry>, AppError> {
        let entries = sqlx::query_as::<_, WishlistEntry>(
            r#"
            SELECT w.id AS wishlist_id, w.added_at,
                   v.id, v.title, v.year, v.price, v.fuel_type, v.transmission, v.mileage,
                   v.body_type, v.color, v.created_at,
                   u.username AS created_by_username,
                   (SELECT vi.image_url FROM vehicle_images vi
                     WHERE vi.vehicle_id = v.id
                     ORDER BY vi.is_primary DESC, vi.uploaded_at ASC, vi.id ASC
                     LIMIT 1) AS primary_image,
                   TRUE AS is_wishlisted
            FROM wishlist_items w
            JOIN vehicles v ON v.id = w.vehicle_id
            JOIN users u ON u.id = v.created_by
            WHERE w.user_id = $1 AND v.status = 'active'
            ORDER BY w.added_at DESC, w.id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
