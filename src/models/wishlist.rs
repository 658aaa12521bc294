//! Modelo de Wishlist
//!
//! Unión (usuario, vehículo). La existencia de la fila es la pertenencia.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::vehicle::VehicleSummary;

/// Entrada de wishlist - mapea a la tabla wishlist_items
#[derive(Debug, Clone, FromRow)]
pub struct WishlistItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub vehicle_id: Uuid,
    pub added_at: DateTime<Utc>,
}

/// Entrada de wishlist junto al resumen del vehículo
#[derive(Debug, Clone, FromRow)]
pub struct WishlistEntry {
    pub wishlist_id: Uuid,
    pub added_at: DateTime<Utc>,
    #[sqlx(flatten)]
    pub vehicle: VehicleSummary,
}

/// Resultado de alternar la pertenencia de un vehículo en la wishlist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WishlistToggle {
    Added,
    Removed,
}

impl WishlistToggle {
    pub fn is_wishlisted(&self) -> bool {
        matches!(self, WishlistToggle::Added)
    }
}
