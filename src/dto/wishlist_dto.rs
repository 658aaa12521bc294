//! DTOs de wishlist

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    dto::vehicle_dto::VehicleListItem,
    models::wishlist::{WishlistEntry, WishlistItem, WishlistToggle},
};

#[derive(Debug, Deserialize)]
pub struct AddToWishlistRequest {
    pub vehicle_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct WishlistItemResponse {
    pub id: Uuid,
    pub vehicle: VehicleListItem,
    pub added_at: DateTime<Utc>,
}

impl From<WishlistEntry> for WishlistItemResponse {
    fn from(entry: WishlistEntry) -> Self {
        Self {
            id: entry.wishlist_id,
            vehicle: VehicleListItem::from(entry.vehicle),
            added_at: entry.added_at,
        }
    }
}

/// Alta explícita en la wishlist
#[derive(Debug, Serialize)]
pub struct WishlistAddedResponse {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub added_at: DateTime<Utc>,
}

impl From<WishlistItem> for WishlistAddedResponse {
    fn from(item: WishlistItem) -> Self {
        Self {
            id: item.id,
            vehicle_id: item.vehicle_id,
            added_at: item.added_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WishlistToggleResponse {
    pub message: String,
    pub is_wishlisted: bool,
}

impl From<WishlistToggle> for WishlistToggleResponse {
    fn from(toggle: WishlistToggle) -> Self {
        let message = match toggle {
            WishlistToggle::Added => "Added to wishlist",
            WishlistToggle::Removed => "Removed from wishlist",
        };
        Self {
            message: message.to_string(),
            is_wishlisted: toggle.is_wishlisted(),
        }
    }
}
