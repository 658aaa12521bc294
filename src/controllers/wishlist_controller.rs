//! Controlador de wishlist
//!
//! La wishlist siempre es la del actor; nunca se recibe un `user_id`.

use uuid::Uuid;

use crate::{
    dto::wishlist_dto::{
        AddToWishlistRequest, WishlistAddedResponse, WishlistItemResponse, WishlistToggleResponse,
    },
    middleware::auth::AuthenticatedUser,
    models::wishlist::WishlistToggle,
    repositories::{vehicle_repository::VehicleRepository, wishlist_repository::WishlistRepository},
    services::authorization_service::{authorize, Action, Resource},
    state::AppState,
    utils::errors::{not_found_error, AppError},
};

pub struct WishlistController {
    repository: WishlistRepository,
    vehicles: VehicleRepository,
}

impl WishlistController {
    pub fn new(state: &AppState) -> Self {
        Self {
            repository: WishlistRepository::new(state.pool.clone()),
            vehicles: VehicleRepository::new(state.pool.clone()),
        }
    }

    async fn ensure_active_vehicle(&self, vehicle_id: Uuid) -> Result<(), AppError> {
        self.vehicles
            .find_active(vehicle_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| not_found_error("Vehicle", &vehicle_id.to_string()))
    }

    pub async fn list(
        &self,
        actor: &AuthenticatedUser,
    ) -> Result<Vec<WishlistItemResponse>, AppError> {
        authorize(actor, Action::Read, Resource::Wishlist, Some(actor.user_id))?;

        let entries = self.repository.list_for_user(actor.user_id).await?;
        Ok(entries.into_iter().map(WishlistItemResponse::from).collect())
    }

    pub async fn toggle(
        &self,
        actor: &AuthenticatedUser,
        vehicle_id: Uuid,
    ) -> Result<(WishlistToggle, WishlistToggleResponse), AppError> {
        self.ensure_active_vehicle(vehicle_id).await?;
        authorize(actor, Action::Update, Resource::Wishlist, Some(actor.user_id))?;

        let outcome = self.repository.toggle(actor.user_id, vehicle_id).await?;

        tracing::debug!(user_id = %actor.user_id, vehicle_id = %vehicle_id, ?outcome, "💛 Wishlist alternada");
        Ok((outcome, WishlistToggleResponse::from(outcome)))
    }

    pub async fn add(
        &self,
        actor: &AuthenticatedUser,
        request: AddToWishlistRequest,
    ) -> Result<WishlistAddedResponse, AppError> {
        self.ensure_active_vehicle(request.vehicle_id).await?;
        authorize(actor, Action::Create, Resource::Wishlist, Some(actor.user_id))?;

        let item = self
            .repository
            .add(actor.user_id, request.vehicle_id)
            .await?
            .ok_or_else(|| AppError::Conflict("Vehicle is already in your wishlist".to_string()))?;

        Ok(WishlistAddedResponse::from(item))
    }

    pub async fn remove(&self, actor: &AuthenticatedUser, vehicle_id: Uuid) -> Result<(), AppError> {
        authorize(actor, Action::Delete, Resource::Wishlist, Some(actor.user_id))?;

        if !self.repository.remove(actor.user_id, vehicle_id).await? {
            return Err(AppError::NotFound("Vehicle not in wishlist".to_string()));
        }
        Ok(())
    }
}
