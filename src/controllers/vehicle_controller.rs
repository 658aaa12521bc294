//! Controlador de vehículos
//!
//! Cada escritura carga primero el vehículo (404 si no existe o está
//! borrado) y después consulta [`authorize`]. El cuerpo se interpreta solo
//! cuando la petición ya está autorizada.

use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::vehicle_dto::{
        CreateVehicleRequest, UpdateVehicleRequest, VehicleDetailResponse, VehicleListItem,
        VehicleListQuery,
    },
    middleware::auth::AuthenticatedUser,
    models::vehicle::VehicleWithOwner,
    repositories::{
        vehicle_image_repository::VehicleImageRepository, vehicle_repository::VehicleRepository,
    },
    services::{
        authorization_service::{authorize, Action, Resource},
        media_storage::MediaStorage,
    },
    state::AppState,
    utils::{
        errors::{not_found_error, AppError},
        extract::Payload,
    },
};

/// Campo multipart con las imágenes del vehículo
const UPLOAD_FIELD: &str = "uploaded_images";

pub struct VehicleController {
    repository: VehicleRepository,
    images: VehicleImageRepository,
    media: MediaStorage,
}

impl VehicleController {
    pub fn new(state: &AppState) -> Self {
        Self {
            repository: VehicleRepository::new(state.pool.clone()),
            images: VehicleImageRepository::new(state.pool.clone()),
            media: state.media.clone(),
        }
    }

    pub async fn list(
        &self,
        actor: &AuthenticatedUser,
        query: VehicleListQuery,
    ) -> Result<Vec<VehicleListItem>, AppError> {
        authorize(actor, Action::Read, Resource::Vehicle, None)?;

        let filter = query.into_filter()?;
        let vehicles = self.repository.list(&filter, actor.user_id).await?;

        Ok(vehicles.into_iter().map(VehicleListItem::from).collect())
    }

    pub async fn get_by_id(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
    ) -> Result<VehicleDetailResponse, AppError> {
        authorize(actor, Action::Read, Resource::Vehicle, None)?;
        self.detail(id, actor.user_id).await
    }

    pub async fn create(
        &self,
        actor: &AuthenticatedUser,
        payload: Payload,
    ) -> Result<VehicleDetailResponse, AppError> {
        authorize(actor, Action::Create, Resource::Vehicle, None)?;
        let (request, uploads) = payload
            .into_request::<CreateVehicleRequest>(UPLOAD_FIELD)
            .await?;
        request.validate()?;

        let (new_vehicle, mut image_urls) = request.into_parts();
        let stored = self.media.store_all(&uploads).await?;
        image_urls.extend(stored.iter().cloned());

        let (vehicle, images) = match self
            .repository
            .create_with_images(&new_vehicle, actor.user_id, image_urls)
            .await
        {
            Ok(created) => created,
            Err(e) => {
                self.media.remove_all(&stored).await;
                return Err(e);
            }
        };

        tracing::info!(
            vehicle_id = %vehicle.id,
            user_id = %actor.user_id,
            images = images.len(),
            "🚗 Vehículo creado"
        );

        let detail = VehicleWithOwner {
            vehicle,
            created_by_username: actor.username.clone(),
            is_wishlisted: false,
        };
        Ok(VehicleDetailResponse::new(detail, images))
    }

    pub async fn update(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        payload: Payload,
    ) -> Result<VehicleDetailResponse, AppError> {
        let vehicle = self
            .repository
            .find_active(id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))?;

        authorize(actor, Action::Update, Resource::Vehicle, Some(vehicle.created_by))?;
        let (request, uploads) = payload
            .into_request::<UpdateVehicleRequest>(UPLOAD_FIELD)
            .await?;
        request.validate()?;

        let (changes, mut image_urls) = request.into_parts();
        let stored = self.media.store_all(&uploads).await?;
        image_urls.extend(stored.iter().cloned());

        let updated = match self
            .repository
            .update_with_images(id, &changes, image_urls)
            .await
        {
            Ok(Some(updated)) => updated,
            Ok(None) => {
                self.media.remove_all(&stored).await;
                return Err(not_found_error("Vehicle", &id.to_string()));
            }
            Err(e) => {
                self.media.remove_all(&stored).await;
                return Err(e);
            }
        };

        tracing::info!(vehicle_id = %id, user_id = %actor.user_id, new_images = updated.1.len(), "✏️ Vehículo actualizado");

        self.detail(id, actor.user_id).await
    }

    /// Borrado lógico del vehículo
    pub async fn delete(&self, actor: &AuthenticatedUser, id: Uuid) -> Result<(), AppError> {
        let vehicle = self
            .repository
            .find_active(id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))?;

        authorize(actor, Action::Delete, Resource::Vehicle, Some(vehicle.created_by))?;

        if !self.repository.soft_delete(id).await? {
            return Err(not_found_error("Vehicle", &id.to_string()));
        }

        tracing::info!(vehicle_id = %id, user_id = %actor.user_id, "🗑️ Vehículo eliminado");
        Ok(())
    }

    async fn detail(&self, id: Uuid, actor_id: Uuid) -> Result<VehicleDetailResponse, AppError> {
        let detail = self
            .repository
            .find_active_detail(id, actor_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))?;
        let images = self.images.list_for_vehicle(id).await?;

        Ok(VehicleDetailResponse::new(detail, images))
    }
}
