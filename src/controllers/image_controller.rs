//! Controlador de imágenes de vehículo

use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::image_dto::{AttachImageRequest, VehicleImageResponse},
    middleware::auth::AuthenticatedUser,
    models::{vehicle::Vehicle, vehicle_image::NewVehicleImage},
    repositories::{
        vehicle_image_repository::VehicleImageRepository, vehicle_repository::VehicleRepository,
    },
    services::{
        authorization_service::{authorize, Action, Resource},
        media_storage::MediaStorage,
    },
    state::AppState,
    utils::{
        errors::{not_found_error, validation_error, AppError},
        extract::Payload,
    },
};

pub struct ImageController {
    vehicles: VehicleRepository,
    repository: VehicleImageRepository,
    media: MediaStorage,
}

impl ImageController {
    pub fn new(state: &AppState) -> Self {
        Self {
            vehicles: VehicleRepository::new(state.pool.clone()),
            repository: VehicleImageRepository::new(state.pool.clone()),
            media: state.media.clone(),
        }
    }

    async fn load_vehicle(&self, vehicle_id: Uuid) -> Result<Vehicle, AppError> {
        self.vehicles
            .find_active(vehicle_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &vehicle_id.to_string()))
    }

    pub async fn list(
        &self,
        actor: &AuthenticatedUser,
        vehicle_id: Uuid,
    ) -> Result<Vec<VehicleImageResponse>, AppError> {
        self.load_vehicle(vehicle_id).await?;
        authorize(actor, Action::Read, Resource::VehicleImage, None)?;

        let images = self.repository.list_for_vehicle(vehicle_id).await?;
        Ok(images.into_iter().map(VehicleImageResponse::from).collect())
    }

    /// Añade una imagen. Con `is_primary` la anterior principal deja de serlo.
    pub async fn attach(
        &self,
        actor: &AuthenticatedUser,
        vehicle_id: Uuid,
        payload: Payload,
    ) -> Result<VehicleImageResponse, AppError> {
        let vehicle = self.load_vehicle(vehicle_id).await?;
        authorize(actor, Action::Create, Resource::VehicleImage, Some(vehicle.created_by))?;
        let (request, uploads) = payload.into_request::<AttachImageRequest>("image").await?;
        request.validate()?;

        let (image_url, stored) = match (uploads.into_iter().next(), request.image_url) {
            (Some(bytes), _) => {
                let url = self.media.store(&bytes).await?;
                (url.clone(), Some(url))
            }
            (None, Some(url)) => (url, None),
            (None, None) => return Err(validation_error("image", "No image was submitted.")),
        };

        let new_image = NewVehicleImage {
            image_url,
            is_primary: request.is_primary,
        };

        let image = match self.repository.attach(vehicle_id, &[new_image]).await {
            Ok(mut inserted) if !inserted.is_empty() => inserted.remove(0),
            Ok(_) => return Err(AppError::Internal("Image insert returned no rows".to_string())),
            Err(e) => {
                if let Some(url) = &stored {
                    self.media.remove(url).await;
                }
                return Err(e);
            }
        };

        tracing::info!(
            vehicle_id = %vehicle_id,
            image_id = %image.id,
            is_primary = image.is_primary,
            "🖼️ Imagen añadida"
        );

        Ok(VehicleImageResponse::from(image))
    }

    pub async fn set_primary(
        &self,
        actor: &AuthenticatedUser,
        vehicle_id: Uuid,
        image_id: Uuid,
    ) -> Result<VehicleImageResponse, AppError> {
        let vehicle = self.load_vehicle(vehicle_id).await?;
        self.repository
            .find(vehicle_id, image_id)
            .await?
            .ok_or_else(|| not_found_error("Image", &image_id.to_string()))?;

        authorize(actor, Action::Update, Resource::VehicleImage, Some(vehicle.created_by))?;

        let image = self.repository.set_primary(vehicle_id, image_id).await?;

        tracing::info!(vehicle_id = %vehicle_id, image_id = %image_id, "⭐ Imagen principal cambiada");
        Ok(VehicleImageResponse::from(image))
    }

    /// Borra la imagen y, si ya nadie lo usa, su fichero local.
    /// Borrar la principal deja el vehículo sin principal hasta que se promueva otra.
    pub async fn delete(
        &self,
        actor: &AuthenticatedUser,
        vehicle_id: Uuid,
        image_id: Uuid,
    ) -> Result<(), AppError> {
        let vehicle = self.load_vehicle(vehicle_id).await?;
        self.repository
            .find(vehicle_id, image_id)
            .await?
            .ok_or_else(|| not_found_error("Image", &image_id.to_string()))?;

        authorize(actor, Action::Delete, Resource::VehicleImage, Some(vehicle.created_by))?;

        let image = self
            .repository
            .delete(vehicle_id, image_id)
            .await?
            .ok_or_else(|| not_found_error("Image", &image_id.to_string()))?;

        // El fichero puede estar compartido con otra fila
        if !self.repository.url_in_use(&image.image_url).await? {
            self.media.remove(&image.image_url).await;
        }

        tracing::info!(vehicle_id = %vehicle_id, image_id = %image_id, "🗑️ Imagen eliminada");
        Ok(())
    }
}
