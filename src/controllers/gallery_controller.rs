//! Controlador de la galería
//!
//! La lectura devuelve una muestra aleatoria de tamaño `min(limit, activas)`
//! sin cargar la tabla completa.

use rand::seq::{index, SliceRandom};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::gallery_dto::{
        CreateGalleryImageRequest, GalleryImageResponse, GalleryQuery, UpdateGalleryImageRequest,
    },
    middleware::auth::AuthenticatedUser,
    models::gallery::{GalleryImageWithOwner, NewGalleryImage},
    repositories::gallery_repository::GalleryRepository,
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

/// Elige `k` posiciones distintas en `0..available`, en orden aleatorio
pub fn sample_ranks(available: usize, limit: usize) -> Vec<i64> {
    let k = limit.min(available);
    let mut rng = rand::thread_rng();
    index::sample(&mut rng, available, k)
        .into_iter()
        .filter_map(|rank| i64::try_from(rank).ok())
        .collect()
}

pub struct GalleryController {
    repository: GalleryRepository,
    media: MediaStorage,
}

impl GalleryController {
    pub fn new(state: &AppState) -> Self {
        Self {
            repository: GalleryRepository::new(state.pool.clone()),
            media: state.media.clone(),
        }
    }

    async fn load(&self, id: Uuid) -> Result<GalleryImageWithOwner, AppError> {
        self.repository
            .find_active(id)
            .await?
            .ok_or_else(|| not_found_error("Gallery image", &id.to_string()))
    }

    pub async fn random_sample(
        &self,
        actor: &AuthenticatedUser,
        query: GalleryQuery,
    ) -> Result<Vec<GalleryImageResponse>, AppError> {
        authorize(actor, Action::Read, Resource::Gallery, None)?;
        let limit = query.sample_size()?;

        let mut snapshot = self.repository.snapshot().await?;
        let available = usize::try_from(snapshot.count_active().await?).unwrap_or(0);
        let ranks = sample_ranks(available, limit);
        let mut images = snapshot.fetch_ranks(&ranks).await?;
        snapshot.finish().await?;

        // La consulta devuelve las filas en orden de tabla
        images.shuffle(&mut rand::thread_rng());

        Ok(images.into_iter().map(GalleryImageResponse::from).collect())
    }

    pub async fn get_by_id(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
    ) -> Result<GalleryImageResponse, AppError> {
        authorize(actor, Action::Read, Resource::Gallery, None)?;
        Ok(GalleryImageResponse::from(self.load(id).await?))
    }

    pub async fn create(
        &self,
        actor: &AuthenticatedUser,
        payload: Payload,
    ) -> Result<GalleryImageResponse, AppError> {
        authorize(actor, Action::Create, Resource::Gallery, Some(actor.user_id))?;
        let (request, uploads) = payload
            .into_request::<CreateGalleryImageRequest>("image")
            .await?;
        request.validate()?;

        let (image_url, stored) = match (uploads.into_iter().next(), request.image_url) {
            (Some(bytes), _) => {
                let url = self.media.store(&bytes).await?;
                (url.clone(), Some(url))
            }
            (None, Some(url)) => (url, None),
            (None, None) => return Err(validation_error("image", "No image was submitted.")),
        };

        let new_image = NewGalleryImage {
            title: request.title,
            description: request.description,
            image_url,
        };

        let created = match self.repository.create(actor.user_id, &new_image).await {
            Ok(created) => created,
            Err(e) => {
                if let Some(url) = &stored {
                    self.media.remove(url).await;
                }
                return Err(e);
            }
        };

        tracing::info!(gallery_id = %created.image.id, user_id = %actor.user_id, "🖼️ Imagen de galería creada");
        Ok(GalleryImageResponse::from(created))
    }

    pub async fn update(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        payload: Payload,
    ) -> Result<GalleryImageResponse, AppError> {
        let current = self.load(id).await?;
        authorize(actor, Action::Update, Resource::Gallery, Some(current.image.uploaded_by))?;
        let (request, _) = payload
            .into_request::<UpdateGalleryImageRequest>("image")
            .await?;
        request.validate()?;

        let updated = self
            .repository
            .update(id, request.title.as_deref(), request.description.as_deref())
            .await?
            .ok_or_else(|| not_found_error("Gallery image", &id.to_string()))?;

        Ok(GalleryImageResponse::from(updated))
    }

    /// Borrado lógico; el fichero se conserva
    pub async fn delete(&self, actor: &AuthenticatedUser, id: Uuid) -> Result<(), AppError> {
        let current = self.load(id).await?;
        authorize(actor, Action::Delete, Resource::Gallery, Some(current.image.uploaded_by))?;

        if !self.repository.soft_delete(id).await? {
            return Err(not_found_error("Gallery image", &id.to_string()));
        }

        tracing::info!(gallery_id = %id, user_id = %actor.user_id, "🗑️ Imagen de galería eliminada");
        Ok(())
    }
}
