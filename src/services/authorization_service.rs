//! Servicio de autorización
//!
//! Todas las reglas de permisos del catálogo pasan por [`authorize`]: recibe
//! el actor, la acción, el tipo de recurso y, para recursos existentes, su
//! propietario. Los controladores cargan el recurso antes de llamar aquí,
//! así un id inexistente produce `NotFound` antes que `Forbidden`.

use uuid::Uuid;

use crate::{middleware::auth::AuthenticatedUser, utils::errors::AppError};

/// Acción solicitada sobre un recurso
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
}

/// Tipo de recurso protegido
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Vehicle,
    /// Imagen de un vehículo; el propietario es el del vehículo
    VehicleImage,
    Gallery,
    Wishlist,
    Stats,
}

impl Resource {
    fn label(&self) -> &'static str {
        match self {
            Resource::Vehicle => "vehicle",
            Resource::VehicleImage => "vehicle image",
            Resource::Gallery => "gallery image",
            Resource::Wishlist => "wishlist",
            Resource::Stats => "statistics",
        }
    }
}

/// Decide si `actor` puede ejecutar `action` sobre `resource`.
///
/// `owner` es el propietario del recurso existente (para imágenes de
/// vehículo, el propietario del vehículo). En creaciones de recursos
/// hijos, como una imagen nueva, es el propietario del padre.
pub fn authorize(
    actor: &AuthenticatedUser,
    action: Action,
    resource: Resource,
    owner: Option<Uuid>,
) -> Result<(), AppError> {
    let is_admin = actor.role.is_admin();
    let is_owner = owner.is_some_and(|owner_id| owner_id == actor.user_id);

    let allowed = match (action, resource) {
        (Action::Read, Resource::Stats) => is_admin,
        (Action::Read, _) => true,

        (Action::Create, Resource::Vehicle) => is_admin,
        (Action::Create, Resource::VehicleImage) => is_admin || is_owner,
        (Action::Create, Resource::Gallery | Resource::Wishlist) => true,
        (Action::Create, Resource::Stats) => false,

        // La wishlist siempre se filtra por el actor
        (Action::Update | Action::Delete, Resource::Wishlist) => true,
        (Action::Update | Action::Delete, Resource::Stats) => false,
        (Action::Update | Action::Delete, _) => is_admin || is_owner,
    };

    if allowed {
        Ok(())
    } else {
        tracing::debug!(
            user_id = %actor.user_id,
            role = %actor.role,
            ?action,
            ?resource,
            "permission denied"
        );
        Err(AppError::Forbidden(denied_message(action, resource)))
    }
}

fn denied_message(action: Action, resource: Resource) -> String {
    match (action, resource) {
        (Action::Create, Resource::Vehicle) => "Only admins can create vehicles".to_string(),
        (_, Resource::Stats) => "Admin access required".to_string(),
        (Action::Create, _) => format!(
            "You don't have permission to add a {}",
            resource.label()
        ),
        (Action::Read, _) => format!("You don't have permission to view this {}", resource.label()),
        (Action::Update, _) => format!(
            "Only the owner or an admin can update this {}",
            resource.label()
        ),
        (Action::Delete, _) => format!(
            "Only the owner or an admin can delete this {}",
            resource.label()
        ),
    }
}
