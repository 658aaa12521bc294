//! Rutas de la API
//!
//! Todas se montan bajo `/api/v1`. Solo registro y login son públicos; el
//! resto pasa por `auth_middleware`.

pub mod auth_routes;
pub mod gallery_routes;
pub mod image_routes;
pub mod vehicle_routes;
pub mod wishlist_routes;

use axum::{middleware, Router};

use crate::{middleware::auth::auth_middleware, state::AppState};

pub fn create_api_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .merge(auth_routes::create_session_router())
        .merge(vehicle_routes::create_vehicle_router())
        .merge(image_routes::create_image_router())
        .merge(wishlist_routes::create_wishlist_router())
        .merge(gallery_routes::create_gallery_router())
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .merge(auth_routes::create_auth_router())
        .merge(protected)
}
