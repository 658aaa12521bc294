use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::{
    controllers::wishlist_controller::WishlistController,
    dto::wishlist_dto::{
        AddToWishlistRequest, WishlistAddedResponse, WishlistItemResponse, WishlistToggleResponse,
    },
    middleware::auth::AuthenticatedUser,
    models::wishlist::WishlistToggle,
    state::AppState,
    utils::{
        errors::AppError,
        extract::{AppJson, AppPath},
    },
};

pub fn create_wishlist_router() -> Router<AppState> {
    Router::new()
        .route("/vehicles/wishlist", get(list_wishlist).post(add_to_wishlist))
        .route("/vehicles/:id/wishlist/toggle", post(toggle_wishlist))
        .route("/vehicles/:id/wishlist/remove", delete(remove_from_wishlist))
}

async fn list_wishlist(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<WishlistItemResponse>>, AppError> {
    let controller = WishlistController::new(&state);
    let response = controller.list(&user).await?;
    Ok(Json(response))
}

async fn add_to_wishlist(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppJson(request): AppJson<AddToWishlistRequest>,
) -> Result<(StatusCode, Json<WishlistAddedResponse>), AppError> {
    let controller = WishlistController::new(&state);
    let response = controller.add(&user, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn toggle_wishlist(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppPath(vehicle_id): AppPath<Uuid>,
) -> Result<(StatusCode, Json<WishlistToggleResponse>), AppError> {
    let controller = WishlistController::new(&state);
    let (outcome, response) = controller.toggle(&user, vehicle_id).await?;
    let status = match outcome {
        WishlistToggle::Added => StatusCode::CREATED,
        WishlistToggle::Removed => StatusCode::OK,
    };
    Ok((status, Json(response)))
}

async fn remove_from_wishlist(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppPath(vehicle_id): AppPath<Uuid>,
) -> Result<StatusCode, AppError> {
    let controller = WishlistController::new(&state);
    controller.remove(&user, vehicle_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
