use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::{
    controllers::image_controller::ImageController,
    dto::{
        image_dto::VehicleImageResponse,
        ApiResponse,
    },
    middleware::auth::AuthenticatedUser,
    state::AppState,
    utils::{
        errors::AppError,
        extract::{AppPath, Payload},
    },
};

pub fn create_image_router() -> Router<AppState> {
    Router::new()
        .route("/vehicles/:id/images", get(list_images).post(attach_image))
        .route("/vehicles/:id/images/:image_id", delete(delete_image))
        .route("/vehicles/:id/images/:image_id/primary", post(set_primary_image))
}

async fn list_images(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppPath(vehicle_id): AppPath<Uuid>,
) -> Result<Json<Vec<VehicleImageResponse>>, AppError> {
    let controller = ImageController::new(&state);
    let response = controller.list(&user, vehicle_id).await?;
    Ok(Json(response))
}

async fn attach_image(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppPath(vehicle_id): AppPath<Uuid>,
    payload: Payload,
) -> Result<(StatusCode, Json<ApiResponse<VehicleImageResponse>>), AppError> {
    let controller = ImageController::new(&state);
    let response = controller.attach(&user, vehicle_id, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(response, "Image added")),
    ))
}

async fn set_primary_image(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppPath((vehicle_id, image_id)): AppPath<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<VehicleImageResponse>>, AppError> {
    let controller = ImageController::new(&state);
    let response = controller.set_primary(&user, vehicle_id, image_id).await?;
    Ok(Json(ApiResponse::success_with_message(
        response,
        "Primary image updated",
    )))
}

async fn delete_image(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppPath((vehicle_id, image_id)): AppPath<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    let controller = ImageController::new(&state);
    controller.delete(&user, vehicle_id, image_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
