use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::{
    controllers::gallery_controller::GalleryController,
    dto::{
        gallery_dto::{GalleryImageResponse, GalleryQuery},
        ApiResponse,
    },
    middleware::auth::AuthenticatedUser,
    state::AppState,
    utils::{
        errors::AppError,
        extract::{AppPath, AppQuery, Payload},
    },
};

pub fn create_gallery_router() -> Router<AppState> {
    Router::new()
        .route("/vehicles/gallery", get(random_gallery).post(create_gallery_image))
        .route(
            "/vehicles/gallery/:id",
            get(get_gallery_image)
                .put(update_gallery_image)
                .patch(update_gallery_image)
                .delete(delete_gallery_image),
        )
}

async fn random_gallery(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppQuery(query): AppQuery<GalleryQuery>,
) -> Result<Json<Vec<GalleryImageResponse>>, AppError> {
    let controller = GalleryController::new(&state);
    let response = controller.random_sample(&user, query).await?;
    Ok(Json(response))
}

async fn create_gallery_image(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    payload: Payload,
) -> Result<(StatusCode, Json<ApiResponse<GalleryImageResponse>>), AppError> {
    let controller = GalleryController::new(&state);
    let response = controller.create(&user, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(response, "Gallery image created")),
    ))
}

async fn get_gallery_image(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<GalleryImageResponse>, AppError> {
    let controller = GalleryController::new(&state);
    let response = controller.get_by_id(&user, id).await?;
    Ok(Json(response))
}

async fn update_gallery_image(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppPath(id): AppPath<Uuid>,
    payload: Payload,
) -> Result<Json<ApiResponse<GalleryImageResponse>>, AppError> {
    let controller = GalleryController::new(&state);
    let response = controller.update(&user, id, payload).await?;
    Ok(Json(ApiResponse::success_with_message(
        response,
        "Gallery image updated",
    )))
}

async fn delete_gallery_image(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppPath(id): AppPath<Uuid>,
) -> Result<StatusCode, AppError> {
    let controller = GalleryController::new(&state);
    controller.delete(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
