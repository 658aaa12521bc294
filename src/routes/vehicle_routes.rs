use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::{
    controllers::{stats_controller::StatsController, vehicle_controller::VehicleController},
    dto::{
        stats_dto::StatsResponse,
        vehicle_dto::{VehicleDetailResponse, VehicleListItem, VehicleListQuery},
        ApiResponse,
    },
    middleware::auth::AuthenticatedUser,
    state::AppState,
    utils::{
        errors::AppError,
        extract::{AppPath, AppQuery, Payload},
    },
};

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/vehicles", get(list_vehicles).post(create_vehicle))
        .route("/vehicles/stats", get(get_stats))
        .route(
            "/vehicles/:id",
            get(get_vehicle)
                .put(update_vehicle)
                .patch(update_vehicle)
                .delete(delete_vehicle),
        )
}

async fn list_vehicles(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppQuery(query): AppQuery<VehicleListQuery>,
) -> Result<Json<Vec<VehicleListItem>>, AppError> {
    let controller = VehicleController::new(&state);
    let response = controller.list(&user, query).await?;
    Ok(Json(response))
}

async fn create_vehicle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    payload: Payload,
) -> Result<(StatusCode, Json<ApiResponse<VehicleDetailResponse>>), AppError> {
    let controller = VehicleController::new(&state);
    let response = controller.create(&user, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(response, "Vehicle created")),
    ))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<VehicleDetailResponse>, AppError> {
    let controller = VehicleController::new(&state);
    let response = controller.get_by_id(&user, id).await?;
    Ok(Json(response))
}

async fn update_vehicle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppPath(id): AppPath<Uuid>,
    payload: Payload,
) -> Result<Json<ApiResponse<VehicleDetailResponse>>, AppError> {
    let controller = VehicleController::new(&state);
    let response = controller.update(&user, id, payload).await?;
    Ok(Json(ApiResponse::success_with_message(response, "Vehicle updated")))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppPath(id): AppPath<Uuid>,
) -> Result<StatusCode, AppError> {
    let controller = VehicleController::new(&state);
    controller.delete(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_stats(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<StatsResponse>, AppError> {
    let controller = StatsController::new(&state);
    let response = controller.get(&user).await?;
    Ok(Json(response))
}
