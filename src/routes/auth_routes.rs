use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};

use crate::{
    controllers::auth_controller::AuthController,
    dto::{
        auth_dto::{AuthResponse, LoginRequest, RegisterRequest, UserProfileResponse},
        MessageResponse,
    },
    middleware::auth::AuthenticatedUser,
    state::AppState,
    utils::{errors::AppError, extract::AppJson},
};

/// Rutas públicas de autenticación
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

/// Rutas que requieren un token válido
pub fn create_session_router() -> Router<AppState> {
    Router::new()
        .route("/auth/logout", post(logout))
        .route("/auth/profile", get(profile))
}

async fn register(
    State(state): State<AppState>,
    AppJson(request): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let controller = AuthController::new(&state);
    let response = controller.register(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn login(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let controller = AuthController::new(&state);
    let response = controller.login(request).await?;
    Ok(Json(response))
}

async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<MessageResponse>, AppError> {
    let controller = AuthController::new(&state);
    let response = controller.logout(&user).await?;
    Ok(Json(response))
}

async fn profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<UserProfileResponse>, AppError> {
    let controller = AuthController::new(&state);
    let response = controller.profile(&user).await?;
    Ok(Json(response))
}
