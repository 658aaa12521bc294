//! Middleware de autenticación JWT
//!
//! Este módulo maneja la autenticación Bearer, la resolución de la sesión
//! y la inyección del usuario autenticado en las requests.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    models::user::UserRole,
    repositories::session_repository::SessionRepository,
    state::AppState,
    utils::{
        errors::AppError,
        jwt::{extract_token_from_header, verify_token},
    },
};

/// Usuario autenticado que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub username: String,
    pub role: UserRole,
    pub session_id: Uuid,
}

/// Middleware de autenticación JWT.
///
/// El token debe ser válido y su sesión debe seguir existiendo. El rol se
/// lee de la base de datos, no de los claims.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| {
            AppError::Unauthorized("Authentication credentials were not provided".to_string())
        })?;

    let token = extract_token_from_header(auth_header)?;
    let claims = verify_token(token, &state.jwt)?;
    let user_id = claims.user_id()?;
    let session_id = claims.session_id()?;

    let user = SessionRepository::new(state.pool.clone())
        .find_session_user(session_id, user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Session expired or revoked".to_string()))?;

    if !user.is_active {
        return Err(AppError::Unauthorized("User account is disabled".to_string()));
    }

    tracing::debug!(user_id = %user.id, role = %user.role, "🔐 Request autenticada");

    request.extensions_mut().insert(AuthenticatedUser {
        user_id: user.id,
        username: user.username,
        role: user.role,
        session_id,
    });

    Ok(next.run(request).await)
}
