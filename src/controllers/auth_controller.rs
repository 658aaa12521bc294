//! Controlador de autenticación
//!
//! Registro, login, logout y perfil. Las contraseñas se guardan con bcrypt
//! y cada login abre una sesión nueva en `auth_sessions`.

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::{
    dto::{
        auth_dto::{AuthResponse, LoginRequest, RegisterRequest, UserProfileResponse},
        MessageResponse,
    },
    middleware::auth::AuthenticatedUser,
    models::user::{NewUser, User, UserRole},
    repositories::{session_repository::SessionRepository, user_repository::UserRepository},
    state::AppState,
    utils::{
        errors::AppError,
        jwt::{generate_token, JwtConfig},
    },
};
use validator::Validate;

pub struct AuthController {
    users: UserRepository,
    sessions: SessionRepository,
    jwt: JwtConfig,
    allow_admin_registration: bool,
}

/// bcrypt bloquea la CPU; se ejecuta fuera del runtime async
async fn hash_password(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash(password, DEFAULT_COST))
        .await
        .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))?
        .map_err(|e| AppError::Hash(e.to_string()))
}

async fn verify_password(password: String, password_hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || verify(password, &password_hash))
        .await
        .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))?
        .map_err(|e| AppError::Hash(e.to_string()))
}

impl AuthController {
    pub fn new(state: &AppState) -> Self {
        Self {
            users: UserRepository::new(state.pool.clone()),
            sessions: SessionRepository::new(state.pool.clone()),
            jwt: state.jwt.clone(),
            allow_admin_registration: state.config.allow_admin_registration,
        }
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AppError> {
        request.validate()?;

        if request.role == UserRole::Admin && !self.allow_admin_registration {
            return Err(AppError::Forbidden(
                "Admin accounts cannot be self-registered".to_string(),
            ));
        }

        let password_hash = hash_password(request.password).await?;

        let user = self
            .users
            .create(NewUser {
                username: request.username,
                email: request.email.to_lowercase(),
                password_hash,
                first_name: request.first_name,
                last_name: request.last_name,
                role: request.role,
            })
            .await?;

        tracing::info!(user_id = %user.id, username = %user.username, role = %user.role, "👤 Usuario registrado");

        self.open_session(user).await
    }

    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AppError> {
        request.validate()?;

        let invalid = || AppError::Unauthorized("Invalid credentials".to_string());

        let user = self
            .users
            .find_by_username(&request.username)
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(request.password, user.password_hash.clone()).await? {
            return Err(invalid());
        }

        if !user.is_active {
            return Err(AppError::Unauthorized("User account is disabled".to_string()));
        }

        self.sessions.purge_expired(user.id).await?;

        tracing::info!(user_id = %user.id, "🔑 Login correcto");

        self.open_session(user).await
    }

    /// Revoca la sesión del token presentado
    pub async fn logout(&self, actor: &AuthenticatedUser) -> Result<MessageResponse, AppError> {
        self.sessions.delete(actor.session_id).await?;

        tracing::info!(user_id = %actor.user_id, "👋 Sesión cerrada");

        Ok(MessageResponse::new("Successfully logged out"))
    }

    pub async fn profile(&self, actor: &AuthenticatedUser) -> Result<UserProfileResponse, AppError> {
        let user = self
            .users
            .find_by_id(actor.user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User no longer exists".to_string()))?;

        Ok(UserProfileResponse::from(user))
    }

    async fn open_session(&self, user: User) -> Result<AuthResponse, AppError> {
        let issued = generate_token(user.id, user.role, &self.jwt)?;
        self.sessions
            .create(issued.session_id, user.id, issued.expires_at)
            .await?;

        Ok(AuthResponse {
            token: issued.token,
            token_type: "Bearer",
            expires_at: issued.expires_at,
            user: UserProfileResponse::from(user),
        })
    }
}
