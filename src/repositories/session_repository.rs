//! Repositorio de sesiones
//!
//! Cada token emitido tiene una fila en `auth_sessions` identificada por su
//! `jti`. Cerrar sesión borra la fila y el token deja de ser aceptado.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{models::user::User, utils::errors::AppError};

pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        session_id: Uuid,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        sqlx::query("INSERT INTO auth_sessions (jti, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(session_id)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Usuario de una sesión vigente
    pub async fn find_session_user(
        &self,
        session_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT u.*
            FROM auth_sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.jti = $1 AND s.user_id = $2 AND s.expires_at > NOW()
            "#,
        )
        .bind(session_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Revoca una sesión; `false` si ya no existía
    pub async fn delete(&self, session_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM auth_sessions WHERE jti = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Limpia las sesiones caducadas de un usuario
    pub async fn purge_expired(&self, user_id: Uuid) -> Result<u64, AppError> {
        let result =
            sqlx::query("DELETE FROM auth_sessions WHERE user_id = $1 AND expires_at <= NOW()")
                .bind(user_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected())
    }
}
