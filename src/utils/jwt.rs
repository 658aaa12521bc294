//! Utilidades JWT
//!
//! Los tokens son JWT HS256 firmados con `JWT_SECRET`. Cada token lleva un
//! `jti` que identifica la sesión en `auth_sessions`; para el cliente el
//! token es opaco.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::environment::EnvironmentConfig, models::user::UserRole, utils::errors::AppError,
};

/// Claims del JWT token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String, // user_id
    pub jti: String, // session id
    pub role: UserRole,
    pub exp: i64,
    pub iat: i64,
}

impl JwtClaims {
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.sub).map_err(|_| AppError::Jwt("Invalid subject".to_string()))
    }

    pub fn session_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.jti).map_err(|_| AppError::Jwt("Invalid token id".to_string()))
    }
}

/// Configuración de JWT
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Vida del token en segundos
    pub expiration: u64,
}

impl From<&EnvironmentConfig> for JwtConfig {
    fn from(config: &EnvironmentConfig) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            expiration: config.jwt_expiration,
        }
    }
}

/// Token recién emitido junto a los datos de su sesión
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub session_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// Generar JWT token para un usuario
pub fn generate_token(
    user_id: Uuid,
    role: UserRole,
    config: &JwtConfig,
) -> Result<IssuedToken, AppError> {
    let now = Utc::now();
    let expiration = i64::try_from(config.expiration)
        .map_err(|_| AppError::Internal("JWT expiration out of range".to_string()))?;
    let expires_at = now + Duration::seconds(expiration);
    let session_id = Uuid::new_v4();

    let claims = JwtClaims {
        sub: user_id.to_string(),
        jti: session_id.to_string(),
        role,
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let encoding_key = EncodingKey::from_secret(config.secret.as_ref());

    let token = encode(&Header::new(Algorithm::HS256), &claims, &encoding_key)
        .map_err(|e| AppError::Internal(format!("Error generando token: {}", e)))?;

    Ok(IssuedToken {
        token,
        session_id,
        expires_at,
    })
}

/// Verificar y decodificar JWT token
pub fn verify_token(token: &str, config: &JwtConfig) -> Result<JwtClaims, AppError> {
    let decoding_key = DecodingKey::from_secret(config.secret.as_ref());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let token_data = decode::<JwtClaims>(token, &decoding_key, &validation)
        .map_err(|e| AppError::Jwt(format!("Token inválido: {}", e)))?;

    Ok(token_data.claims)
}

/// Extraer token del header Authorization. Solo se acepta el esquema `Bearer`.
pub fn extract_token_from_header(auth_header: &str) -> Result<&str, AppError> {
    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Unauthorized("Authorization header must use the Bearer scheme".to_string())
    })?;

    let token = token.trim();
    if token.is_empty() {
        return Err(AppError::Unauthorized("Token no puede estar vacío".to_string()));
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".to_string(),
            expiration: 3600,
        }
    }

    #[test]
    fn test_generate_and_verify_roundtrip() {
        let user_id = Uuid::new_v4();
        let issued = generate_token(user_id, UserRole::Admin, &config()).unwrap();

        let claims = verify_token(&issued.token, &config()).unwrap();
        assert_eq!(claims.user_id().unwrap(), user_id);
        assert_eq!(claims.session_id().unwrap(), issued.session_id);
        assert_eq!(claims.role, UserRole::Admin);
        assert_eq!(claims.exp, issued.expires_at.timestamp());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let issued = generate_token(Uuid::new_v4(), UserRole::User, &config()).unwrap();
        let other = JwtConfig {
            secret: "other-secret".to_string(),
            ..config()
        };

        let err = verify_token(&issued.token, &other).unwrap_err();
        assert!(matches!(err, AppError::Jwt(_)));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: Uuid::new_v4().to_string(),
            jti: Uuid::new_v4().to_string(),
            role: UserRole::User,
            exp: (now - Duration::hours(1)).timestamp(),
            iat: (now - Duration::hours(2)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(verify_token(&token, &config()).is_err());
    }

    #[test]
    fn test_extract_token_requires_bearer_scheme() {
        assert_eq!(extract_token_from_header("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
        assert!(extract_token_from_header("Token abc").is_err());
        assert!(extract_token_from_header("bearer abc").is_err());
        assert!(extract_token_from_header("Bearer ").is_err());
        assert!(extract_token_from_header("").is_err());
    }
}
