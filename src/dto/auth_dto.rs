//! DTOs de autenticación

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    models::user::{User, UserRole},
    utils::validation::validate_username,
};

// Register request
#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "validate_password_match", skip_on_field_errors = false))]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 150), custom = "validate_username")]
    pub username: String,
    #[validate(email, length(max = 254))]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    pub password_confirm: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub last_name: String,
    #[serde(default)]
    pub role: UserRole,
}

fn validate_password_match(request: &RegisterRequest) -> Result<(), ValidationError> {
    if request.password != request.password_confirm {
        let mut error = ValidationError::new("password_mismatch");
        error.message = Some("Password fields didn't match".into());
        return Err(error);
    }
    Ok(())
}

// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Perfil público del usuario
#[derive(Debug, Serialize)]
pub struct UserProfileResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub is_admin: bool,
    pub date_joined: DateTime<Utc>,
}

impl From<User> for UserProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            is_admin: user.role.is_admin(),
            role: user.role,
            date_joined: user.created_at,
        }
    }
}

// Login / register response
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_at: DateTime<Utc>,
    pub user: UserProfileResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(password_confirm: &str) -> RegisterRequest {
        RegisterRequest {
            username: "admin_test".to_string(),
            email: "admin@example.com".to_string(),
            password: "supersecret".to_string(),
            password_confirm: password_confirm.to_string(),
            first_name: String::new(),
            last_name: String::new(),
            role: UserRole::User,
        }
    }

    #[test]
    fn test_register_valid() {
        assert!(register("supersecret").validate().is_ok());
    }

    #[test]
    fn test_register_password_mismatch() {
        let errors = register("different").validate().unwrap_err();
        assert!(errors.errors().contains_key("__all__"));
    }

    #[test]
    fn test_register_rejects_bad_fields() {
        let mut request = register("supersecret");
        request.username = "a b".to_string();
        request.email = "not-an-email".to_string();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("username"));
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_register_role_defaults_to_user() {
        let request: RegisterRequest = serde_json::from_value(serde_json::json!({
            "username": "jdoe",
            "email": "jdoe@example.com",
            "password": "supersecret",
            "password_confirm": "supersecret"
        }))
        .unwrap();
        assert_eq!(request.role, UserRole::User);
        assert!(request.first_name.is_empty());
    }
}
