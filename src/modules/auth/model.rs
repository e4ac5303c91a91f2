use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::modules::users::model::{User, UserRole};

/// Access token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub email: String,
    pub role: UserRole,
    pub exp: usize,
    pub iat: usize,
}

/// Password reset token claims. The `purpose` field keeps access tokens
/// from doubling as reset tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct ResetTokenClaims {
    pub sub: String,
    pub email: String,
    pub purpose: String,
    pub exp: usize,
    pub iat: usize,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
    /// Defaults to parent when omitted.
    #[serde(default)]
    pub role: UserRole,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub user: User,
    pub access_token: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,
    pub current_password: Option<String>,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub new_password: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "token must not be empty"))]
    pub token: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub new_password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn register_role_defaults_to_parent() {
        let json = r#"{"name":"Pat","email":"pat@example.com","password":"secret1"}"#;
        let dto: RegisterRequest = serde_json::from_str(json).unwrap();
        assert_eq!(dto.role, UserRole::Parent);
    }

    #[test]
    fn register_rejects_short_password() {
        let dto = RegisterRequest {
            name: "Pat".to_string(),
            email: "pat@example.com".to_string(),
            password: "short".to_string(),
            role: UserRole::Parent,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn login_rejects_bad_email() {
        let dto = LoginRequest {
            email: "not-an-email".to_string(),
            password: "whatever".to_string(),
        };
        assert!(dto.validate().is_err());
    }
}
