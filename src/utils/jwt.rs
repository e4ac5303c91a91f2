use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::config::jwt::JwtConfig;
use crate::modules::auth::model::{Claims, ResetTokenClaims};
use crate::modules::users::model::UserRole;
use crate::utils::errors::AppError;

pub fn create_access_token(
    user_id: Uuid,
    email: &str,
    role: UserRole,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp() as usize;
    let exp = now + jwt_config.access_token_expiry as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        role,
        exp,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(AppError::internal)
}

pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized("Invalid or expired token"))
}

/// Reset tokens carry a `purpose` marker so an access token can never pass
/// for one.
pub fn create_reset_token(
    user_id: Uuid,
    email: &str,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp() as usize;
    let exp = now + jwt_config.reset_token_expiry as usize;

    let claims = ResetTokenClaims {
        sub: user_id.to_string(),
        email: email.to_string(),
        purpose: "password_reset".to_string(),
        exp,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(AppError::internal)
}

pub fn verify_reset_token(
    token: &str,
    jwt_config: &JwtConfig,
) -> Result<ResetTokenClaims, AppError> {
    let claims = decode::<ResetTokenClaims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized("Invalid or expired reset token"))?;

    if claims.purpose != "password_reset" {
        return Err(AppError::unauthorized("Invalid or expired reset token"));
    }

    Ok(claims)
}
