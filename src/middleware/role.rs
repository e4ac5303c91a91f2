//! Role checks for handlers.
//!
//! Roles live in the token claims, so nothing here touches the database.

use crate::middleware::auth::AuthUser;
use crate::modules::users::model::UserRole;
use crate::utils::errors::AppError;

/// Rejects with 403 unless the caller holds one of the listed roles.
pub fn check_any_role(auth_user: &AuthUser, allowed_roles: &[UserRole]) -> Result<(), AppError> {
    if !allowed_roles.contains(&auth_user.role()) {
        return Err(AppError::forbidden(format!(
            "Access denied. Required roles: {:?}, but user has role: {:?}",
            allowed_roles,
            auth_user.role()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::auth::model::Claims;
    use uuid::Uuid;

    fn auth_user(role: UserRole) -> AuthUser {
        AuthUser(Claims {
            sub: Uuid::new_v4().to_string(),
            email: "test@example.com".to_string(),
            role,
            exp: 9999999999,
            iat: 1234567890,
        })
    }

    #[test]
    fn accepts_listed_roles() {
        let user = auth_user(UserRole::Teacher);
        assert!(check_any_role(&user, &[UserRole::Teacher, UserRole::Admin]).is_ok());
    }

    #[test]
    fn rejects_unlisted_roles() {
        let user = auth_user(UserRole::Parent);
        let err = check_any_role(&user, &[UserRole::Admin]).unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::FORBIDDEN);
    }
}
