use homelink::config::jwt::JwtConfig;
use homelink::modules::users::model::UserRole;
use homelink::utils::jwt::{
    create_access_token, create_reset_token, verify_reset_token, verify_token,
};
use uuid::Uuid;

fn test_config() -> JwtConfig {
    JwtConfig {
        secret: "unit-test-secret".to_string(),
        access_token_expiry: 3600,
        reset_token_expiry: 3600,
    }
}

#[test]
fn access_token_round_trips() {
    let config = test_config();
    let user_id = Uuid::new_v4();

    let token =
        create_access_token(user_id, "teacher@example.com", UserRole::Teacher, &config).unwrap();
    let claims = verify_token(&token, &config).unwrap();

    assert_eq!(claims.sub, user_id.to_string());
    assert_eq!(claims.email, "teacher@example.com");
    assert_eq!(claims.role, UserRole::Teacher);
}

#[test]
fn wrong_secret_is_rejected() {
    let config = test_config();
    let token =
        create_access_token(Uuid::new_v4(), "a@example.com", UserRole::Parent, &config).unwrap();

    let other = JwtConfig {
        secret: "a-different-secret".to_string(),
        ..test_config()
    };
    assert!(verify_token(&token, &other).is_err());
}

#[test]
fn garbage_token_is_rejected() {
    assert!(verify_token("not.a.jwt", &test_config()).is_err());
}

#[test]
fn reset_token_round_trips() {
    let config = test_config();
    let user_id = Uuid::new_v4();

    let token = create_reset_token(user_id, "parent@example.com", &config).unwrap();
    let claims = verify_reset_token(&token, &config).unwrap();

    assert_eq!(claims.sub, user_id.to_string());
    assert_eq!(claims.purpose, "password_reset");
}

#[test]
fn access_token_cannot_pass_as_reset_token() {
    let config = test_config();
    let token =
        create_access_token(Uuid::new_v4(), "a@example.com", UserRole::Parent, &config).unwrap();

    assert!(verify_reset_token(&token, &config).is_err());
}

#[test]
fn reset_token_cannot_pass_as_access_token() {
    let config = test_config();
    let token = create_reset_token(Uuid::new_v4(), "a@example.com", &config).unwrap();

    assert!(verify_token(&token, &config).is_err());
}
