use homelink::utils::password::{hash_password, verify_password};

#[test]
fn hash_produces_a_verifiable_digest() {
    let password = "testpassword123";
    let hash = hash_password(password).unwrap();

    assert!(!hash.is_empty());
    assert_ne!(hash, password);
    assert!(verify_password(password, &hash).unwrap());
}

#[test]
fn wrong_password_does_not_verify() {
    let hash = hash_password("correctpassword").unwrap();
    assert!(!verify_password("wrongpassword", &hash).unwrap());
}

#[test]
fn invalid_hash_is_an_error() {
    assert!(verify_password("whatever", "not_a_valid_bcrypt_hash").is_err());
}

#[test]
fn hashing_is_salted() {
    let hash1 = hash_password("samepassword").unwrap();
    let hash2 = hash_password("samepassword").unwrap();
    assert_ne!(hash1, hash2);
}
