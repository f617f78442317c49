/// Authentication service tests
/// Tests JWT issuance/validation and password hashing as wired from settings
mod common;

use chrono::{Duration, Utc};
use common::{fixtures, test_settings};
use jsonwebtoken::Algorithm;
use serde_json::json;
use starter_server::services::{AuthService, Claims};

fn create_test_auth_service() -> AuthService {
    AuthService::from_settings(&test_settings("sqlite::memory:"))
}

fn subject_claims(subject: &str) -> Claims {
    let mut claims = Claims::new();
    claims.insert("sub".to_string(), json!(subject));
    claims
}

/// Test password hashing produces valid bcrypt hashes at the configured cost
#[tokio::test]
async fn test_password_hashing() {
    let auth_service = create_test_auth_service();

    let password = "MySecurePassword123!";
    let hash = auth_service.hash_password(password).unwrap();

    // bcrypt starts with $2b$ or $2a$, followed by the cost
    assert!(hash.starts_with("$2b$04$") || hash.starts_with("$2a$04$"));
    assert_eq!(hash.len(), 60);

    let hash2 = auth_service.hash_password(password).unwrap();
    assert_ne!(hash, hash2, "Hashes should differ due to random salt");
    assert!(auth_service.verify_password(password, &hash2));
}

/// Test verification rejects a different password
#[tokio::test]
async fn test_password_verification_failure() {
    let auth_service = create_test_auth_service();

    let hash = auth_service.hash_password("MySecurePassword123!").unwrap();

    assert!(!auth_service.verify_password("WrongPassword", &hash));
    assert!(!auth_service.verify_password("password", "not-a-valid-hash"));
}

/// Test access tokens live for the configured number of minutes
#[tokio::test]
async fn test_access_token_uses_configured_lifetime() {
    let mut settings = test_settings("sqlite::memory:");
    settings.access_token_expire_minutes = 5;
    let auth_service = AuthService::from_settings(&settings);

    let token = auth_service
        .create_access_token(&subject_claims("user123"), None)
        .unwrap();
    let claims = auth_service.decode_access_token(&token).unwrap();

    assert_eq!(claims["sub"], "user123");
    let exp = claims["exp"].as_i64().unwrap();
    let expected = (Utc::now() + Duration::minutes(5)).timestamp();
    assert!((exp - expected).abs() <= 5);
}

/// Test refresh tokens live for the configured number of days
#[tokio::test]
async fn test_refresh_token_uses_configured_lifetime() {
    let auth_service = create_test_auth_service();

    let token = auth_service
        .create_refresh_token(&subject_claims("user123"))
        .unwrap();
    let claims = auth_service.decode_access_token(&token).unwrap();

    assert_eq!(claims["type"], "refresh");
    let exp = claims["exp"].as_i64().unwrap();
    let expected = (Utc::now() + Duration::days(7)).timestamp();
    assert!((exp - expected).abs() <= 5);
}

/// Test the configured algorithm is used for signing and checked on decode
#[tokio::test]
async fn test_configured_algorithm() {
    let mut settings = test_settings("sqlite::memory:");
    settings.algorithm = Algorithm::HS512;
    let hs512 = AuthService::from_settings(&settings);

    let token = hs512
        .create_access_token(&subject_claims("user123"), None)
        .unwrap();

    let header = jsonwebtoken::decode_header(&token).unwrap();
    assert_eq!(header.alg, Algorithm::HS512);
    assert!(hs512.decode_access_token(&token).is_ok());

    // Same key, different algorithm
    let err = create_test_auth_service()
        .decode_access_token(&token)
        .unwrap_err();
    assert_eq!(err.code(), "UNAUTHORIZED");
}

/// Test tokens signed with another secret are rejected
#[tokio::test]
async fn test_token_with_different_secret() {
    let other = AuthService::new(
        "a-different-secret".to_string(),
        Algorithm::HS256,
        Duration::minutes(30),
        Duration::days(7),
    );
    let token = other
        .create_access_token(&subject_claims("user123"), None)
        .unwrap();

    let err = create_test_auth_service()
        .decode_access_token(&token)
        .unwrap_err();

    assert_eq!(err.code(), "UNAUTHORIZED");
    assert_eq!(err.to_string(), "Could not validate credentials");
    assert!(err.details()["error"].is_string());
}

/// Test a token is rejected once its lifetime has elapsed
#[tokio::test]
async fn test_expired_token() {
    let auth_service = create_test_auth_service();

    let token = auth_service
        .create_access_token(&subject_claims("user123"), Some(Duration::seconds(-1)))
        .unwrap();

    let err = auth_service.decode_access_token(&token).unwrap_err();
    assert_eq!(err.code(), "UNAUTHORIZED");
}

/// Test tampered tokens are rejected
#[tokio::test]
async fn test_tampered_token() {
    let auth_service = create_test_auth_service();
    let token = auth_service
        .create_access_token(&subject_claims("user123"), None)
        .unwrap();

    let mut parts: Vec<&str> = token.split('.').collect();
    let forged = AuthService::new(
        fixtures::SECRET_KEY.to_string() + "x",
        Algorithm::HS256,
        Duration::minutes(30),
        Duration::days(7),
    )
    .create_access_token(&subject_claims("admin"), None)
    .unwrap();
    let forged_payload = forged.split('.').nth(1).unwrap().to_string();
    parts[1] = &forged_payload;

    let result = auth_service.decode_access_token(&parts.join("."));
    assert!(result.is_err());
}
