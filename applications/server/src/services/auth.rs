/// Authentication primitives - password hashing and JWT handling
use crate::config::Settings;
use crate::error::{Result, ServerError};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde_json::{json, Map, Value};

/// Arbitrary JWT claims
pub type Claims = Map<String, Value>;

const EXPIRY_CLAIM: &str = "exp";
const TOKEN_TYPE_CLAIM: &str = "type";

#[derive(Debug, Clone)]
pub struct AuthService {
    secret: String,
    algorithm: Algorithm,
    access_token_expiration: Duration,
    refresh_token_expiration: Duration,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(
        secret: String,
        algorithm: Algorithm,
        access_token_expiration: Duration,
        refresh_token_expiration: Duration,
    ) -> Self {
        Self {
            secret,
            algorithm,
            access_token_expiration,
            refresh_token_expiration,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.secret_key.clone(),
            settings.algorithm,
            settings.access_token_ttl(),
            settings.refresh_token_ttl(),
        )
        .with_bcrypt_cost(settings.bcrypt_cost)
    }

    /// Override the bcrypt work factor (tests use the minimum, 4)
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    /// Hash a password using bcrypt
    pub fn hash_password(&self, password: &str) -> Result<String> {
        bcrypt::hash(password, self.bcrypt_cost).map_err(ServerError::from)
    }

    /// Verify a password against a hash
    ///
    /// A hash that is not valid bcrypt never verifies.
    pub fn verify_password(&self, password: &str, hash: &str) -> bool {
        bcrypt::verify(password, hash).unwrap_or(false)
    }

    /// [`Self::hash_password`] on the blocking thread pool
    pub async fn hash_password_blocking(&self, password: String) -> Result<String> {
        let cost = self.bcrypt_cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| ServerError::Internal(format!("Password hashing task failed: {}", e)))?
            .map_err(ServerError::from)
    }

    /// [`Self::verify_password`] on the blocking thread pool
    pub async fn verify_password_blocking(&self, password: String, hash: String) -> Result<bool> {
        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false))
            .await
            .map_err(|e| ServerError::Internal(format!("Password verification task failed: {}", e)))
    }

    /// Create an access token
    ///
    /// The claims are signed as given plus an `exp` claim, `ttl` from now or
    /// the configured access token lifetime.
    pub fn create_access_token(&self, claims: &Claims, ttl: Option<Duration>) -> Result<String> {
        self.create_token(claims.clone(), ttl.unwrap_or(self.access_token_expiration))
    }

    /// Create a refresh token, marked with `"type": "refresh"`
    pub fn create_refresh_token(&self, claims: &Claims) -> Result<String> {
        let mut claims = claims.clone();
        claims.insert(TOKEN_TYPE_CLAIM.to_string(), json!("refresh"));
        self.create_token(claims, self.refresh_token_expiration)
    }

    /// Verify signature and expiry, returning the claims
    pub fn decode_access_token(&self, token: &str) -> Result<Claims> {
        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;

        decode::<Claims>(token, &decoding_key, &validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| {
                ServerError::unauthorized(
                    "Could not validate credentials",
                    json!({ "error": e.to_string() }),
                )
            })
    }

    fn create_token(&self, mut claims: Claims, expiration: Duration) -> Result<String> {
        let exp = Utc::now() + expiration;
        claims.insert(EXPIRY_CLAIM.to_string(), json!(exp.timestamp()));

        let encoding_key = EncodingKey::from_secret(self.secret.as_bytes());
        encode(&Header::new(self.algorithm), &claims, &encoding_key)
            .map_err(|e| ServerError::Internal(format!("Failed to encode token: {}", e)))
    }
}
