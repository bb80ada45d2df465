//! Bearer token issuance and verification.
//!
//! Tokens are HS256-signed JSON objects carrying the caller's payload plus
//! `iat` and `exp`. Verification runs with zero leeway.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde_json::Value;

use crate::auth::Claims;
use crate::config::Config;
use crate::error::{ApiError, Result};

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    validity: Duration,
}

impl JwtService {
    pub fn new(secret: &str, validity: Duration) -> Result<Self> {
        if secret.is_empty() {
            return Err(ApiError::Configuration("JWT secret must not be empty".into()));
        }
        if validity <= Duration::zero() {
            return Err(ApiError::Configuration(
                "token validity must be positive".into(),
            ));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        // payloads are caller-chosen; an `aud` claim must not make the token unverifiable
        validation.validate_aud = false;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            validity,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.jwt_secret, config.jwt_validity())
    }

    pub fn validity(&self) -> Duration {
        self.validity
    }

    /// Sign `payload` with a validity window starting now.
    pub fn issue_token(&self, payload: Value) -> Result<String> {
        self.issue_token_at(payload, Utc::now())
    }

    /// Sign `payload` as if issued at `issued_at`.
    ///
    /// The payload is not inspected beyond requiring a JSON object without
    /// its own `exp` and, when present, a string `email`.
    pub fn issue_token_at(&self, payload: Value, issued_at: DateTime<Utc>) -> Result<String> {
        let Value::Object(mut claims) = payload else {
            return Err(ApiError::BadRequest(
                "token payload must be a JSON object".into(),
            ));
        };
        if claims.contains_key("exp") {
            return Err(ApiError::BadRequest(
                "token payload already has an \"exp\" property".into(),
            ));
        }
        if !matches!(claims.get("email"), None | Some(Value::Null | Value::String(_))) {
            return Err(ApiError::BadRequest(
                "token payload \"email\" must be a string".into(),
            ));
        }

        let expires_at = issued_at + self.validity;
        claims.insert("iat".into(), Value::from(issued_at.timestamp()));
        claims.insert("exp".into(), Value::from(expires_at.timestamp()));

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| ApiError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Verify signature and expiry, returning the claim set.
    pub fn decode_token(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| {
                let reason = match err.kind() {
                    ErrorKind::ExpiredSignature => "Token expired",
                    ErrorKind::InvalidSignature => "Invalid signature",
                    ErrorKind::InvalidToken => "Invalid token",
                    _ => "Token validation failed",
                };
                ApiError::Unauthorized(reason.to_string())
            })
    }
}
