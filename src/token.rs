use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AuthFailure, Result};
use crate::models::User;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub role: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// Signing material for access tokens (HS256).
#[derive(Clone)]
pub struct TokenKeys {
    secret: String,
    expiration_hours: i64,
}

impl TokenKeys {
    pub fn new(secret: impl Into<String>, expiration_hours: i64) -> Self {
        Self {
            secret: secret.into(),
            expiration_hours,
        }
    }

    pub fn issue(&self, user: &User) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            role: user.role.as_str().to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.expiration_hours)).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Bad signature, malformed token, and expiry all collapse into
    /// `InvalidToken`.
    pub fn verify(&self, token: &str) -> std::result::Result<Claims, AuthFailure> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!("Token rejected: {}", e);
            AuthFailure::InvalidToken
        })
    }
}

/// Pull the token out of an `Authorization` header value.
///
/// The scheme is matched case-insensitively and the last whitespace-separated
/// chunk is taken as the token, so `Bearer Bearer <token>` still works.
pub fn parse_bearer(header: &str) -> std::result::Result<&str, AuthFailure> {
    let parts: Vec<&str> = header.split_whitespace().collect();
    if parts.len() < 2 {
        return Err(AuthFailure::MalformedHeader);
    }
    if !parts[0].eq_ignore_ascii_case("bearer") {
        return Err(AuthFailure::WrongScheme);
    }
    Ok(parts[parts.len() - 1])
}
