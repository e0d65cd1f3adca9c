use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::errors::DomainError;

/// Name of the cookie login sets.
pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";

/// Access tokens are valid for a fixed day. There is no refresh or revocation.
pub const TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct IssuedToken {
    pub token: String,
    /// Unix timestamp, seconds.
    pub expires_at: i64,
}

/// Password hashing and access-token signing.
#[derive(Clone)]
pub struct CredentialService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    cost: u32,
    /// Hash checked when a login names an unknown email, at the same cost as real ones.
    decoy_hash: Arc<str>,
}

impl CredentialService {
    pub fn new(secret: &str, cost: u32) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            cost,
            decoy_hash: bcrypt::hash(Uuid::new_v4().to_string(), cost)
                .unwrap_or_default()
                .into(),
        }
    }

    pub fn hash_password(&self, password: &str) -> Result<String, DomainError> {
        bcrypt::hash(password, self.cost)
            .map_err(|e| DomainError::Internal(format!("Password hashing failed: {e}")))
    }

    /// A malformed stored hash verifies as false rather than erroring.
    pub fn verify_password(&self, hash: &str, candidate: &str) -> bool {
        bcrypt::verify(candidate, hash).unwrap_or(false)
    }

    /// Spends the same bcrypt work as [`Self::verify_password`] and never matches.
    pub fn verify_decoy(&self, candidate: &str) {
        let _ = bcrypt::verify(candidate, &self.decoy_hash);
    }

    pub fn issue_token(&self, user_id: Uuid) -> Result<IssuedToken, DomainError> {
        self.issue_token_at(user_id, Utc::now().timestamp())
    }

    pub fn issue_token_at(&self, user_id: Uuid, issued_at: i64) -> Result<IssuedToken, DomainError> {
        let claims = Claims {
            sub: user_id,
            iat: issued_at,
            exp: issued_at + Duration::hours(TOKEN_TTL_HOURS).num_seconds(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| DomainError::Internal(format!("Token signing failed: {e}")))?;
        Ok(IssuedToken {
            token,
            expires_at: claims.exp,
        })
    }

    /// Returns the user id of a well-signed, unexpired token.
    pub fn validate_token(&self, token: &str) -> Result<Uuid, DomainError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims.sub)
            .map_err(|e| {
                log::debug!("Rejected access token: {e}");
                DomainError::InvalidCredentials
            })
    }
}
