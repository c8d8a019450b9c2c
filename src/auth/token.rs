//! HS256 access tokens.
//!
//! A token carries the account id (`sub`), the role name and its validity
//! window. The role is kept as a plain string in the claims so that a token
//! with a well-formed signature but an unknown role can be told apart from a
//! forged or expired one.

use crate::model::{AccountId, Principal, Role};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: u32,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum TokenError {
    /// Bad signature, malformed token or expired.
    #[error("Invalid token: {0}")]
    Invalid(String),

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("Failed to sign token: {0}")]
    Signing(String),
}

/// Issues and verifies access tokens with one shared secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, principal: Principal) -> Result<String, TokenError> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: principal.account_id.0,
            role: principal.role.to_string(),
            iat: now,
            exp: now + self.ttl.as_secs() as i64,
        };
        self.sign(&claims)
    }

    fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Checks signature and expiry, then the role.
    pub fn verify(&self, token: &str) -> Result<Principal, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| TokenError::Invalid(e.to_string()))?
            .claims;
        let role: Role = claims
            .role
            .parse()
            .map_err(|_| TokenError::InvalidRole(claims.role.clone()))?;
        Ok(Principal::new(AccountId(claims.sub), role))
    }
}
