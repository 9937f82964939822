// JWT token generation and validation service

use crate::auth::error::AuthError;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// Identity carried inside a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUser {
    pub id: Uuid,
}

/// JWT claims structure: `{"user": {"id": ...}, "iat": ..., "exp": ...}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user: TokenUser,
    pub iat: i64, // issued at timestamp
    pub exp: i64, // expiration timestamp
}

/// Token service for JWT operations
///
/// Holds the signing secret handed to it at construction; no other part of
/// the service sees the secret.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_seconds: i64,
}

impl TokenService {
    /// Create a new TokenService signing with `secret`, tokens valid for `ttl_seconds`
    pub fn new(secret: &str, ttl_seconds: i64) -> Self {
        // a token stops validating the second its exp passes
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_seconds,
        }
    }

    /// Issue a signed token for `user_id`
    pub fn issue(&self, user_id: Uuid) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let exp = now.checked_add(self.ttl_seconds).ok_or_else(|| {
            AuthError::TokenGeneration(format!("token lifetime {}s overflows", self.ttl_seconds))
        })?;
        let claims = Claims {
            user: TokenUser { id: user_id },
            iat: now,
            exp,
        };

        self.sign(&claims)
    }

    fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenGeneration(e.to_string()))
    }

    /// Validate a token and recover its claims
    ///
    /// Malformed input, a bad signature and expiry all surface as the same
    /// `InvalidToken`; the reason is only logged at debug level.
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("Token rejected: {:?}", e.kind());
                AuthError::InvalidToken
            })
    }
}
