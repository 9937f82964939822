// Authentication guard for protected routes

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::debug;
use uuid::Uuid;

use crate::auth::{error::AuthError, token::TokenService};

/// Header carrying the bearer token
pub const AUTH_HEADER: &str = "x-auth-token";

/// Identity recovered from a validated token, scoped to one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: Uuid,
}

/// Extracting `AuthContext` guards a handler: no header means
/// `MissingToken`, anything that fails validation means `InvalidToken`.
/// The context is cached in the request extensions after the first
/// successful extraction.
#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    Arc<TokenService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(context) = parts.extensions.get::<AuthContext>() {
            return Ok(*context);
        }

        let token = parts
            .headers
            .get(AUTH_HEADER)
            .ok_or(AuthError::MissingToken)?
            .to_str()
            .map_err(|_| AuthError::InvalidToken)?;

        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        let token_service = Arc::<TokenService>::from_ref(state);
        let claims = token_service.validate(token)?;

        let context = AuthContext {
            user_id: claims.user.id,
        };
        debug!("Authenticated request for user {}", context.user_id);
        parts.extensions.insert(context);

        Ok(context)
    }
}
