// Authentication and authorization error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::error::{server_error_response, ErrorListResponse, FieldError, MessageResponse};

pub const USER_EXISTS_MESSAGE: &str = "User already exists";
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid Credentials";
pub const MISSING_TOKEN_MESSAGE: &str = "No token, authorization denied";
pub const INVALID_TOKEN_MESSAGE: &str = "Token is not valid";

/// Authentication and authorization error types
///
/// Everything a handler can fail with. Internal variants carry a detail
/// string for the log; clients only ever see the generic 500 body.
#[derive(Debug, Error)]
pub enum AuthError {
    /// One or more request fields failed validation
    #[error("Validation failed: {0:?}")]
    Validation(Vec<FieldError>),

    /// Registration with an email that is already taken
    #[error("User already exists")]
    UserAlreadyExists,

    /// Unknown email or wrong password; the two are deliberately indistinguishable
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Protected route called without the auth header
    #[error("Missing authentication token")]
    MissingToken,

    /// Malformed, forged or expired token, or a token for a user that no longer exists
    #[error("Invalid token")]
    InvalidToken,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Token generation error: {0}")]
    TokenGeneration(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation(_)
            | AuthError::UserAlreadyExists
            | AuthError::InvalidCredentials => StatusCode::BAD_REQUEST,
            AuthError::MissingToken | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::Database(_) | AuthError::PasswordHash(_) | AuthError::TokenGeneration(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        AuthError::Database(err.to_string())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            AuthError::Validation(errors) => {
                debug!("Request validation failed on {} field(s)", errors.len());
                (status, Json(ErrorListResponse { errors })).into_response()
            }
            AuthError::UserAlreadyExists => {
                warn!("Registration attempted with an existing email");
                (
                    status,
                    Json(ErrorListResponse {
                        errors: vec![FieldError::general(USER_EXISTS_MESSAGE)],
                    }),
                )
                    .into_response()
            }
            AuthError::InvalidCredentials => {
                warn!("Login failed: invalid credentials");
                (
                    status,
                    Json(ErrorListResponse {
                        errors: vec![FieldError::general(INVALID_CREDENTIALS_MESSAGE)],
                    }),
                )
                    .into_response()
            }
            AuthError::MissingToken => {
                debug!("Missing token in request");
                (status, Json(MessageResponse::new(MISSING_TOKEN_MESSAGE))).into_response()
            }
            AuthError::InvalidToken => {
                debug!("Rejected invalid token");
                (status, Json(MessageResponse::new(INVALID_TOKEN_MESSAGE))).into_response()
            }
            AuthError::Database(msg) => {
                error!("Database error in auth: {}", msg);
                server_error_response()
            }
            AuthError::PasswordHash(msg) => {
                error!("Password hashing error: {}", msg);
                server_error_response()
            }
            AuthError::TokenGeneration(msg) => {
                error!("Token generation error: {}", msg);
                server_error_response()
            }
        }
    }
}
