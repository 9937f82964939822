// Error wire format for the API
// Every failure leaves the service as one of two JSON shapes:
//   {"errors": [{"msg": ..., "param": ..., "location": ...}]}   request problems (400)
//   {"msg": ...}                                                 auth failures (401) and server errors (500)

use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

/// Generic message returned for every 500
pub const SERVER_ERROR_MESSAGE: &str = "Server error";

/// A single entry in an `errors` list
///
/// `param` and `location` are present for field-level validation failures
/// and omitted for request-wide failures such as "User already exists".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    #[schema(example = "Please include a valid email")]
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "email")]
    pub param: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "body")]
    pub location: Option<String>,
}

impl FieldError {
    /// Entry bound to a request body field
    pub fn field(param: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            param: Some(param.into()),
            location: Some("body".to_string()),
        }
    }

    /// Entry not bound to any particular field
    pub fn general(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            param: None,
            location: None,
        }
    }
}

/// Body for 400 responses
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorListResponse {
    pub errors: Vec<FieldError>,
}

/// Body for 401 and 500 responses
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Token is not valid")]
    pub msg: String,
}

impl MessageResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

/// Generic 500 response; the cause stays in the server log
pub fn server_error_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(MessageResponse::new(SERVER_ERROR_MESSAGE)),
    )
        .into_response()
}

/// Outermost guard for `CatchPanicLayer`: log the panic, answer with a generic 500
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    error!("Handler panicked: {}", detail);

    server_error_response()
}
