// Validation utilities module
// Turns `validator` results into the field-level error list returned to clients,
// and extracts request bodies so that bad JSON never bypasses that list

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header::CONTENT_TYPE, HeaderMap},
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;
use validator::{Validate, ValidationErrors};

use crate::auth::error::AuthError;
use crate::error::FieldError;

/// Message for a body that claims to be JSON but does not parse
pub const MALFORMED_BODY_MESSAGE: &str = "Request body is not valid JSON";

/// Flatten `ValidationErrors` into field errors, ordered by `field_order`
///
/// Fields missing from `field_order` are appended alphabetically. The
/// submitted value is never echoed back, so passwords cannot leak.
pub fn field_errors(errors: &ValidationErrors, field_order: &[&str]) -> Vec<FieldError> {
    let mut by_field: Vec<_> = errors.field_errors().into_iter().collect();
    by_field.sort_by_key(|(field, _)| {
        let rank = field_order
            .iter()
            .position(|f| f == field)
            .unwrap_or(field_order.len());
        (rank, *field)
    });

    by_field
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| {
                let msg = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {}", field));
                FieldError::field(field, msg)
            })
        })
        .collect()
}

/// Run `Validate` on a request and map failures to `AuthError::Validation`
pub fn validate_request<T: Validate>(request: &T, field_order: &[&str]) -> Result<(), AuthError> {
    request
        .validate()
        .map_err(|errors| AuthError::Validation(field_errors(&errors, field_order)))
}

/// JSON body extractor whose failures are `AuthError::Validation`
///
/// A body sent without a JSON content type, an empty body, or a JSON value
/// that is not an object is read as `{}`, so the request's own validation
/// reports every required field. Null fields count as absent and scalar
/// fields are read as their string form. Only syntactically broken JSON is
/// rejected here, with a single request-wide 400 entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = has_json_content_type(req.headers());
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            debug!("Failed to read request body: {}", e);
            malformed_body()
        })?;

        let value = if is_json && !bytes.iter().all(u8::is_ascii_whitespace) {
            serde_json::from_slice::<Value>(&bytes).map_err(|e| {
                debug!("Rejected malformed JSON body: {}", e);
                malformed_body()
            })?
        } else {
            Value::Object(Map::new())
        };

        let fields = match value {
            Value::Object(map) => normalize_fields(map),
            _ => Map::new(),
        };

        serde_json::from_value(Value::Object(fields))
            .map(JsonBody)
            .map_err(|e| {
                debug!("Request body did not match the expected shape: {}", e);
                malformed_body()
            })
    }
}

fn has_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| {
            let mime = mime.trim().to_ascii_lowercase();
            mime == "application/json" || mime.ends_with("+json")
        })
        .unwrap_or(false)
}

/// Keep string fields, stringify numbers and booleans, drop everything else
fn normalize_fields(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .filter_map(|(key, value)| match value {
            Value::String(_) => Some((key, value)),
            Value::Number(n) => Some((key, Value::String(n.to_string()))),
            Value::Bool(b) => Some((key, Value::String(b.to_string()))),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        })
        .collect()
}

fn malformed_body() -> AuthError {
    AuthError::Validation(vec![FieldError::general(MALFORMED_BODY_MESSAGE)])
}
