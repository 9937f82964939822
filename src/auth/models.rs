// Authentication data models and DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// User database model
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Everything needed to persist a new user; the store assigns nothing else
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub avatar: String,
    pub password_hash: String,
}

/// User response model (excludes password_hash)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[schema(example = "jane@example.com")]
    pub email: String,
    #[schema(example = "https://gravatar.com/avatar/0a1b2c?d=mm&r=pg&s=200")]
    pub avatar: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            avatar: user.avatar,
            created_at: user.created_at,
        }
    }
}

/// Registration request DTO
///
/// Missing fields deserialize as empty strings so they are reported as
/// field errors instead of failing JSON extraction.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[serde(default)]
    #[validate(email(message = "Please include a valid email"))]
    #[schema(example = "jane@example.com")]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 6, message = "Please enter a password with 6 or more characters"))]
    #[schema(example = "secret123")]
    pub password: String,
}

impl RegisterRequest {
    pub const FIELD_ORDER: &'static [&'static str] = &["name", "email", "password"];
}

/// Login request DTO
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(email(message = "Please include a valid email"))]
    #[schema(example = "jane@example.com")]
    pub email: String,
    #[validate(required(message = "Password is required"))]
    #[schema(example = "secret123")]
    pub password: Option<String>,
}

impl LoginRequest {
    pub const FIELD_ORDER: &'static [&'static str] = &["email", "password"];
}

/// Successful registration or login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}
