// HTTP handlers for authentication endpoints

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::auth::{
    error::AuthError,
    middleware::AuthContext,
    models::{LoginRequest, RegisterRequest, TokenResponse, UserResponse},
    service::AuthService,
};
use crate::error::{ErrorListResponse, MessageResponse};
use crate::validation::JsonBody;

/// Register a new user
/// POST /api/users
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User registered", body = TokenResponse),
        (status = 400, description = "Invalid input or email already registered", body = ErrorListResponse,
            example = json!({"errors": [{"msg": "User already exists"}]})),
        (status = 500, description = "Internal server error", body = MessageResponse,
            example = json!({"msg": "Server error"}))
    ),
    tag = "users"
)]
pub async fn register_handler(
    State(service): State<Arc<AuthService>>,
    JsonBody(request): JsonBody<RegisterRequest>,
) -> Result<Json<TokenResponse>, AuthError> {
    let token = service.register(request).await?;
    Ok(Json(TokenResponse { token }))
}

/// Authenticate a user and get a token
/// POST /api/auth
#[utoipa::path(
    post,
    path = "/api/auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials accepted", body = TokenResponse),
        (status = 400, description = "Invalid input or invalid credentials", body = ErrorListResponse,
            example = json!({"errors": [{"msg": "Invalid Credentials"}]})),
        (status = 500, description = "Internal server error", body = MessageResponse,
            example = json!({"msg": "Server error"}))
    ),
    tag = "auth"
)]
pub async fn login_handler(
    State(service): State<Arc<AuthService>>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<Json<TokenResponse>, AuthError> {
    let token = service.login(request).await?;
    Ok(Json(TokenResponse { token }))
}

/// Get the user behind the presented token
/// GET /api/auth
#[utoipa::path(
    get,
    path = "/api/auth",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Missing or invalid token", body = MessageResponse,
            example = json!({"msg": "Token is not valid"})),
        (status = 500, description = "Internal server error", body = MessageResponse,
            example = json!({"msg": "Server error"}))
    ),
    security(("x_auth_token" = [])),
    tag = "auth"
)]
pub async fn me_handler(
    State(service): State<Arc<AuthService>>,
    context: AuthContext,
) -> Result<Json<UserResponse>, AuthError> {
    let user = service.current_user(context.user_id).await?;
    Ok(Json(user))
}
