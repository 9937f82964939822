mod auth;
mod config;
mod db;
mod error;
mod validation;

use std::sync::Arc;

use axum::{
    extract::FromRef,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use auth::{
    login_handler, me_handler, register_handler, AuthService, InMemoryUserStore, PasswordService,
    PgUserStore, TokenService, UserStore, AUTH_HEADER,
};
use config::Config;

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::handlers::register_handler,
        auth::handlers::login_handler,
        auth::handlers::me_handler,
    ),
    components(
        schemas(
            auth::models::RegisterRequest,
            auth::models::LoginRequest,
            auth::models::TokenResponse,
            auth::models::UserResponse,
            error::ErrorListResponse,
            error::FieldError,
            error::MessageResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "users", description = "User registration"),
        (name = "auth", description = "Login and current-user lookup")
    ),
    info(
        title = "Auth API",
        version = "1.0.0",
        description = "User registration, credential login and token-guarded user lookup"
    )
)]
struct ApiDoc;

/// Registers the `x-auth-token` header as an API key scheme
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "x_auth_token",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(AUTH_HEADER))),
            );
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
struct AppState {
    auth: Arc<AuthService>,
    tokens: Arc<TokenService>,
}

impl AppState {
    /// Wire the auth components around a user store using `config`
    fn new(users: Arc<dyn UserStore>, config: &Config) -> Self {
        let tokens = Arc::new(TokenService::new(&config.jwt_secret, config.token_ttl_secs));
        let auth = Arc::new(AuthService::new(
            users,
            PasswordService::new(config.bcrypt_cost),
            Arc::clone(&tokens),
        ));
        Self { auth, tokens }
    }
}

impl FromRef<AppState> for Arc<AuthService> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.auth)
    }
}

impl FromRef<AppState> for Arc<TokenService> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.tokens)
    }
}

/// Creates and configures the application router
fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/auth", get(me_handler).post(login_handler))
        .route("/users", post(register_handler));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(error::handle_panic))
                .layer(cors),
        )
        .with_state(state)
}

/// Pick the user store: Postgres when configured, otherwise in-process
async fn create_user_store(config: &Config) -> Result<Arc<dyn UserStore>, Box<dyn std::error::Error>> {
    match &config.database_url {
        Some(url) => {
            tracing::info!("Connecting to database...");
            let pool = db::create_pool(url).await?;
            db::run_migrations(&pool).await?;
            Ok(Arc::new(PgUserStore::new(pool)))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, users are kept in memory and lost on restart");
            Ok(Arc::new(InMemoryUserStore::new()))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("auth_api=debug,tower_http=info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Auth API - Starting...");

    let config = Config::from_env().map_err(|e| {
        tracing::error!("Invalid configuration: {}", e);
        e
    })?;
    tracing::debug!("Loaded configuration: {:?}", config);

    let users = create_user_store(&config).await?;
    let app = create_router(AppState::new(users, &config));

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Auth API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
