// Authentication service - business logic layer

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::auth::{
    avatar::gravatar_url,
    error::AuthError,
    models::{LoginRequest, NewUser, RegisterRequest, UserResponse},
    password::PasswordService,
    repository::UserStore,
    token::TokenService,
};
use crate::validation::validate_request;

/// Authentication service coordinating all auth operations
pub struct AuthService {
    users: Arc<dyn UserStore>,
    password_service: PasswordService,
    token_service: Arc<TokenService>,
}

impl AuthService {
    /// Create a new AuthService
    pub fn new(
        users: Arc<dyn UserStore>,
        password_service: PasswordService,
        token_service: Arc<TokenService>,
    ) -> Self {
        Self {
            users,
            password_service,
            token_service,
        }
    }

    /// Register a new user and return a token for them
    pub async fn register(&self, request: RegisterRequest) -> Result<String, AuthError> {
        validate_request(&request, RegisterRequest::FIELD_ORDER)?;

        let email = normalize_email(&request.email);
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AuthError::UserAlreadyExists);
        }

        let avatar = gravatar_url(&email);
        let password_hash = self.password_service.hash_password(&request.password).await?;

        // the store's own uniqueness check covers a concurrent registration
        // slipping in between the lookup above and this insert
        let user = self
            .users
            .create(NewUser {
                name: request.name,
                email,
                avatar,
                password_hash,
            })
            .await?;

        info!("Registered user {}", user.id);
        self.token_service.issue(user.id)
    }

    /// Verify credentials and return a token
    ///
    /// Unknown email and wrong password both yield `InvalidCredentials`.
    pub async fn login(&self, request: LoginRequest) -> Result<String, AuthError> {
        validate_request(&request, LoginRequest::FIELD_ORDER)?;

        let email = normalize_email(&request.email);
        let password = request.password.unwrap_or_default();

        let user = match self.users.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                debug!("Login for unknown email");
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !self
            .password_service
            .verify_password(&password, &user.password_hash)
            .await?
        {
            debug!("Password mismatch for user {}", user.id);
            return Err(AuthError::InvalidCredentials);
        }

        info!("User {} logged in", user.id);
        self.token_service.issue(user.id)
    }

    /// Get current user information, without the password hash
    ///
    /// A token that outlives its user is treated like any other bad token.
    pub async fn current_user(&self, user_id: Uuid) -> Result<UserResponse, AuthError> {
        let user = self.users.find_by_id(user_id).await?.ok_or_else(|| {
            debug!("Token references unknown user {}", user_id);
            AuthError::InvalidToken
        })?;

        Ok(UserResponse::from(user))
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repository::InMemoryUserStore;
    use crate::error::FieldError;

    fn test_service() -> (AuthService, Arc<InMemoryUserStore>, Arc<TokenService>) {
        let store = Arc::new(InMemoryUserStore::new());
        let tokens = Arc::new(TokenService::new("service_test_secret", 3600));
        let service = AuthService::new(
            store.clone(),
            PasswordService::new(crate::config::BCRYPT_MIN_COST),
            Arc::clone(&tokens),
        );
        (service, store, tokens)
    }

    fn register_request(email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Jane Doe".to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn login_request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: Some(password.to_string()),
        }
    }

    #[tokio::test]
    async fn test_register_issues_token_for_new_user() {
        let (service, store, tokens) = test_service();

        let token = service
            .register(register_request("jane@example.com", "secret123"))
            .await
            .unwrap();

        let claims = tokens.validate(&token).unwrap();
        let stored = store.find_by_email("jane@example.com").await.unwrap().unwrap();
        assert_eq!(claims.user.id, stored.id);
        assert_ne!(stored.password_hash, "secret123");
        assert!(stored.avatar.starts_with("https://gravatar.com/avatar/"));
    }

    #[tokio::test]
    async fn test_register_normalizes_email() {
        let (service, store, _) = test_service();

        service
            .register(register_request("  Jane@Example.com ", "secret123"))
            .await
            .unwrap();

        assert!(store.find_by_email("jane@example.com").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let (service, store, _) = test_service();
        service
            .register(register_request("jane@example.com", "secret123"))
            .await
            .unwrap();

        let result = service
            .register(register_request("JANE@example.com", "another1"))
            .await;

        assert!(matches!(result, Err(AuthError::UserAlreadyExists)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_register_short_password_creates_nothing() {
        let (service, store, _) = test_service();

        let result = service
            .register(register_request("jane@example.com", "12345"))
            .await;

        match result {
            Err(AuthError::Validation(errors)) => assert_eq!(
                errors,
                vec![FieldError::field(
                    "password",
                    "Please enter a password with 6 or more characters"
                )]
            ),
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_login_success() {
        let (service, _, tokens) = test_service();
        let registered = service
            .register(register_request("jane@example.com", "secret123"))
            .await
            .unwrap();

        let token = service
            .login(login_request("jane@example.com", "secret123"))
            .await
            .unwrap();

        let registered_id = tokens.validate(&registered).unwrap().user.id;
        assert_eq!(tokens.validate(&token).unwrap().user.id, registered_id);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let (service, _, _) = test_service();
        service
            .register(register_request("jane@example.com", "secret123"))
            .await
            .unwrap();

        let wrong_password = service
            .login(login_request("jane@example.com", "wrong-password"))
            .await;
        let unknown_email = service
            .login(login_request("nobody@example.com", "secret123"))
            .await;

        assert!(matches!(wrong_password, Err(AuthError::InvalidCredentials)));
        assert!(matches!(unknown_email, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_missing_password_is_validation_error() {
        let (service, _, _) = test_service();
        let request = LoginRequest {
            email: "jane@example.com".to_string(),
            password: None,
        };

        let result = service.login(request).await;

        assert!(matches!(result, Err(AuthError::Validation(_))));
    }

    #[tokio::test]
    async fn test_current_user() {
        let (service, _, tokens) = test_service();
        let token = service
            .register(register_request("jane@example.com", "secret123"))
            .await
            .unwrap();
        let user_id = tokens.validate(&token).unwrap().user.id;

        let user = service.current_user(user_id).await.unwrap();

        assert_eq!(user.id, user_id);
        assert_eq!(user.email, "jane@example.com");
        assert_eq!(user.name, "Jane Doe");
    }

    #[tokio::test]
    async fn test_current_user_unknown_id_is_invalid_token() {
        let (service, _, _) = test_service();

        let result = service.current_user(Uuid::new_v4()).await;

        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }
}
