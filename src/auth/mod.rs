// Authentication module
// Registration, credential login and x-auth-token guarded access

pub mod avatar;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repository;
pub mod service;
pub mod token;

// Re-export commonly used types
pub use handlers::{login_handler, me_handler, register_handler};
pub use middleware::AUTH_HEADER;
pub use password::PasswordService;
pub use repository::{InMemoryUserStore, PgUserStore, UserStore};
pub use service::AuthService;
pub use token::TokenService;
