//! HTTP server layer
//!
//! Axum server with:
//! - Permissive CORS
//! - Request tracing
//! - Basic auth on result submission
//! - JSON error responses

pub mod error;
pub mod extractors;
pub mod password;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use extractors::BasicCredentials;
pub use password::hash_password;
pub use server::{build_router, run_server, AppState, ServerConfig, ServerError};
