mod auth;
mod error_handler;

pub use auth::{auth_middleware, require_power};
pub use error_handler::log_errors;
