//! HTTP request handlers for API endpoints.

pub mod health;
pub mod redirect;

pub use health::health_handler;
pub use redirect::{missing_token_handler, redirect_handler};
