//! Utility functions for validation, token generation, and request metadata.
//!
//! - [`url_validator`] - Target URL validation
//! - [`token_generator`] - Random token generation
//! - [`address`] - Client address normalization
//! - [`device_type`] - Device classification from `User-Agent`
//! - [`db_error`] - PostgreSQL error classification

pub mod address;
pub mod db_error;
pub mod device_type;
pub mod token_generator;
pub mod url_validator;
