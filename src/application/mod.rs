//! Application layer services implementing business logic.
//!
//! Services consume the repository trait and provide the operations the HTTP
//! handlers call.
//!
//! # Available Services
//!
//! - [`services::LinkService`] - URL validation, token generation and storage
//! - [`services::RedirectDispatcher`] - token resolution and redirect responses
//! - [`services::VisitRecorder`] - non-blocking visit queueing

pub mod services;
