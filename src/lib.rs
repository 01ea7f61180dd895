//! # Shortlink
//!
//! A URL shortener built with Axum and PostgreSQL. Long URLs are mapped to
//! random 32-character hex tokens; visiting `/s/{token}` redirects to the
//! original URL and records the visit in the background.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Entities, the repository trait and the visit pipeline
//! - **Application Layer** ([`application`]) - Link creation, redirect dispatch, visit queueing
//! - **Infrastructure Layer** ([`infrastructure`]) - PostgreSQL and in-memory repositories
//! - **API Layer** ([`api`]) - Redirect and health handlers, middleware
//! - **Web Layer** ([`web`]) - HTML landing and result pages
//!
//! ## Visit Tracking
//!
//! The redirect is answered before the visit is stored. Visits go through a
//! bounded queue consumed by a fixed pool of workers; when the queue is full
//! the visit is dropped and counted, so tracking never slows a redirect.
//!
//! ## Quick Start
//!
//! ```bash
//! export DB_USER=postgres DB_PASSWORD=postgres DB_ADDR=localhost DB_NAME=shortlink
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;
pub mod web;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{LinkService, RedirectDispatcher, VisitRecorder};
    pub use crate::domain::entities::{NewVisit, UrlMapping, Visit};
    pub use crate::domain::repositories::MappingRepository;
    pub use crate::error::{AppError, RepositoryError};
    pub use crate::infrastructure::persistence::{InMemoryMappingRepository, PgMappingRepository};
    pub use crate::state::AppState;
}
