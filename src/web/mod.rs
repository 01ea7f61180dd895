//! Browser-facing pages.
//!
//! Server-side rendered with Askama templates from `templates/`.
//!
//! # Modules
//!
//! - [`handlers`] - Template rendering handlers

pub mod handlers;
