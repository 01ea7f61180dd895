//! Core domain entities.
//!
//! - [`UrlMapping`] - A token → URL mapping with its visit counter
//! - [`Visit`] - A recorded redirect
//!
//! Creation inputs live in separate structs ([`NewVisit`]); mappings are
//! created from a bare `(token, long_url)` pair.

pub mod mapping;
pub mod visit;

pub use mapping::UrlMapping;
pub use visit::{NewVisit, Visit};
