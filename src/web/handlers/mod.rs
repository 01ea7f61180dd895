//! Handlers for the HTML pages.

pub mod index;
pub mod shorten;

pub use index::index_handler;
pub use shorten::shorten_handler;
