//! Business logic services for the application layer.

pub mod link_service;
pub mod redirect_dispatcher;
pub mod visit_recorder;

pub use link_service::{LinkService, ShortLink};
pub use redirect_dispatcher::{DispatchOutcome, RedirectDispatcher, Visitor};
pub use visit_recorder::VisitRecorder;
