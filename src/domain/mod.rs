//! Domain layer containing entities, the repository contract, and the visit pipeline.
//!
//! # Architecture
//!
//! - [`entities`] - Core data structures
//! - [`repositories`] - Persistence trait definitions
//! - [`visit_event`] - Queued visit model
//! - [`visit_stats`] - Aggregate visit counters
//! - [`visit_worker`] - Background worker pool persisting visits
//!
//! # Visit Processing Flow
//!
//! 1. The redirect handler resolves a token and sends the redirect
//! 2. A [`visit_event::VisitEvent`] is pushed onto a bounded channel (non-blocking)
//! 3. [`visit_worker::VisitWorkerPool`] workers persist it via
//!    [`repositories::MappingRepository::record_visit`]
//! 4. Outcomes are counted in [`visit_stats::VisitStats`]

pub mod entities;
pub mod repositories;
pub mod visit_event;
pub mod visit_stats;
pub mod visit_worker;
