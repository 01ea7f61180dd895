//! Repository trait definitions for the domain layer.
//!
//! Traits define the persistence contract; implementations live in
//! `crate::infrastructure::persistence`, and mocks are generated with
//! `mockall` for unit tests.
//!
//! # Testing
//!
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod mapping_repository;

pub use mapping_repository::MappingRepository;

#[cfg(test)]
pub use mapping_repository::MockMappingRepository;
