//! Repository implementations.
//!
//! - [`PgMappingRepository`] - PostgreSQL storage via SQLx (production)
//! - [`InMemoryMappingRepository`] - in-process storage for tests and local runs

pub mod memory_mapping_repository;
pub mod pg_mapping_repository;

pub use memory_mapping_repository::InMemoryMappingRepository;
pub use pg_mapping_repository::PgMappingRepository;
