//! Link storage backends.
//!
//! - [`PgLinkRepository`] - PostgreSQL, used when `DATABASE_URL` is set
//! - [`InMemoryLinkRepository`] - process-local map, used otherwise

pub mod memory_link_repository;
pub mod pg_link_repository;

pub use memory_link_repository::InMemoryLinkRepository;
pub use pg_link_repository::PgLinkRepository;
