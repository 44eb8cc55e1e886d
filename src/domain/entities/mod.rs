//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures without business logic.
//!
//! # Entity Types
//!
//! - [`Link`] - A shortened URL owned by a user
//! - [`NewLink`] - Input for creating a link
//! - [`LinkStats`] - Link and user counters

pub mod link;

pub use link::{Link, LinkStats, NewLink};
