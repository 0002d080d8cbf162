//! Domain model for the gift-ideas collection.
//!
//! # Responsibility
//! - Define the canonical data structures used by core business logic.
//! - Keep one collection shape (people owning ideas) for UI and persistence.
//!
//! # Invariants
//! - Every domain object is identified by a stable UUID.
//! - Deleting a Person removes all of its Ideas with it.

pub mod person;
