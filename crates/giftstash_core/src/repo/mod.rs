//! Persistence boundary for the people collection.
//!
//! # Responsibility
//! - Define the durable-store contract the state store depends on.
//! - Isolate key-value/SQLite and JSON codec details from store logic.
//!
//! # Invariants
//! - The collection is persisted wholesale: one key, one JSON value,
//!   replaced in full on every save.
//! - A present-but-unparseable value surfaces as a corrupt-state error,
//!   never as an empty collection.

pub mod people_repo;
