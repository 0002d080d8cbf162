//! In-memory state store for the people collection.
//!
//! # Responsibility
//! - Own the canonical in-memory collection for the process lifetime.
//! - Apply mutations in call order and trigger full-collection persistence
//!   after each one.
//!
//! # Invariants
//! - Consumers read snapshots and route every change through the store's
//!   mutation operations.
//! - A mutation is visible in memory before its durable write is attempted.

pub mod people_store;
