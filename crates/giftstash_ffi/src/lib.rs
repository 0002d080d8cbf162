//! Flutter-facing FFI surface for the GiftStash core.

pub mod api;
