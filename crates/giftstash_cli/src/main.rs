//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `giftstash_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    // Tiny probe to validate core crate wiring independently from the
    // Flutter/FFI runtime setup.
    println!("giftstash_core ping={}", giftstash_core::ping());
    println!("giftstash_core version={}", giftstash_core::core_version());
}
