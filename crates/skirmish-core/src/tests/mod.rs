//! Crate-level tests that drive the whole simulation.
//!
//! - `scenarios.rs`: worked examples of guidance, fuel and fragmentation
//! - `determinism.rs`: same seed, same world
//! - `integration.rs`: end-to-end engagements
//! - `properties.rs`: proptest invariants
//! - `helpers.rs`: factories and a scripted random source

mod determinism;
mod helpers;
mod scenarios;

// Re-export for convenience
pub use helpers::*;
