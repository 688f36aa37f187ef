//! Shared test fixtures and utilities for stance crates.
//!
//! Provides reusable motions and timings, a recording schedule observer,
//! and deterministic RNG setup.

pub mod fixtures;
pub mod mocks;
pub mod rng;

// ---------------------------------------------------------------------------
// Re-exports for convenience
// ---------------------------------------------------------------------------

pub use fixtures::{
    biped_step_config, single_step_motion, three_phase_timings, two_step_motion,
};
pub use mocks::RecordingObserver;
pub use rng::{random_timings, seeded_rng};
