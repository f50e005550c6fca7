//! Test fixtures for upkeep-planner.
//!
//! Provides:
//! - a builder for locations with sensible defaults
//! - small graph shapes used across the integration tests

#![allow(dead_code)]

pub mod campus;

pub use campus::*;
