//! Test infrastructure for the XML reader
//!
//! Provides fixture loading, stochastic chunking, and tree/event snapshots.

#![allow(dead_code)]

mod generators;
mod harness;
mod loader;

pub use generators::Gen;
pub use harness::{dump, read_chunks, run_test, run_with_variations, Run, TestResult};
pub use loader::{load_fixtures_by_name, TestCase};
