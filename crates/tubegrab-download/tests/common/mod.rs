//! Common test utilities.
//!
//! Fake ports with just enough behavior to drive the orchestrator end to
//! end against a temporary directory.

#![allow(dead_code)]

pub mod fakes;
pub mod fixtures;
