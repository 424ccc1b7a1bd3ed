//! Command handlers.
//!
//! Each handler parses CLI-specific input, calls into the core or the
//! download pipeline, and formats output for the terminal.

pub mod check_deps;
pub mod config;
pub mod download;
pub mod paths;
