//! Command-line front end for tubegrab.
//!
//! `main.rs` parses arguments and hands off to [`handlers`]; adapters are
//! wired together in [`bootstrap`].

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

#[cfg(test)]
use tempfile as _;
#[cfg(test)]
use tokio_test as _;

// Used by main.rs
use anyhow as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod commands;
pub mod config_commands;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod presentation;

pub use bootstrap::{AdapterOptions, Adapters, CliConfig, CliContext, bootstrap};
pub use commands::Commands;
pub use config_commands::ConfigCommand;
pub use error::CliError;
pub use parser::Cli;
