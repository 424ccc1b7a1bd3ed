//! Small pure helpers shared across crates.

pub mod filename;

pub use filename::{is_reserved_char, sanitize_file_name};
