//! Terminal output.

pub mod progress;
pub mod summary;

pub use progress::TerminalSink;
pub use summary::print_summary;

// ANSI color codes
pub(crate) const GREEN: &str = "\x1b[32m";
pub(crate) const RED: &str = "\x1b[31m";
pub(crate) const YELLOW: &str = "\x1b[33m";
pub(crate) const BOLD: &str = "\x1b[1m";
pub(crate) const RESET: &str = "\x1b[0m";
