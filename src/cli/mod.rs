//! CLI layer - Command-line interface

pub mod commands;
pub mod output;

pub use commands::{Cli, LogLevel};
pub use output::{format_error, format_report};
