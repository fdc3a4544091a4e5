//! tagsmith - Go struct tag editor
//!
//! Adds, removes and reformats the tags of Go struct fields selected by line
//! range, cursor offset, struct name or the whole file. Output is either the
//! rewritten source or a JSON slice of the selected lines for editor plugins.

pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::{Result, TagsmithError};
