//! Struct tag system

pub mod literal;
pub mod modification;
pub mod parser;

// Re-export main types
pub use modification::{parse_key_options, Modification};
pub use parser::{Tag, TagError, TagSet};
