//! Infrastructure layer - Go syntax, printing and source I/O

pub mod align;
pub mod config;
pub mod overlay;
pub mod printer;
pub mod repository;
pub mod syntax;

pub use config::Config;
pub use printer::{print, PrintMode};
pub use repository::{FileSystemRepository, OverlayRepository, SourceRepository};
pub use syntax::{FieldSite, SourceFile, Span};
