//! Application layer - Use cases and orchestration

pub mod modify;
pub mod render;
pub mod rewrite;
pub mod select;

pub use modify::{ModifyOptions, ModifyReport, ModifyTagsService};
pub use render::{reconstruct_lines, Output};
pub use rewrite::{RewriteError, RewriteErrors};
pub use select::{resolve, Selection};
