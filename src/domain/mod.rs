//! Domain layer - tag editing rules

pub mod case;
pub mod format;
pub mod selection;
pub mod tags;

pub use case::Transform;
pub use format::OutputFormat;
pub use selection::SelectionCriterion;
pub use tags::{Modification, TagSet};
