//! Apply a modification to every selected struct field

use crate::application::select::Selection;
use crate::domain::tags::TagError;
use crate::domain::Modification;
use crate::infrastructure::{FieldSite, SourceFile};
use std::fmt;
use tracing::{debug, warn};

/// A field whose tag could not be rewritten
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteError {
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub error: TagError,
}

impl fmt::Display for RewriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}:{}", self.file, self.line, self.column, self.error)
    }
}

impl std::error::Error for RewriteError {}

/// Per-field failures collected during one rewrite pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteErrors(Vec<RewriteError>);

impl RewriteErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for RewriteErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages().join("\n"))
    }
}

impl std::error::Error for RewriteErrors {}

fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// The identifier a field's tag names are derived from, if it is eligible.
pub fn driving_name(field: &FieldSite, skip_unexported: bool) -> Option<&str> {
    if field.is_embedded() {
        if skip_unexported {
            return None;
        }
        return field.embedded_ident.as_deref();
    }

    field
        .names
        .iter()
        .map(|n| n.name.as_str())
        .find(|name| !skip_unexported || is_exported(name))
}

/// Rewrite the tags of every eligible field overlapping `selection`.
///
/// Failures are recorded per field and never stop the walk.
pub fn rewrite(
    file: &mut SourceFile,
    selection: &Selection,
    modification: &Modification,
) -> RewriteErrors {
    let mut errors = Vec::new();
    let targets: Vec<usize> = file
        .structs
        .iter()
        .flat_map(|s| s.fields.iter().copied())
        .collect();

    for index in targets {
        let field = &file.fields[index];
        if !selection.overlaps(field.span) {
            continue;
        }

        let Some(name) = driving_name(field, modification.skip_unexported_fields) else {
            continue;
        };

        let raw = field.tag.as_deref().unwrap_or("");
        match modification.process_field(name, raw) {
            Ok(tag) => {
                debug!(
                    field = name,
                    line = field.line,
                    "tag {:?} -> {:?}",
                    raw,
                    tag.as_deref().unwrap_or("")
                );
                file.fields[index].tag = tag;
            }
            Err(error) => {
                let error = RewriteError {
                    file: file.path.clone(),
                    line: field.line,
                    column: field.column,
                    error,
                };
                warn!("{}", error);
                errors.push(error);
            }
        }
    }

    RewriteErrors(errors)
}
