//! Error types for tagsmith

use thiserror::Error;

/// Which stage detected an out-of-range line selection.
///
/// The resolver reports the offending bound and the valid interval; the JSON
/// renderer only knows the reconstructed line count and reports a flat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeCheck {
    Resolve,
    Render,
}

/// Main error type for tagsmith
#[derive(Debug, Error)]
pub enum TagsmithError {
    #[error("{0}")]
    Config(String),

    #[error("{0}")]
    Parse(String),

    #[error("{0}")]
    Selection(String),

    #[error("{}", render_out_of_range(.check, .selection, .requested, .valid_min, .valid_max))]
    SelectionOutOfRange {
        selection: String,
        requested: usize,
        valid_min: usize,
        valid_max: usize,
        check: RangeCheck,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),
}

fn render_out_of_range(
    check: &RangeCheck,
    selection: &str,
    requested: &usize,
    valid_min: &usize,
    valid_max: &usize,
) -> String {
    match check {
        RangeCheck::Resolve => format!(
            "line selection {:?} is invalid: {} is not within [{}, {}]",
            selection, requested, valid_min, valid_max
        ),
        RangeCheck::Render => "line selection is invalid".to_string(),
    }
}

impl TagsmithError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            TagsmithError::Config(_) => 2,
            TagsmithError::Parse(_) => 3,
            TagsmithError::Selection(_) | TagsmithError::SelectionOutOfRange { .. } => 4,
            _ => 1,
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn display_with_suggestions(&self) -> String {
        match self {
            TagsmithError::Config(msg) => {
                if msg.contains("transform") {
                    format!(
                        "{}\n\n\
                        Valid transforms: snakecase, camelcase, lispcase, pascalcase, titlecase, keep\n\
                        Example: tagsmith --file main.go --struct Server --add-tags json --transform camelcase",
                        msg
                    )
                } else if msg.contains("is not passed") || msg.contains("pick one") {
                    format!(
                        "{}\n\n\
                        Select fields with exactly one of:\n\
                        • --line 4 or --line 4,8\n\
                        • --offset <byte offset inside a struct>\n\
                        • --struct <name> [--field <name>]\n\
                        • --all",
                        msg
                    )
                } else {
                    msg.clone()
                }
            }
            TagsmithError::SelectionOutOfRange {
                check: RangeCheck::Resolve,
                valid_max,
                ..
            } => {
                format!(
                    "{}\n\n\
                    The file has {} line(s); line numbers start at 1.",
                    self, valid_max
                )
            }
            _ => self.to_string(),
        }
    }
}

/// Result type using TagsmithError
pub type Result<T> = std::result::Result<T, TagsmithError>;
