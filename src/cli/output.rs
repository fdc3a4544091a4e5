//! Output formatting utilities

use crate::application::ModifyReport;
use crate::error::TagsmithError;

/// Text written to stdout for a finished run
pub fn format_report(report: &ModifyReport) -> String {
    format!("{}\n", report.output)
}

/// Text written to stderr for a fatal error
pub fn format_error(error: &TagsmithError) -> String {
    format!("Error: {}", error.display_with_suggestions())
}
