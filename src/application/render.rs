//! Output rendering: whole source or a JSON slice of the selected lines

use crate::application::rewrite::RewriteErrors;
use crate::application::select::Selection;
use crate::domain::OutputFormat;
use crate::error::{RangeCheck, Result, TagsmithError};
use crate::infrastructure::{print, PrintMode, SourceFile};
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

fn line_directive_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^//line\s*.*:(\d+)$").unwrap())
}

/// JSON document describing the selected lines after rewriting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Output {
    pub start: usize,
    pub end: usize,
    pub lines: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

pub fn render(
    file: &SourceFile,
    selection: &Selection,
    errors: &RewriteErrors,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Source => Ok(print(file, PrintMode::Plain)),
        OutputFormat::Json => {
            let output = json_output(file, selection, errors)?;
            Ok(serde_json::to_string_pretty(&output)?)
        }
    }
}

pub fn json_output(
    file: &SourceFile,
    selection: &Selection,
    errors: &RewriteErrors,
) -> Result<Output> {
    let printed = print(file, PrintMode::SourcePos);
    let lines = reconstruct_lines(&printed)?;

    let (start, end) = (selection.start_line, selection.end_line);
    if start < 1 || start > lines.len() || end > lines.len() {
        return Err(TagsmithError::SelectionOutOfRange {
            selection: format!("{},{}", start, end),
            requested: end.max(start),
            valid_min: 1,
            valid_max: lines.len(),
            check: RangeCheck::Render,
        });
    }

    Ok(Output {
        start,
        end,
        lines: lines[start - 1..end].to_vec(),
        errors: errors.messages(),
    })
}

/// Rebuild the original line numbering from printer output.
///
/// A `//line <file>:<n>` directive makes the next line line `n`: the buffer is
/// cut back or padded with empty lines to `n - 1` entries.
pub fn reconstruct_lines(printed: &str) -> Result<Vec<String>> {
    let mut lines: Vec<String> = Vec::new();

    for line in printed.lines() {
        if !line.starts_with("//line") {
            lines.push(line.to_string());
            continue;
        }

        let number = line_directive_regex()
            .captures(line)
            .and_then(|caps| caps[1].parse::<usize>().ok())
            .filter(|n| *n >= 1)
            .ok_or_else(|| TagsmithError::Parse(format!("couldn't parse line: '{}'", line)))?;

        lines.resize(number - 1, String::new());
    }

    Ok(lines)
}
