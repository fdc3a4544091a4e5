//! Selection criteria identifying which fields are rewritten

use crate::error::{Result, TagsmithError};
use std::fmt;

/// Exactly one way of choosing fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionCriterion {
    /// Inclusive, 1-based line range
    LineRange { start: usize, end: usize },
    /// Byte offset somewhere inside a struct type
    Offset(usize),
    /// Struct by name, optionally narrowed to one field
    Struct { name: String, field: Option<String> },
    /// Every struct in the file
    All,
}

impl SelectionCriterion {
    /// Build a criterion from the individually supplied options.
    ///
    /// Exactly one of line, offset, struct or all must be given, and a field
    /// name is only meaningful together with a struct name.
    pub fn from_parts(
        line: Option<&str>,
        offset: Option<usize>,
        struct_name: Option<&str>,
        field: Option<&str>,
        all: bool,
    ) -> Result<Self> {
        let given = [line.is_some(), offset.is_some(), struct_name.is_some(), all]
            .iter()
            .filter(|given| **given)
            .count();

        if given == 0 {
            return Err(TagsmithError::Config(
                "--line, --offset, --struct or --all is not passed".to_string(),
            ));
        }
        if given > 1 {
            return Err(TagsmithError::Config(
                "--line, --offset, --struct or --all cannot be used together. pick one"
                    .to_string(),
            ));
        }
        if field.is_some() && struct_name.is_none() {
            return Err(TagsmithError::Config(
                "--field is requiring --struct".to_string(),
            ));
        }

        if let Some(line) = line {
            let (start, end) = parse_line_range(line)?;
            return Ok(SelectionCriterion::LineRange { start, end });
        }
        if let Some(offset) = offset {
            return Ok(SelectionCriterion::Offset(offset));
        }
        if let Some(name) = struct_name {
            return Ok(SelectionCriterion::Struct {
                name: name.to_string(),
                field: field.map(str::to_string),
            });
        }
        Ok(SelectionCriterion::All)
    }
}

impl fmt::Display for SelectionCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionCriterion::LineRange { start, end } if start == end => write!(f, "{}", start),
            SelectionCriterion::LineRange { start, end } => write!(f, "{},{}", start, end),
            SelectionCriterion::Offset(offset) => write!(f, "offset {}", offset),
            SelectionCriterion::Struct { name, field: None } => write!(f, "struct {}", name),
            SelectionCriterion::Struct {
                name,
                field: Some(field),
            } => write!(f, "struct {} field {}", name, field),
            SelectionCriterion::All => write!(f, "all"),
        }
    }
}

/// Parse `n` or `n,m`; the end defaults to the start.
fn parse_line_range(input: &str) -> Result<(usize, usize)> {
    let parse = |s: &str| {
        s.trim().parse::<usize>().map_err(|_| {
            TagsmithError::Config(format!(
                "invalid line selection {:?}; expected a line or a range, i.e: 4 or 4,8",
                input
            ))
        })
    };

    match input.split_once(',') {
        Some((start, end)) => Ok((parse(start)?, parse(end)?)),
        None => {
            let start = parse(input)?;
            Ok((start, start))
        }
    }
}
