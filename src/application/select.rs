//! Resolve a selection criterion into a concrete byte and line range

use crate::domain::SelectionCriterion;
use crate::error::{RangeCheck, Result, TagsmithError};
use crate::infrastructure::{SourceFile, Span};
use tracing::debug;

/// Inclusive byte range and the lines it covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
    pub start_line: usize,
    pub end_line: usize,
}

impl Selection {
    fn from_bytes(file: &SourceFile, start: usize, end: usize) -> Self {
        Selection {
            start,
            end,
            start_line: file.lines.line_of(start),
            end_line: file.lines.line_of(end),
        }
    }

    /// Whether a field spanning `span` overlaps the selection
    pub fn overlaps(&self, span: Span) -> bool {
        span.intersects(self.start, self.end)
    }
}

pub fn resolve(file: &SourceFile, criterion: &SelectionCriterion) -> Result<Selection> {
    let selection = match criterion {
        SelectionCriterion::LineRange { start, end } => line_selection(file, criterion, *start, *end)?,
        SelectionCriterion::Offset(offset) => offset_selection(file, *offset)?,
        SelectionCriterion::Struct { name, field } => {
            struct_selection(file, name, field.as_deref())?
        }
        SelectionCriterion::All => Selection::from_bytes(file, 0, file.text.len()),
    };

    debug!(
        criterion = %criterion,
        start = selection.start,
        end = selection.end,
        "resolved selection to lines {}..={}",
        selection.start_line,
        selection.end_line
    );
    Ok(selection)
}

fn line_selection(
    file: &SourceFile,
    criterion: &SelectionCriterion,
    start: usize,
    end: usize,
) -> Result<Selection> {
    if start > end {
        return Err(TagsmithError::Selection(
            "wrong range. start line cannot be larger than end line".to_string(),
        ));
    }

    let line_count = file.line_count();
    let offending = if start < 1 {
        Some(start)
    } else if end > line_count {
        Some(end)
    } else {
        None
    };
    if let Some(requested) = offending {
        return Err(TagsmithError::SelectionOutOfRange {
            selection: criterion.to_string(),
            requested,
            valid_min: 1,
            valid_max: line_count,
            check: RangeCheck::Resolve,
        });
    }

    Ok(Selection {
        start: file.lines.line_start(start),
        end: file.lines.line_end(end),
        start_line: start,
        end_line: end,
    })
}

/// Pick among candidate struct indices: one with no other candidate nested
/// inside it, first in document order.
fn innermost(file: &SourceFile, candidates: &[usize]) -> Option<usize> {
    candidates.iter().copied().find(|&c| {
        let outer = file.structs[c].span;
        !candidates.iter().any(|&other| {
            let inner = file.structs[other].span;
            other != c && inner != outer && outer.start <= inner.start && inner.end <= outer.end
        })
    })
}

fn offset_selection(file: &SourceFile, offset: usize) -> Result<Selection> {
    let candidates: Vec<usize> = file
        .decls
        .iter()
        .map(|d| d.struct_index)
        .filter(|&i| file.structs[i].span.contains(offset))
        .collect();

    let index = innermost(file, &candidates).ok_or_else(|| {
        TagsmithError::Selection("offset is not inside a struct".to_string())
    })?;

    let span = file.structs[index].span;
    Ok(Selection::from_bytes(file, span.start, span.end))
}

fn struct_selection(file: &SourceFile, name: &str, field: Option<&str>) -> Result<Selection> {
    let candidates: Vec<usize> = file
        .decls
        .iter()
        .filter(|d| d.name.as_deref() == Some(name))
        .map(|d| d.struct_index)
        .collect();

    let index = innermost(file, &candidates).ok_or_else(|| {
        TagsmithError::Selection("struct name does not exist".to_string())
    })?;

    let span = match field {
        None => file.structs[index].span,
        Some(field_name) => file
            .struct_fields(index)
            .filter(|f| f.names.iter().any(|n| n.name == field_name))
            .last()
            .map(|f| f.span)
            .ok_or_else(|| {
                TagsmithError::Selection(format!(
                    "struct {:?} doesn't have field name {:?}",
                    name, field_name
                ))
            })?,
    };

    Ok(Selection::from_bytes(file, span.start, span.end))
}
