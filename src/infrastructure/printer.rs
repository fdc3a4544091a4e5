//! Re-emit a parsed file with its rewritten tags
//!
//! Only struct fields are touched. A field that sits alone on its line is
//! re-aligned together with the neighbouring one-per-line fields of the same
//! struct, the way gofmt lays out a field block. Any other field gets its tag
//! literal spliced in place.

use super::align::align;
use super::syntax::{FieldSite, SourceFile, Span};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintMode {
    /// Source text only
    Plain,
    /// Emit `//line <file>:<n>` wherever output lines stop matching input lines
    SourcePos,
}

/// Render the file with the current tag of every field.
pub fn print(file: &SourceFile, mode: PrintMode) -> String {
    let edits = collect_edits(file);
    match mode {
        PrintMode::Plain => apply(&file.text, &edits),
        PrintMode::SourcePos => with_line_directives(file, &edits),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Edit {
    span: Span,
    text: String,
}

/// Placement of a field that owns its whole line
struct LineLayout<'a> {
    content_end: usize,
    comment: Option<&'a str>,
}

fn collect_edits(file: &SourceFile) -> Vec<Edit> {
    let mut edits = Vec::new();

    for st in &file.structs {
        let mut aligned: HashSet<usize> = HashSet::new();

        for run in alignment_runs(file, &st.fields) {
            if !run.iter().any(|&i| file.fields[i].tag_changed()) {
                continue;
            }
            edits.extend(realign(file, &run));
            aligned.extend(run);
        }

        for &i in &st.fields {
            if aligned.contains(&i) {
                continue;
            }
            if let Some(edit) = splice(&file.fields[i]) {
                edits.push(edit);
            }
        }
    }

    edits.sort_by_key(|e| (e.span.start, e.span.end));
    edits
}

/// End of a line's content, before any `\r\n` or final `\n`.
fn content_end(file: &SourceFile, line: usize) -> usize {
    let start = file.lines.line_start(line);
    let bytes = file.text.as_bytes();
    let mut end = file.lines.line_end(line);
    if end > start && bytes[end - 1] == b'\n' {
        end -= 1;
    }
    if end > start && bytes[end - 1] == b'\r' {
        end -= 1;
    }
    end
}

/// Whether the field's type holds a struct with fields of its own
fn has_nested_fields(file: &SourceFile, field: &FieldSite) -> bool {
    file.fields.iter().any(|other| {
        field.type_span.start <= other.span.start && other.span.end <= field.type_span.end
    })
}

fn layout<'a>(file: &'a SourceFile, field: &FieldSite) -> Option<LineLayout<'a>> {
    if field.line != field.end_line || has_nested_fields(file, field) {
        return None;
    }

    let start = file.lines.line_start(field.line);
    let end = content_end(file, field.line);
    if field.span.end > end {
        return None;
    }

    let indent = &file.text[start..field.span.start];
    if !indent.chars().all(|c| c == ' ' || c == '\t') {
        return None;
    }

    let rest = file.text[field.span.end..end].trim();
    let comment = if rest.is_empty() {
        None
    } else if rest.starts_with("//") {
        Some(rest)
    } else {
        return None;
    };

    Some(LineLayout {
        content_end: end,
        comment,
    })
}

/// Groups of fields on consecutive lines, one field per line.
fn alignment_runs(file: &SourceFile, fields: &[usize]) -> Vec<Vec<usize>> {
    let mut runs: Vec<Vec<usize>> = Vec::new();
    let mut current: Vec<usize> = Vec::new();
    let mut last_line = 0;

    for &i in fields {
        let field = &file.fields[i];
        if layout(file, field).is_none() {
            if !current.is_empty() {
                runs.push(std::mem::take(&mut current));
            }
            continue;
        }
        if !current.is_empty() && field.line != last_line + 1 {
            runs.push(std::mem::take(&mut current));
        }
        last_line = field.line;
        current.push(i);
    }
    if !current.is_empty() {
        runs.push(current);
    }

    runs
}

fn cells(file: &SourceFile, field: &FieldSite, comment: Option<&str>) -> Vec<String> {
    let mut cells = Vec::new();
    if field.is_embedded() {
        cells.push(file.text[field.span.start..field.type_span.end].to_string());
    } else {
        let names: Vec<&str> = field.names.iter().map(|n| n.name.as_str()).collect();
        cells.push(names.join(", "));
        cells.push(file.slice(field.type_span).to_string());
    }

    let tag = field.tag.clone().unwrap_or_default();
    match comment {
        Some(comment) => {
            cells.push(tag);
            cells.push(comment.to_string());
        }
        None if !tag.is_empty() => cells.push(tag),
        None => {}
    }
    cells
}

fn realign(file: &SourceFile, run: &[usize]) -> Vec<Edit> {
    let mut rows = Vec::with_capacity(run.len());
    let mut ends = Vec::with_capacity(run.len());

    for &i in run {
        let field = &file.fields[i];
        let Some(layout) = layout(file, field) else {
            continue;
        };
        rows.push(cells(file, field, layout.comment));
        ends.push((field.span.start, layout.content_end));
    }

    align(&rows)
        .into_iter()
        .zip(ends)
        .map(|(text, (start, end))| Edit {
            span: Span::new(start, end),
            text,
        })
        .collect()
}

fn splice(field: &FieldSite) -> Option<Edit> {
    if !field.tag_changed() {
        return None;
    }

    let type_end = field.type_span.end;
    match (&field.original_tag, &field.tag) {
        (Some((span, _)), Some(tag)) => Some(Edit {
            span: *span,
            text: tag.clone(),
        }),
        (Some((span, _)), None) => Some(Edit {
            span: Span::new(type_end, span.end),
            text: String::new(),
        }),
        (None, Some(tag)) => Some(Edit {
            span: Span::new(type_end, type_end),
            text: format!(" {}", tag),
        }),
        (None, None) => None,
    }
}

fn apply(text: &str, edits: &[Edit]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    for edit in edits {
        out.push_str(&text[pos..edit.span.start]);
        out.push_str(&edit.text);
        pos = edit.span.end;
    }
    out.push_str(&text[pos..]);
    out
}

/// Output lines paired with the input line each one starts on
#[derive(Default)]
struct LineBuilder {
    lines: Vec<(String, usize)>,
    buf: String,
    origin: Option<usize>,
}

impl LineBuilder {
    fn feed(&mut self, text: &str, origin_of: impl Fn(usize) -> usize) {
        for (i, c) in text.char_indices() {
            let origin = *self.origin.get_or_insert_with(|| origin_of(i));
            if c == '\n' {
                self.lines.push((std::mem::take(&mut self.buf), origin));
                self.origin = None;
            } else {
                self.buf.push(c);
            }
        }
    }
}

fn with_line_directives(file: &SourceFile, edits: &[Edit]) -> String {
    let mut builder = LineBuilder::default();
    let mut pos = 0;

    for edit in edits {
        let base = pos;
        builder.feed(&file.text[pos..edit.span.start], |i| {
            file.lines.line_of(base + i)
        });
        let anchor = file.lines.line_of(edit.span.start);
        builder.feed(&edit.text, |_| anchor);
        pos = edit.span.end;
    }
    let base = pos;
    builder.feed(&file.text[pos..], |i| file.lines.line_of(base + i));

    let partial = builder.origin.map(|origin| (builder.buf, origin));

    let mut out = String::new();
    let mut expected = 1;
    for (text, origin) in builder.lines.iter().chain(partial.iter()) {
        if *origin != expected {
            out.push_str(&format!("//line {}:{}\n", file.path, origin));
        }
        out.push_str(text);
        out.push('\n');
        expected = origin + 1;
    }
    if partial.is_some() {
        out.pop();
    }
    out
}
