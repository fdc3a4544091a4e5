//! Go source parsing into struct types and field sites
//!
//! Uses the tree-sitter Go grammar to locate every `struct { ... }` type in a
//! file, the fields declared inside it and the declarations a struct can be
//! reached from by name (type specs, variables, parameters, fields) or by
//! position (composite literals). Field tags live in an owned arena on the
//! `SourceFile`; rewriting a tag never touches the syntax tree itself.

use crate::error::{Result, TagsmithError};
use std::collections::HashMap;
use std::ops::Range;
use tree_sitter::{Node, Parser as TsParser};

/// Byte span, end exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Inclusive on both ends
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }

    pub fn intersects(&self, start: usize, end: usize) -> bool {
        start <= self.end && self.start <= end
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Span::new(range.start, range.end)
    }
}

/// Byte offsets of line starts. A trailing newline does not open a new line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let len = text.len();
        let mut starts = vec![0];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' && i + 1 < len {
                starts.push(i + 1);
            }
        }
        Self { starts, len }
    }

    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    /// 1-based line containing `offset`
    pub fn line_of(&self, offset: usize) -> usize {
        self.starts.partition_point(|&s| s <= offset).max(1)
    }

    /// 1-based byte column of `offset`
    pub fn column_of(&self, offset: usize) -> usize {
        offset - self.line_start(self.line_of(offset)) + 1
    }

    pub fn line_start(&self, line: usize) -> usize {
        let line = line.clamp(1, self.line_count());
        self.starts[line - 1]
    }

    /// Offset of the newline ending `line`, or end of file for the last line.
    pub fn line_end(&self, line: usize) -> usize {
        if line >= self.line_count() {
            self.len
        } else {
            self.starts[line] - 1
        }
    }
}

/// A field (or parameter) identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

/// One field declaration inside a struct type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSite {
    /// Declared names; empty for embedded fields
    pub names: Vec<Ident>,
    pub type_span: Span,
    /// Type name of an embedded field written as a bare identifier
    pub embedded_ident: Option<String>,
    pub span: Span,
    pub line: usize,
    pub column: usize,
    pub end_line: usize,
    /// Tag literal as found in the source
    pub original_tag: Option<(Span, String)>,
    /// Current tag literal, including its quotes
    pub tag: Option<String>,
}

impl FieldSite {
    pub fn is_embedded(&self) -> bool {
        self.names.is_empty()
    }

    pub fn tag_changed(&self) -> bool {
        self.original_tag.as_ref().map(|(_, text)| text) != self.tag.as_ref()
    }
}

/// A `struct { ... }` type expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructType {
    pub span: Span,
    /// Indices into `SourceFile::fields`
    pub fields: Vec<usize>,
}

/// A declaration a struct type can be selected through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeDecl {
    /// Declared name; `None` for composite literals and unnamed parameters
    pub name: Option<String>,
    /// Index into `SourceFile::structs`
    pub struct_index: usize,
}

/// A parsed Go file.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: String,
    pub text: String,
    pub lines: LineIndex,
    pub fields: Vec<FieldSite>,
    /// Every struct type, in document order
    pub structs: Vec<StructType>,
    /// Named or literal declarations of struct types, in document order
    pub decls: Vec<CompositeDecl>,
}

impl SourceFile {
    /// Parse Go source. Any syntax error is fatal.
    pub fn parse(path: &str, text: impl Into<String>) -> Result<Self> {
        let text = text.into();

        let mut parser = TsParser::new();
        parser
            .set_language(&tree_sitter_go::LANGUAGE.into())
            .map_err(|e| TagsmithError::Parse(format!("failed to load Go grammar: {}", e)))?;

        let tree = parser
            .parse(&text, None)
            .ok_or_else(|| TagsmithError::Parse(format!("{}: failed to parse", path)))?;

        let root = tree.root_node();
        let lines = LineIndex::new(&text);

        if root.has_error() {
            let at = first_error(root).map(|n| n.start_byte()).unwrap_or(0);
            return Err(TagsmithError::Parse(format!(
                "{}:{}:{}: syntax error",
                path,
                lines.line_of(at),
                lines.column_of(at)
            )));
        }

        let mut collector = Collector {
            text: &text,
            lines: &lines,
            fields: Vec::new(),
            structs: Vec::new(),
            pending_decls: Vec::new(),
        };
        collector.visit(root);

        let Collector {
            fields,
            structs,
            pending_decls,
            ..
        } = collector;

        let by_start: HashMap<usize, usize> = structs
            .iter()
            .enumerate()
            .map(|(i, s)| (s.span.start, i))
            .collect();

        let mut decls: Vec<CompositeDecl> = Vec::new();
        for (name, start) in pending_decls {
            let Some(&struct_index) = by_start.get(&start) else {
                continue;
            };
            if decls.iter().any(|d| d.struct_index == struct_index) {
                continue;
            }
            decls.push(CompositeDecl { name, struct_index });
        }

        Ok(SourceFile {
            path: path.to_string(),
            text,
            lines,
            fields,
            structs,
            decls,
        })
    }

    pub fn line_count(&self) -> usize {
        self.lines.line_count()
    }

    pub fn slice(&self, span: Span) -> &str {
        &self.text[span.range()]
    }

    /// Fields declared directly in the given struct type
    pub fn struct_fields(&self, struct_index: usize) -> impl Iterator<Item = &FieldSite> {
        self.structs[struct_index]
            .fields
            .iter()
            .map(move |&i| &self.fields[i])
    }
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|c| c.has_error())
        .find_map(first_error)
}

/// Strip pointer, slice and array wrappers down to the element type.
fn deref(node: Node<'_>) -> Node<'_> {
    match node.kind() {
        "pointer_type" => {
            let mut cursor = node.walk();
            let inner = node.named_children(&mut cursor).next();
            inner.map(deref).unwrap_or(node)
        }
        "slice_type" | "array_type" | "implicit_length_array_type" => node
            .child_by_field_name("element")
            .map(deref)
            .unwrap_or(node),
        _ => node,
    }
}

struct Collector<'a> {
    text: &'a str,
    lines: &'a LineIndex,
    fields: Vec<FieldSite>,
    structs: Vec<StructType>,
    /// (declared name, struct start byte)
    pending_decls: Vec<(Option<String>, usize)>,
}

impl<'a> Collector<'a> {
    fn visit(&mut self, node: Node<'_>) {
        match node.kind() {
            "type_spec" | "type_alias" | "var_spec" | "const_spec" | "field_declaration"
            | "parameter_declaration" | "variadic_parameter_declaration" => {
                let name = node
                    .child_by_field_name("name")
                    .map(|n| self.text[n.byte_range()].to_string());
                self.note_decl(name, node);
            }
            "composite_literal" => self.note_decl(None, node),
            "struct_type" => self.collect_struct(node),
            _ => {}
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.visit(child);
        }
    }

    fn note_decl(&mut self, name: Option<String>, node: Node<'_>) {
        let Some(ty) = node.child_by_field_name("type") else {
            return;
        };
        let target = deref(ty);
        if target.kind() == "struct_type" {
            self.pending_decls.push((name, target.start_byte()));
        }
    }

    fn collect_struct(&mut self, node: Node<'_>) {
        let mut field_indices = Vec::new();

        let mut cursor = node.walk();
        let lists: Vec<Node<'_>> = node
            .named_children(&mut cursor)
            .filter(|c| c.kind() == "field_declaration_list")
            .collect();

        for list in lists {
            let mut list_cursor = list.walk();
            let decls: Vec<Node<'_>> = list
                .named_children(&mut list_cursor)
                .filter(|c| c.kind() == "field_declaration")
                .collect();
            for decl in decls {
                if let Some(field) = self.field_site(decl) {
                    field_indices.push(self.fields.len());
                    self.fields.push(field);
                }
            }
        }

        self.structs.push(StructType {
            span: node.byte_range().into(),
            fields: field_indices,
        });
    }

    fn field_site(&self, node: Node<'_>) -> Option<FieldSite> {
        let ty = node.child_by_field_name("type")?;

        let mut cursor = node.walk();
        let names: Vec<Ident> = node
            .children_by_field_name("name", &mut cursor)
            .map(|n| Ident {
                name: self.text[n.byte_range()].to_string(),
                span: n.byte_range().into(),
            })
            .collect();

        let embedded_ident = if names.is_empty() && ty.kind() == "type_identifier" {
            let mut star_cursor = node.walk();
            let is_pointer = node.children(&mut star_cursor).any(|c| c.kind() == "*");
            (!is_pointer).then(|| self.text[ty.byte_range()].to_string())
        } else {
            None
        };

        let original_tag = node
            .child_by_field_name("tag")
            .map(|t| (Span::from(t.byte_range()), self.text[t.byte_range()].to_string()));

        let span: Span = node.byte_range().into();
        Some(FieldSite {
            names,
            type_span: ty.byte_range().into(),
            embedded_ident,
            line: self.lines.line_of(span.start),
            column: self.lines.column_of(span.start),
            end_line: self.lines.line_of(span.end.saturating_sub(1).max(span.start)),
            tag: original_tag.as_ref().map(|(_, text)| text.clone()),
            original_tag,
            span,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "package foo

type Server struct {
\tName, Alias string `json:\"name\"`
\tPort        int
\tConfig
\t*Logger
\tInner struct {
\t\tDepth int
\t}
}

var conf = []*struct {
\tHost string
}{}

func run(opts struct{ Verbose bool }) {}
";

    #[test]
    fn test_line_index() {
        let idx = LineIndex::new("a\nbc\n");
        assert_eq!(idx.line_count(), 2);
        assert_eq!(idx.line_of(0), 1);
        assert_eq!(idx.line_of(2), 2);
        assert_eq!(idx.line_of(5), 2);
        assert_eq!(idx.column_of(3), 2);
        assert_eq!(idx.line_start(2), 2);
        assert_eq!(idx.line_end(1), 1);
        assert_eq!(idx.line_end(2), 5);
    }

    #[test]
    fn test_line_index_empty() {
        let idx = LineIndex::new("");
        assert_eq!(idx.line_count(), 1);
        assert_eq!(idx.line_end(1), 0);
    }

    #[test]
    fn test_collects_structs_in_document_order() {
        let file = SourceFile::parse("sample.go", SAMPLE).unwrap();
        assert_eq!(file.structs.len(), 4);
        let starts: Vec<usize> = file.structs.iter().map(|s| s.span.start).collect();
        let mut sorted = starts.clone();
        sorted.sort();
        assert_eq!(starts, sorted);
    }

    #[test]
    fn test_collects_named_declarations() {
        let file = SourceFile::parse("sample.go", SAMPLE).unwrap();
        let names: Vec<Option<&str>> = file.decls.iter().map(|d| d.name.as_deref()).collect();
        assert_eq!(
            names,
            vec![Some("Server"), Some("Inner"), None, Some("opts")]
        );
    }

    #[test]
    fn test_field_sites() {
        let file = SourceFile::parse("sample.go", SAMPLE).unwrap();
        let server: Vec<&FieldSite> = file.struct_fields(0).collect();
        assert_eq!(server.len(), 5);

        let names: Vec<&str> = server[0].names.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["Name", "Alias"]);
        assert_eq!(server[0].tag.as_deref(), Some("`json:\"name\"`"));
        assert_eq!(server[0].line, 4);
        assert_eq!(server[0].column, 2);
        assert_eq!(file.slice(server[0].type_span), "string");

        assert_eq!(server[1].tag, None);
        assert_eq!(server[2].embedded_ident.as_deref(), Some("Config"));
        assert!(server[3].is_embedded());
        assert_eq!(server[3].embedded_ident, None);

        assert_eq!(server[4].line, 8);
        assert_eq!(server[4].end_line, 10);
    }

    #[test]
    fn test_syntax_error_is_fatal() {
        let err = SourceFile::parse("bad.go", "package foo\n\ntype x struct {\n").unwrap_err();
        assert!(matches!(err, TagsmithError::Parse(_)));
        assert!(err.to_string().starts_with("bad.go:"));
    }

    #[test]
    fn test_tag_changed() {
        let mut file = SourceFile::parse("sample.go", SAMPLE).unwrap();
        assert!(!file.fields[0].tag_changed());
        file.fields[0].tag = None;
        assert!(file.fields[0].tag_changed());
    }
}
