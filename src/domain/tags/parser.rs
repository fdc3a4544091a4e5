//! Struct tag parsing and serialization
//!
//! A struct tag is a sequence of `key:"value"` pairs separated by spaces,
//! where the value is a Go-quoted string holding `name,option,option...`.

use super::literal;
use std::fmt;
use thiserror::Error;

/// Failure while reading or rewriting a single field's tag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    #[error("bad syntax for struct tag key")]
    KeySyntax,

    #[error("bad syntax for struct tag pair")]
    PairSyntax,

    #[error("bad syntax for struct tag value")]
    ValueSyntax,

    #[error("invalid tag literal {0}")]
    Literal(String),

    #[error("duplicate struct tag key {0:?}")]
    DuplicateKey(String),

    #[error("tag key does not exist")]
    MissingKey,
}

/// One `key:"name,options..."` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub key: String,
    pub name: String,
    pub options: Vec<String>,
}

impl Tag {
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            options: Vec::new(),
        }
    }

    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }

    /// The unquoted value: name followed by the options.
    pub fn value(&self) -> String {
        if self.options.is_empty() {
            self.name.clone()
        } else {
            format!("{},{}", self.name, self.options.join(","))
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.key, literal::quote(&self.value()))
    }
}

/// Ordered tags of one field. Keys are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    tags: Vec<Tag>,
}

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the raw field literal (including its quotes). Empty input
    /// yields an empty set.
    pub fn from_literal(raw: &str) -> Result<Self, TagError> {
        if raw.is_empty() {
            return Ok(Self::new());
        }
        let body = literal::unquote(raw).ok_or_else(|| TagError::Literal(raw.to_string()))?;
        Self::parse(&body)
    }

    /// Parse an unquoted tag string.
    pub fn parse(input: &str) -> Result<Self, TagError> {
        let mut set = TagSet::new();
        let mut rest = input.as_bytes();

        loop {
            while let [b' ', tail @ ..] = rest {
                rest = tail;
            }
            if rest.is_empty() {
                break;
            }

            // key runs up to ':'; spaces, quotes and control bytes are illegal
            let key_len = rest
                .iter()
                .position(|&b| b <= b' ' || b == b':' || b == b'"' || b == 0x7f)
                .unwrap_or(rest.len());
            if key_len == 0 {
                return Err(TagError::KeySyntax);
            }
            if key_len + 1 >= rest.len() || rest[key_len] != b':' {
                return Err(TagError::PairSyntax);
            }
            if rest[key_len + 1] != b'"' {
                return Err(TagError::ValueSyntax);
            }

            let key = std::str::from_utf8(&rest[..key_len]).map_err(|_| TagError::KeySyntax)?;
            rest = &rest[key_len + 1..];

            let mut i = 1;
            while i < rest.len() && rest[i] != b'"' {
                if rest[i] == b'\\' {
                    i += 1;
                }
                i += 1;
            }
            if i >= rest.len() {
                return Err(TagError::ValueSyntax);
            }

            let quoted = std::str::from_utf8(&rest[..=i]).map_err(|_| TagError::ValueSyntax)?;
            let value = literal::unquote(quoted).ok_or(TagError::ValueSyntax)?;
            rest = &rest[i + 1..];

            let mut parts = value.split(',');
            let name = parts.next().unwrap_or_default().to_string();
            let options = parts.map(str::to_string).collect();

            if set.get(key).is_some() {
                return Err(TagError::DuplicateKey(key.to_string()));
            }
            set.tags.push(Tag {
                key: key.to_string(),
                name,
                options,
            });
        }

        Ok(set)
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn keys(&self) -> Vec<&str> {
        self.tags.iter().map(|t| t.key.as_str()).collect()
    }

    pub fn get(&self, key: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.key == key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Tag> {
        self.tags.iter_mut().find(|t| t.key == key)
    }

    /// Insert or replace by key, keeping the position of an existing entry.
    pub fn set(&mut self, tag: Tag) -> Result<(), TagError> {
        if tag.key.is_empty() {
            return Err(TagError::MissingKey);
        }
        match self.get_mut(&tag.key) {
            Some(existing) => *existing = tag,
            None => self.tags.push(tag),
        }
        Ok(())
    }

    pub fn delete(&mut self, keys: &[String]) {
        self.tags.retain(|t| !keys.contains(&t.key));
    }

    pub fn clear(&mut self) {
        self.tags.clear();
    }

    pub fn clear_options(&mut self) {
        for tag in &mut self.tags {
            tag.options.clear();
        }
    }

    pub fn delete_option(&mut self, key: &str, option: &str) {
        if let Some(tag) = self.get_mut(key) {
            tag.options.retain(|o| o != option);
        }
    }

    /// Append an option unless present. A missing key is created with an
    /// empty name.
    pub fn add_option(&mut self, key: &str, option: &str) -> Result<(), TagError> {
        if key.is_empty() {
            return Err(TagError::MissingKey);
        }
        match self.get_mut(key) {
            Some(tag) => {
                if !tag.has_option(option) {
                    tag.options.push(option.to_string());
                }
            }
            None => {
                let mut tag = Tag::new(key, "");
                tag.options.push(option.to_string());
                self.tags.push(tag);
            }
        }
        Ok(())
    }

    /// Stable sort by key.
    pub fn sort(&mut self) {
        self.tags.sort_by(|a, b| a.key.cmp(&b.key));
    }

    /// Serialize to a backtick literal, or `None` when there is nothing left.
    pub fn to_literal(&self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(format!("`{}`", self))
        }
    }
}

impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.tags.iter().map(Tag::to_string).collect();
        write!(f, "{}", rendered.join(" "))
    }
}
