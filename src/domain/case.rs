//! Field-name case transforms used to derive tag names

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How a Go field name is turned into the name part of a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Transform {
    /// MyField -> my_field
    #[default]
    #[serde(alias = "snake")]
    SnakeCase,
    /// MyField -> myField
    #[serde(alias = "camel")]
    CamelCase,
    /// MyField -> my-field
    #[serde(alias = "lisp")]
    LispCase,
    /// MyField -> MyField
    #[serde(alias = "pascal")]
    PascalCase,
    /// MyField -> My Field
    #[serde(alias = "title")]
    TitleCase,
    /// Field name is used as is
    Keep,
}

impl Transform {
    /// Apply the transform to a field identifier.
    pub fn apply(&self, ident: &str) -> String {
        if *self == Transform::Keep {
            return ident.to_string();
        }

        let words = split_words(ident);
        match self {
            Transform::SnakeCase => words
                .iter()
                .map(|w| w.trim_matches('_'))
                .filter(|w| !w.is_empty())
                .map(str::to_lowercase)
                .collect::<Vec<_>>()
                .join("_"),
            Transform::LispCase => words
                .iter()
                .map(|w| w.to_lowercase())
                .collect::<Vec<_>>()
                .join("-"),
            Transform::CamelCase => {
                let mut titled: Vec<String> = words.iter().map(|w| title_word(w)).collect();
                if let Some(first) = titled.first_mut() {
                    *first = first.to_lowercase();
                }
                titled.concat()
            }
            Transform::PascalCase => words.iter().map(|w| title_word(w)).collect(),
            Transform::TitleCase => words
                .iter()
                .map(|w| title_word(w))
                .collect::<Vec<_>>()
                .join(" "),
            Transform::Keep => ident.to_string(),
        }
    }

    /// Canonical flag spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            Transform::SnakeCase => "snakecase",
            Transform::CamelCase => "camelcase",
            Transform::LispCase => "lispcase",
            Transform::PascalCase => "pascalcase",
            Transform::TitleCase => "titlecase",
            Transform::Keep => "keep",
        }
    }
}

impl FromStr for Transform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "snakecase" | "snake" => Ok(Transform::SnakeCase),
            "camelcase" | "camel" => Ok(Transform::CamelCase),
            "lispcase" | "lisp" => Ok(Transform::LispCase),
            "pascalcase" | "pascal" => Ok(Transform::PascalCase),
            "titlecase" | "title" => Ok(Transform::TitleCase),
            "keep" => Ok(Transform::Keep),
            _ => Err(format!("invalid transform value: {}", s)),
        }
    }
}

/// Render a transformed name through a value template.
///
/// `{field}` is replaced once; templates without it fall back to the older
/// `$field` placeholder. A template with neither is used verbatim.
pub fn apply_template(template: &str, name: &str) -> String {
    if template.contains("{field}") {
        template.replacen("{field}", name, 1)
    } else {
        template.replace("$field", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Lower,
    Upper,
    Digit,
    Other,
}

fn classify(c: char) -> CharClass {
    if c.is_lowercase() {
        CharClass::Lower
    } else if c.is_uppercase() {
        CharClass::Upper
    } else if c.is_numeric() {
        CharClass::Digit
    } else {
        CharClass::Other
    }
}

/// Split an identifier at casing boundaries.
///
/// Characters are grouped into runs of one class (lower, upper, digit,
/// other). An upper run followed by a lower run hands its last letter over,
/// so "PDFLoader" becomes ["PDF", "Loader"].
pub fn split_words(ident: &str) -> Vec<String> {
    let mut runs: Vec<Vec<char>> = Vec::new();
    let mut last: Option<CharClass> = None;

    for c in ident.chars() {
        let class = classify(c);
        match runs.last_mut() {
            Some(run) if last == Some(class) => run.push(c),
            _ => runs.push(vec![c]),
        }
        last = Some(class);
    }

    for i in 0..runs.len().saturating_sub(1) {
        let starts_upper = runs[i].first().is_some_and(|c| c.is_uppercase());
        let next_lower = runs[i + 1].first().is_some_and(|c| c.is_lowercase());
        if starts_upper && next_lower {
            if let Some(moved) = runs[i].pop() {
                runs[i + 1].insert(0, moved);
            }
        }
    }

    runs.into_iter()
        .filter(|run| !run.is_empty())
        .map(|run| run.into_iter().collect())
        .collect()
}

fn title_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
