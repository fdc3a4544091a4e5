//! Tag modification recipe and the per-field rewrite pipeline

use super::parser::{Tag, TagError, TagSet};
use crate::domain::case::{apply_template, Transform};
use crate::error::{Result, TagsmithError};

/// Describes how tags change for every selected field.
///
/// Steps run in a fixed order: remove keys, remove options, clear, clear
/// options, add keys, add options, sort.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Modification {
    /// Keys to add; `key:literal` pins the name instead of deriving it
    pub add: Vec<String>,
    /// `(key, option)` pairs to append
    pub add_options: Vec<(String, String)>,
    pub remove: Vec<String>,
    pub remove_options: Vec<(String, String)>,
    /// Replace the name of keys that already exist when adding
    pub overwrite: bool,
    pub skip_unexported_fields: bool,
    pub transform: Transform,
    pub sort: bool,
    /// Template for derived names, e.g. `column:{field}`
    pub value_format: Option<String>,
    pub clear: bool,
    pub clear_options: bool,
}

impl Modification {
    /// At least one operation has to be requested.
    pub fn validate(&self) -> Result<()> {
        if self.add.is_empty()
            && self.add_options.is_empty()
            && !self.clear
            && !self.clear_options
            && self.remove_options.is_empty()
            && self.remove.is_empty()
        {
            return Err(TagsmithError::Config(
                "one of [--add-tags, --add-options, --remove-tags, --remove-options, \
                 --clear-tags, --clear-options] should be defined"
                    .to_string(),
            ));
        }
        Ok(())
    }

    /// Compute the new tag literal for one field.
    ///
    /// `raw_tag` is the literal as written in source (with its quotes), or
    /// empty when the field has no tag. Returns `None` when no tags remain.
    pub fn process_field(
        &self,
        field_name: &str,
        raw_tag: &str,
    ) -> std::result::Result<Option<String>, TagError> {
        let mut tags = TagSet::from_literal(raw_tag)?;

        tags.delete(&self.remove);
        for (key, option) in &self.remove_options {
            tags.delete_option(key, option);
        }

        if self.clear {
            tags.clear();
        }
        if self.clear_options {
            tags.clear_options();
        }

        self.add_tags(field_name, &mut tags)?;

        for (key, option) in &self.add_options {
            tags.add_option(key, option)?;
        }

        if self.sort {
            tags.sort();
        }

        Ok(tags.to_literal())
    }

    /// Name derived from the field identifier, before any literal override.
    pub fn derived_name(&self, field_name: &str) -> String {
        let name = self.transform.apply(field_name);
        match &self.value_format {
            Some(template) if !template.is_empty() => apply_template(template, &name),
            _ => name,
        }
    }

    fn add_tags(&self, field_name: &str, tags: &mut TagSet) -> std::result::Result<(), TagError> {
        if self.add.is_empty() {
            return Ok(());
        }

        let derived = self.derived_name(field_name);
        for entry in &self.add {
            let (key, name) = match entry.split_once(':') {
                Some((key, literal)) => (key, literal.to_string()),
                None => (entry.as_str(), derived.clone()),
            };

            match tags.get_mut(key) {
                Some(existing) => {
                    if self.overwrite {
                        existing.name = name;
                    }
                }
                None => tags.set(Tag::new(key, name))?,
            }
        }

        Ok(())
    }
}

/// Parse `key=option` items. Only the first `=` separates key from option.
pub fn parse_key_options(items: &[String]) -> Result<Vec<(String, String)>> {
    items
        .iter()
        .map(|item| match item.split_once('=') {
            Some((key, option)) => Ok((key.to_string(), option.to_string())),
            None => Err(TagsmithError::Config(format!(
                "invalid option {:?}; should be key=option",
                item
            ))),
        })
        .collect()
}
