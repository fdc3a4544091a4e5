//! CLI argument definitions

use crate::application::ModifyOptions;
use crate::domain::tags::parse_key_options;
use crate::domain::{Modification, OutputFormat, SelectionCriterion, Transform};
use crate::error::{Result, TagsmithError};
use crate::infrastructure::Config;
use clap::{Parser, ValueEnum};
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(name = "tagsmith")]
#[command(about = "Add, remove and reformat Go struct field tags", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Go source file to edit
    #[arg(long, value_name = "PATH")]
    pub file: String,

    /// Line or inclusive line range to select, i.e: 4 or 4,8
    #[arg(long, value_name = "N[,M]", help_heading = "Selection")]
    pub line: Option<String>,

    /// Byte offset of the cursor; selects the enclosing struct
    #[arg(long, value_name = "BYTES", help_heading = "Selection")]
    pub offset: Option<usize>,

    /// Struct name to select
    #[arg(long = "struct", value_name = "NAME", help_heading = "Selection")]
    pub struct_name: Option<String>,

    /// Single field of the selected struct
    #[arg(long, value_name = "NAME", help_heading = "Selection")]
    pub field: Option<String>,

    /// Select every struct in the file
    #[arg(long, help_heading = "Selection")]
    pub all: bool,

    /// Keys to add, e.g. json,xml or json:custom_name
    #[arg(long, value_delimiter = ',', value_name = "KEYS", help_heading = "Modification")]
    pub add_tags: Vec<String>,

    /// Options to add, e.g. json=omitempty,hcl=squash
    #[arg(long, value_delimiter = ',', value_name = "KEY=OPTION", help_heading = "Modification")]
    pub add_options: Vec<String>,

    /// Keys to remove, e.g. json,xml
    #[arg(long, value_delimiter = ',', value_name = "KEYS", help_heading = "Modification")]
    pub remove_tags: Vec<String>,

    /// Options to remove, e.g. json=omitempty
    #[arg(long, value_delimiter = ',', value_name = "KEY=OPTION", help_heading = "Modification")]
    pub remove_options: Vec<String>,

    /// Remove every tag
    #[arg(long, help_heading = "Modification")]
    pub clear_tags: bool,

    /// Remove every option
    #[arg(long, help_heading = "Modification")]
    pub clear_options: bool,

    /// Replace the name of keys that already exist
    #[arg(long = "override", help_heading = "Modification")]
    pub overwrite: bool,

    /// Leave unexported fields alone
    #[arg(long, help_heading = "Modification")]
    pub skip_unexported: bool,

    /// Name transform (snakecase, camelcase, lispcase, pascalcase, titlecase, keep)
    #[arg(long, value_name = "NAME", help_heading = "Modification")]
    pub transform: Option<String>,

    /// Sort tags by key
    #[arg(long, help_heading = "Modification")]
    pub sort: bool,

    /// Template for derived names, e.g. column:{field}
    #[arg(long, value_name = "FORMAT", help_heading = "Modification")]
    pub template: Option<String>,

    /// Output format (source, json)
    #[arg(long, value_name = "FORMAT", help_heading = "Output")]
    pub format: Option<String>,

    /// Write the result back to the file
    #[arg(short, long, help_heading = "Output")]
    pub write: bool,

    /// Don't print the result
    #[arg(short, long, help_heading = "Output")]
    pub quiet: bool,

    /// Read an archive of modified files from standard input
    #[arg(long, help_heading = "Output")]
    pub modified: bool,

    /// Log verbosity; RUST_LOG takes precedence
    #[arg(long, value_enum, default_value = "warn")]
    pub log_level: LogLevel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

impl Cli {
    /// Merge flags with file defaults. Flags win.
    pub fn modify_options(&self, config: &Config) -> Result<ModifyOptions> {
        let criterion = SelectionCriterion::from_parts(
            self.line.as_deref(),
            self.offset,
            self.struct_name.as_deref(),
            self.field.as_deref(),
            self.all,
        )?;

        let transform = match &self.transform {
            Some(name) => Transform::from_str(name).map_err(TagsmithError::Config)?,
            None => config.transform.unwrap_or_default(),
        };

        let format = match &self.format {
            Some(name) => OutputFormat::from_str(name).map_err(TagsmithError::Config)?,
            None => config.format.unwrap_or_default(),
        };

        let modification = Modification {
            add: self.add_tags.clone(),
            add_options: parse_key_options(&self.add_options)?,
            remove: self.remove_tags.clone(),
            remove_options: parse_key_options(&self.remove_options)?,
            overwrite: self.overwrite,
            skip_unexported_fields: self.skip_unexported || config.skip_unexported.unwrap_or(false),
            transform,
            sort: self.sort || config.sort.unwrap_or(false),
            value_format: self.template.clone().or_else(|| config.template.clone()),
            clear: self.clear_tags,
            clear_options: self.clear_options,
        };

        Ok(ModifyOptions {
            file: self.file.clone(),
            criterion,
            modification,
            format,
            write: self.write,
        })
    }
}
