//! Output format selection

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How the rewritten file is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// The whole rewritten file
    #[default]
    Source,
    /// The selected lines as a JSON document
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "source" => Ok(OutputFormat::Source),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!(
                "invalid format value: {}. Valid formats: source, json",
                s
            )),
        }
    }
}
