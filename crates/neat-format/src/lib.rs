//! YAML/JSON conversion around the neat engine.
//!
//! The engine only sees JSON-shaped trees. This crate detects the input
//! format, converts YAML in, and converts the cleaned tree back out in the
//! requested format.

use neat_core::{Neat, NeatError};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum FormatError {
    #[error("error converting from yaml to json: {0}")]
    YamlToJson(#[source] serde_yaml::Error),
    #[error("error converting from json to yaml: {0}")]
    JsonToYaml(#[source] serde_yaml::Error),
    #[error("error rendering json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("error neating: {0}")]
    Neat(#[from] NeatError),
    #[error("unknown output format {0:?}, expected yaml, json or same")]
    UnknownFormat(String),
}

pub type Result<T> = std::result::Result<T, FormatError>;

/// Requested output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    Json,
    Yaml,
    /// Whatever the input was.
    #[default]
    Same,
}

impl FromStr for OutputFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(Self::Json),
            "yaml" => Ok(Self::Yaml),
            "same" => Ok(Self::Same),
            other => Err(FormatError::UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Same => "same",
        })
    }
}

/// Input is JSON when its first non-whitespace character is `{`.
pub fn is_json(input: &str) -> bool {
    input.trim_start().starts_with('{')
}

/// Decodes YAML into a JSON tree, expanding `<<` merge keys.
///
/// Scalars follow YAML 1.2: `yes`, `no`, `on` and `off` stay strings.
pub fn yaml_to_json(input: &str) -> Result<Value> {
    let mut doc: serde_yaml::Value = serde_yaml::from_str(input).map_err(FormatError::YamlToJson)?;
    doc.apply_merge().map_err(FormatError::YamlToJson)?;
    serde_yaml::from_value(doc).map_err(FormatError::YamlToJson)
}

pub fn json_to_yaml(doc: &Value) -> Result<String> {
    serde_yaml::to_string(doc).map_err(FormatError::JsonToYaml)
}

/// Cleans `input`, converting to and from YAML as needed.
///
/// JSON output is pretty-printed.
pub fn neat_yaml_or_json(input: &str, format: OutputFormat, engine: &Neat) -> Result<String> {
    if input.is_empty() {
        return Err(NeatError::EmptyInput.into());
    }
    if input.trim().is_empty() {
        return Err(NeatError::invalid(input).into());
    }
    let from_yaml = !is_json(input);
    debug!(from_yaml, %format, "neating document");

    let doc = if from_yaml {
        yaml_to_json(input)?
    } else {
        serde_json::from_str(input).map_err(|_| NeatError::invalid(input))?
    };
    let cleaned = engine.neat_value(doc)?;

    match format {
        OutputFormat::Yaml => json_to_yaml(&cleaned),
        OutputFormat::Same if from_yaml => json_to_yaml(&cleaned),
        _ => Ok(serde_json::to_string_pretty(&cleaned)? + "\n"),
    }
}
