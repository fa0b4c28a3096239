//! # Codec Options
//!
//! Per-call switches of the two codecs. Options deserialize from YAML with
//! every field optional, so a configuration file only needs to name the
//! switches it changes:
//!
//! ```yaml
//! json:
//!   additional_properties_allowed: true
//! xml:
//!   write_namespace: false
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading options.
#[derive(Error, Debug)]
pub enum OptionsError {
    #[error("invalid codec options: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecOptions {
    pub json: JsonOptions,
    pub xml: XmlOptions,
}

impl CodecOptions {
    pub fn from_yaml_str(text: &str) -> Result<Self, OptionsError> {
        Ok(serde_yaml::from_str(text)?)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonOptions {
    /// Accept object keys that correspond to no property. Off by default.
    pub additional_properties_allowed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct XmlOptions {
    /// Accept attributes on start elements. Off by default.
    pub additional_attributes_allowed: bool,
    /// Write the `xmlns` attribute on the root element. On by default.
    pub write_namespace: bool,
}

impl Default for XmlOptions {
    fn default() -> Self {
        Self {
            additional_attributes_allowed: false,
            write_namespace: true,
        }
    }
}
