//! Serde data structures for the Caldera configuration file.
//!
//! Contains [`Config`] (the root), [`CorrelationConfig`] and
//! [`ThingConfig`]. All types derive `Serialize` and `Deserialize`
//! with `deny_unknown_fields` for strict parsing. Every field has a
//! default, so an empty file (or no file at all) is a valid config.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const DEFAULT_CORRELATION_HEADER: &str = "RacCorrelationId";
pub const DEFAULT_THING_NAME: &str = "thing";

fn default_header() -> String {
    DEFAULT_CORRELATION_HEADER.to_string()
}

fn default_name() -> String {
    DEFAULT_THING_NAME.to_string()
}

fn is_default_header(v: &str) -> bool {
    v == DEFAULT_CORRELATION_HEADER
}

fn is_default_name(v: &str) -> bool {
    v == DEFAULT_THING_NAME
}

fn is_default_source(v: &ThingSource) -> bool {
    *v == ThingSource::default()
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default, skip_serializing_if = "CorrelationConfig::is_default")]
    pub correlation: CorrelationConfig,

    #[serde(default, skip_serializing_if = "ThingConfig::is_default")]
    pub thing: ThingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CorrelationConfig {
    /// Header carrying the correlation id on both request and response.
    #[serde(default = "default_header", skip_serializing_if = "is_default_header")]
    pub header: String,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            header: default_header(),
        }
    }
}

impl CorrelationConfig {
    fn is_default(&self) -> bool {
        is_default_header(&self.header)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThingSource {
    /// Return the configured thing verbatim.
    Static,
    /// Return a fresh thing with a new id and serial per request.
    #[default]
    Generated,
}

impl ThingSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Generated => "generated",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ThingConfig {
    #[serde(default, skip_serializing_if = "is_default_source")]
    pub source: ThingSource,

    #[serde(default = "default_name", skip_serializing_if = "is_default_name")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl Default for ThingConfig {
    fn default() -> Self {
        Self {
            source: ThingSource::default(),
            name: default_name(),
            description: None,
            attributes: BTreeMap::new(),
        }
    }
}

impl ThingConfig {
    fn is_default(&self) -> bool {
        is_default_source(&self.source)
            && is_default_name(&self.name)
            && self.description.is_none()
            && self.attributes.is_empty()
    }
}
