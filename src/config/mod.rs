//! Configuration loading and validation.
//!
//! Defines the [`ConfigSource`] trait for pluggable config backends, the
//! [`ConfigVersion`] enum used to report which revision is running, and
//! [`LoadedConfig`] which pairs a config with its provenance. Submodules
//! provide the data model, validation logic, and file-backed sources.

pub mod model;
pub mod sources;
pub mod validation;

use async_trait::async_trait;

use crate::error::CalderaError;
use model::Config;

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigVersion {
    Hash(String),
    Builtin,
}

impl ConfigVersion {
    /// Short form for log lines: the first 8 hex chars of the hash.
    #[must_use]
    pub fn short(&self) -> &str {
        match self {
            Self::Hash(h) => h.get(..8).unwrap_or(h),
            Self::Builtin => "builtin",
        }
    }
}

// async_trait is required here because ConfigSource is used as Box<dyn ConfigSource>
// and native async fn in traits (Rust 1.75+) does not support dyn dispatch.
#[async_trait]
pub trait ConfigSource: Send + Sync {
    fn name(&self) -> &'static str;
    async fn load(&self) -> Result<(Config, ConfigVersion), CalderaError>;
}

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub version: ConfigVersion,
    pub source_name: String,
}

impl LoadedConfig {
    /// Load from `source`, or fall back to built-in defaults when there is none.
    pub async fn load(source: Option<&dyn ConfigSource>) -> Result<Self, CalderaError> {
        let Some(source) = source else {
            return Ok(Self::builtin());
        };
        let (config, version) = source.load().await?;
        Ok(Self {
            config,
            version,
            source_name: source.name().to_string(),
        })
    }

    #[must_use]
    pub fn builtin() -> Self {
        Self {
            config: Config::default(),
            version: ConfigVersion::Builtin,
            source_name: "builtin".into(),
        }
    }
}
