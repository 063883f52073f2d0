//! Concrete [`ConfigSource`](super::ConfigSource) implementations.
//!
//! Provides the file-based [`FileSource`](file_source::FileSource)
//! (YAML, JSON, TOML gated by feature flags), auto-detection of a config
//! file in the working directory, and the [`parse_config_str`] helper for
//! format-specific deserialization.

pub mod file_source;

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::config::model::Config;
use crate::config::ConfigSource;
use crate::error::CalderaError;

/// Config file names probed in the working directory, in priority order.
pub const AUTO_DETECT_CANDIDATES: &[&str] = &[
    "caldera.yaml",
    "caldera.yml",
    "caldera.json",
    "caldera.toml",
];

/// Parse a config string based on file extension.
pub fn parse_config_str(
    ext: &str,
    content: &str,
    path_display: &str,
) -> Result<Config, CalderaError> {
    match ext {
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => serde_yml::from_str(content).map_err(|e| CalderaError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        #[cfg(feature = "json")]
        "json" => serde_json::from_str(content).map_err(|e| CalderaError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        #[cfg(feature = "toml")]
        "toml" => toml::from_str(content).map_err(|e| CalderaError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        other => Err(CalderaError::UnsupportedFormat(other.to_string())),
    }
}

/// Compute a lowercase hex-encoded SHA-256 digest.
#[must_use]
pub fn sha256_hex(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}

/// Build the source matching a config file's extension.
pub fn create_file_source(path: &Path) -> Result<Box<dyn ConfigSource>, CalderaError> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    match ext {
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => Ok(Box::new(file_source::FileSource::yaml(path.to_path_buf()))),

        #[cfg(feature = "json")]
        "json" => Ok(Box::new(file_source::FileSource::json(path.to_path_buf()))),

        #[cfg(feature = "toml")]
        "toml" => Ok(Box::new(file_source::FileSource::toml(path.to_path_buf()))),

        other => Err(CalderaError::UnsupportedFormat(other.to_string())),
    }
}

/// Resolve the config source: an explicit path wins, otherwise the first
/// auto-detected file in `dir`. `None` means run on built-in defaults.
pub async fn resolve_file_source(
    explicit: Option<&Path>,
    dir: &Path,
) -> Result<Option<Box<dyn ConfigSource>>, CalderaError> {
    if let Some(path) = explicit {
        return create_file_source(path).map(Some);
    }

    for name in AUTO_DETECT_CANDIDATES {
        let path: PathBuf = dir.join(name);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tracing::info!(path = %path.display(), "auto-detected config file");
            return create_file_source(&path).map(Some);
        }
    }

    Ok(None)
}
