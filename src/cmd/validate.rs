//! `caldera validate` — check a configuration file without serving.
//!
//! Loads the file through the same [`ConfigSource`](crate::config::ConfigSource)
//! pipeline as `caldera run`, then wires the provider and correlation
//! header exactly as the server would, so a file that validates here
//! starts cleanly there.

use std::sync::Arc;

use serde::Serialize;

use crate::cli::{ValidateArgs, ValidateFormat};
use crate::config::model::Config;
use crate::config::sources::create_file_source;
use crate::config::validation::format_validation_report;
use crate::config::ConfigVersion;
use crate::error::{CalderaError, ValidationError};
use crate::middleware::{Correlation, TracingSink};
use crate::provider;

/// What `caldera run` would do with a valid config.
#[derive(Debug, Serialize)]
pub struct Wiring {
    pub version: String,
    /// Header name as it goes on the wire (lowercase).
    pub correlation_header: String,
    pub provider: &'static str,
    pub thing_name: String,
}

pub fn wiring(config: &Config, version: &ConfigVersion) -> Result<Wiring, CalderaError> {
    let correlation = Correlation::from_config(&config.correlation, Arc::new(TracingSink))?;
    Ok(Wiring {
        version: version.short().to_string(),
        correlation_header: correlation.header().as_str().to_string(),
        provider: provider::from_config(&config.thing).name(),
        thing_name: config.thing.name.clone(),
    })
}

pub async fn execute(args: &ValidateArgs) -> Result<(), CalderaError> {
    let path = &args.config;
    let source = create_file_source(path)?;

    let (config, version) = match source.load().await {
        Ok(loaded) => loaded,
        Err(CalderaError::ConfigValidation { errors }) => {
            report_invalid(&args.format, &path.display().to_string(), &errors);
            return Err(CalderaError::ConfigValidation { errors });
        }
        Err(e) => return Err(e),
    };
    let wiring = wiring(&config, &version)?;

    match args.format {
        ValidateFormat::Text => {
            println!(
                "\u{2713} {}\n  provider:           {}\n  version:            {}",
                format_validation_report(&path.display().to_string(), &config),
                wiring.provider,
                wiring.version
            );
        }
        ValidateFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "valid": true,
                    "source": source.name(),
                    "wiring": wiring,
                })
            );
        }
    }

    Ok(())
}

fn report_invalid(format: &ValidateFormat, path: &str, errors: &[ValidationError]) {
    match format {
        ValidateFormat::Text => {
            eprintln!("\u{2717} {path} has {} errors\n", errors.len());
            for error in errors {
                eprintln!("{error}");
            }
        }
        ValidateFormat::Json => {
            let errors: Vec<serde_json::Value> = errors
                .iter()
                .map(|e| {
                    serde_json::json!({
                        "field": e.field,
                        "message": e.message,
                        "suggestion": e.suggestion,
                    })
                })
                .collect();
            println!("{}", serde_json::json!({ "valid": false, "errors": errors }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::ThingSource;

    #[test]
    fn wiring_reflects_what_run_would_build() {
        let mut config = Config::default();
        config.correlation.header = "X-Request-Trace".into();
        config.thing.source = ThingSource::Static;
        config.thing.name = "lamp".into();

        let wiring = wiring(&config, &ConfigVersion::Hash("0123456789abcdef".into())).unwrap();
        assert_eq!(wiring.correlation_header, "x-request-trace");
        assert_eq!(wiring.provider, "static");
        assert_eq!(wiring.thing_name, "lamp");
        assert_eq!(wiring.version, "01234567");
    }

    #[test]
    fn builtin_defaults_wire_generated_provider() {
        let wiring = wiring(&Config::default(), &ConfigVersion::Builtin).unwrap();
        assert_eq!(wiring.correlation_header, "raccorrelationid");
        assert_eq!(wiring.provider, "generated");
    }

    #[tokio::test]
    async fn missing_file_is_reported() {
        let args = ValidateArgs {
            config: std::env::temp_dir().join("caldera-validate-missing.json"),
            format: ValidateFormat::Json,
        };
        let err = execute(&args).await.unwrap_err();
        assert!(matches!(
            err,
            CalderaError::ConfigFileNotFound { .. } | CalderaError::UnsupportedFormat(_)
        ));
    }
}
