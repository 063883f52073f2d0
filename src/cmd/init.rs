//! `caldera init` — generate a starter configuration file.
//!
//! Creates a YAML, JSON, or TOML config file with either minimal
//! or fully documented templates.

use std::path::PathBuf;

use crate::cli::{ConfigFormat, InitArgs};
use crate::error::CalderaError;

pub fn execute(args: &InitArgs) -> Result<(), CalderaError> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("caldera.{}", args.format.extension())));

    if output.exists() {
        return Err(CalderaError::FileExists { path: output });
    }

    std::fs::write(&output, template(&args.format, args.full))?;
    println!("Created {}", output.display());
    Ok(())
}

#[must_use]
pub fn template(format: &ConfigFormat, full: bool) -> &'static str {
    match (format, full) {
        (ConfigFormat::Yaml, false) => YAML_MINIMAL,
        (ConfigFormat::Yaml, true) => YAML_FULL,
        (ConfigFormat::Json, false) => JSON_MINIMAL,
        (ConfigFormat::Json, true) => JSON_FULL,
        (ConfigFormat::Toml, false) => TOML_MINIMAL,
        (ConfigFormat::Toml, true) => TOML_FULL,
    }
}

const YAML_MINIMAL: &str = r#"# Caldera config

thing:
  source: static
  name: "example"
"#;

const YAML_FULL: &str = r#"# Caldera config
#
# All values shown are defaults unless noted. Uncomment and modify as needed.

# Correlation id handling
correlation:
  # Header read from requests and always set on responses (case-insensitive).
  # When the request has no value (or only whitespace) a UUID v4 is generated.
  header: "RacCorrelationId"

# Payload returned by GET /thing
thing:
  # static:    return this thing verbatim on every request
  # generated: add a fresh "id" and suffix "name" with a per-process serial
  source: generated
  name: "thing"
  # description: "A thing"
  # attributes:
  #   color: "blue"
  #   size: "large"
"#;

const JSON_MINIMAL: &str = r#"{
  "thing": {
    "source": "static",
    "name": "example"
  }
}
"#;

const JSON_FULL: &str = r#"{
  "correlation": {
    "header": "RacCorrelationId"
  },
  "thing": {
    "source": "generated",
    "name": "thing",
    "description": "A thing",
    "attributes": {
      "color": "blue"
    }
  }
}
"#;

const TOML_MINIMAL: &str = r#"# Caldera config

[thing]
source = "static"
name = "example"
"#;

const TOML_FULL: &str = r#"# Caldera config
#
# All values shown are defaults unless noted. Uncomment and modify as needed.

[correlation]
# Header read from requests and always set on responses (case-insensitive).
header = "RacCorrelationId"

[thing]
# "static" or "generated"
source = "generated"
name = "thing"
# description = "A thing"

# [thing.attributes]
# color = "blue"
"#;
