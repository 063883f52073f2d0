//! Configuration validation with detailed error reporting.
//!
//! The [`validate`] function checks a parsed [`Config`] for values
//! that would fail at request time: a correlation header that is not a
//! legal HTTP header name, a hop-by-hop header the HTTP layer would
//! strip, and an empty thing name. Returns a list of
//! [`ValidationError`] values with per-field suggestions.

use axum::http::HeaderName;

use super::model::Config;
use crate::error::ValidationError;

/// Headers that proxies drop between hops, so a correlation id carried in
/// one of them would not survive the trip.
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "transfer-encoding",
    "te",
    "trailer",
    "upgrade",
    "proxy-authorization",
    "proxy-authenticate",
];

/// Validate a correlation header name. Returns `Ok(())` or a human-readable error.
pub fn validate_header_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("header name cannot be empty".into());
    }
    let parsed = HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| format!("'{name}' is not a valid HTTP header name"))?;
    if HOP_BY_HOP.contains(&parsed.as_str()) {
        return Err(format!(
            "'{name}' is a hop-by-hop header and would not reach the client"
        ));
    }
    Ok(())
}

pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let header = &config.correlation.header;
    if let Err(msg) = validate_header_name(header) {
        let cleaned = header.trim().replace(char::is_whitespace, "-");
        errors.push(ValidationError {
            field: "correlation.header".into(),
            message: msg,
            suggestion: (!cleaned.is_empty()
                && cleaned != *header
                && validate_header_name(&cleaned).is_ok())
            .then(|| format!("did you mean '{cleaned}'?")),
        });
    }

    if config.thing.name.trim().is_empty() {
        errors.push(ValidationError {
            field: "thing.name".into(),
            message: "name cannot be empty".into(),
            suggestion: None,
        });
    }

    for key in config.thing.attributes.keys() {
        if key.trim().is_empty() {
            errors.push(ValidationError {
                field: "thing.attributes".into(),
                message: "attribute keys cannot be empty".into(),
                suggestion: None,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[must_use]
pub fn format_validation_report(path: &str, config: &Config) -> String {
    let thing = &config.thing;
    let mut lines = vec![
        format!("  correlation header: {}", config.correlation.header),
        format!("  thing source:       {}", thing.source.as_str()),
        format!("  thing name:         {}", thing.name),
    ];
    if let Some(ref description) = thing.description {
        lines.push(format!("  description:        {description}"));
    }
    if !thing.attributes.is_empty() {
        lines.push(format!("  attributes:         {}", thing.attributes.len()));
    }

    format!("{} is valid\n{}", path, lines.join("\n"))
}
