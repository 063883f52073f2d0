//! The data behind `GET /thing`.
//!
//! [`ThingProvider`] is the seam between the HTTP handler and whatever
//! produces the payload. Two implementations ship with the crate:
//! [`StaticThingProvider`] returns the configured thing verbatim and
//! [`GeneratedThingProvider`] mints a fresh one per call. Pick one from
//! config with [`from_config`].

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::model::{ThingConfig, ThingSource};

/// The payload returned by `GET /thing`.
///
/// Optional fields are left out of the JSON body when empty.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Thing {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl Thing {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: None,
            attributes: BTreeMap::new(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ProviderError {
    #[error("thing source unavailable: {0}")]
    Unavailable(String),

    #[error("thing generation failed: {source}")]
    Generation {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

// async_trait keeps the trait object-safe; handlers hold an Arc<dyn ThingProvider>.
#[async_trait]
pub trait ThingProvider: Send + Sync {
    fn name(&self) -> &'static str;
    async fn generate(&self) -> Result<Thing, ProviderError>;
}

pub struct StaticThingProvider {
    thing: Thing,
}

impl StaticThingProvider {
    #[must_use]
    pub const fn new(thing: Thing) -> Self {
        Self { thing }
    }
}

#[async_trait]
impl ThingProvider for StaticThingProvider {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn generate(&self) -> Result<Thing, ProviderError> {
        Ok(self.thing.clone())
    }
}

/// Mints a thing with a fresh UUID and a per-process serial on every call.
pub struct GeneratedThingProvider {
    template: Thing,
    serial: AtomicU64,
}

impl GeneratedThingProvider {
    #[must_use]
    pub const fn new(template: Thing) -> Self {
        Self {
            template,
            serial: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl ThingProvider for GeneratedThingProvider {
    fn name(&self) -> &'static str {
        "generated"
    }

    async fn generate(&self) -> Result<Thing, ProviderError> {
        let serial = self.serial.fetch_add(1, Ordering::Relaxed) + 1;
        Ok(Thing {
            id: Some(uuid::Uuid::new_v4().to_string()),
            name: format!("{}-{serial}", self.template.name),
            description: self.template.description.clone(),
            attributes: self.template.attributes.clone(),
        })
    }
}

#[must_use]
pub fn from_config(config: &ThingConfig) -> Arc<dyn ThingProvider> {
    let template = Thing {
        id: None,
        name: config.name.clone(),
        description: config.description.clone(),
        attributes: config.attributes.clone(),
    };
    match config.source {
        ThingSource::Static => Arc::new(StaticThingProvider::new(template)),
        ThingSource::Generated => Arc::new(GeneratedThingProvider::new(template)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_thing_serializes_name_only() {
        let json = serde_json::to_string(&Thing::named("example")).unwrap();
        assert_eq!(json, r#"{"name":"example"}"#);
    }

    #[tokio::test]
    async fn static_provider_returns_same_thing() {
        let mut thing = Thing::named("lamp");
        thing.attributes.insert("color".into(), "blue".into());
        let provider = StaticThingProvider::new(thing.clone());
        assert_eq!(provider.generate().await.unwrap(), thing);
        assert_eq!(provider.generate().await.unwrap(), thing);
    }

    #[tokio::test]
    async fn generated_provider_counts_and_mints_ids() {
        let provider = GeneratedThingProvider::new(Thing::named("widget"));
        let first = provider.generate().await.unwrap();
        let second = provider.generate().await.unwrap();

        assert_eq!(first.name, "widget-1");
        assert_eq!(second.name, "widget-2");

        let first_id = first.id.unwrap();
        let second_id = second.id.unwrap();
        assert!(uuid::Uuid::parse_str(&first_id).is_ok());
        assert_ne!(first_id, second_id);
    }

    #[test]
    fn provider_errors_describe_the_fault() {
        let err = ProviderError::Generation {
            source: "entropy exhausted".into(),
        };
        assert_eq!(err.to_string(), "thing generation failed: entropy exhausted");
        let err = ProviderError::Unavailable("offline".into());
        assert_eq!(err.to_string(), "thing source unavailable: offline");
    }

    #[test]
    fn from_config_honours_source() {
        let mut config = ThingConfig::default();
        assert_eq!(from_config(&config).name(), "generated");
        config.source = ThingSource::Static;
        assert_eq!(from_config(&config).name(), "static");
    }
}
