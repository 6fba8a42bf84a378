//! Raw provider options as supplied by the caller or a config source

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::{Profile, Result};

/// Environment prefix for [`AzureAdOptions::load`]
pub const ENV_PREFIX: &str = "AADAUTH";

/// Maps a fetched entity payload into writes on the profile
pub type EntityHandler = Arc<dyn Fn(&mut Profile, &Value) -> anyhow::Result<()> + Send + Sync>;

/// Unvalidated Azure AD provider options.
///
/// Every field is optional here; defaults and validation are applied when
/// the options are resolved into provider settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureAdOptions {
    pub resource: Option<String>,
    #[serde(alias = "graphuri")]
    pub graph_uri: Option<String>,
    #[serde(alias = "provideruri")]
    pub provider_uri: Option<String>,
    #[serde(alias = "apiversion")]
    pub api_version: Option<String>,
    pub tenant: Option<String>,
    #[serde(alias = "requestme")]
    pub request_me: Option<bool>,
    #[serde(default)]
    pub entities: Vec<EntityOptions>,
    #[serde(alias = "maxconcurrentfetches")]
    pub max_concurrent_fetches: Option<usize>,
}

impl AzureAdOptions {
    pub fn new(tenant: impl Into<String>) -> Self {
        Self {
            tenant: Some(tenant.into()),
            ..Default::default()
        }
    }

    pub fn request_me(mut self, request_me: bool) -> Self {
        self.request_me = Some(request_me);
        self
    }

    pub fn with_entity(mut self, entity: EntityOptions) -> Self {
        self.entities.push(entity);
        self
    }

    /// Load options from an optional config file layered under
    /// `AADAUTH__*` environment variables
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Self::from_config(config)
    }

    pub fn from_config(config: config::Config) -> Result<Self> {
        Ok(config.try_deserialize()?)
    }
}

/// A directory entity to fetch after login.
///
/// Either `property` or `handler` must be set. Handlers can only be
/// attached in code; entities read from a config source use `property`.
#[derive(Clone, Default, Deserialize)]
pub struct EntityOptions {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub property: Option<String>,
    #[serde(skip)]
    pub handler: Option<EntityHandler>,
    /// Query parameters for this entity only
    #[serde(default)]
    pub params: BTreeMap<String, Value>,
}

impl EntityOptions {
    /// Assign the whole payload of `path` to `profile[property]`
    pub fn property(path: impl Into<String>, property: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            property: Some(property.into()),
            ..Default::default()
        }
    }

    pub fn handler<F>(path: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut Profile, &Value) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self {
            path: path.into(),
            handler: Some(Arc::new(handler)),
            ..Default::default()
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

impl fmt::Debug for EntityOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityOptions")
            .field("path", &self.path)
            .field("property", &self.property)
            .field("handler", &self.handler.as_ref().map(|_| "<fn>"))
            .field("params", &self.params)
            .finish()
    }
}
