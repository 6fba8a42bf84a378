//! Directory entities and the handlers that map them into the profile

use serde_json::Value;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use aadauth_core::{AadError, EntityHandler, EntityOptions, Profile, QueryParams, Result};

/// Path of the built-in entity describing the signed-in user
pub const SELF_PATH: &str = "/me";

/// How a fetched payload lands in the profile
#[derive(Clone)]
pub enum EntityMapping {
    /// Store the whole payload under this key
    Assign(String),
    /// Caller-supplied mapping
    Custom(EntityHandler),
}

impl EntityMapping {
    /// Pick the mapping declared by `options`; a handler wins over a property
    pub fn from_options(options: &EntityOptions) -> Result<Self> {
        if let Some(handler) = &options.handler {
            return Ok(Self::Custom(handler.clone()));
        }

        match options.property.as_deref() {
            Some(property) if !property.is_empty() => Ok(Self::Assign(property.to_string())),
            _ => Err(AadError::config_error("entity requires property or handler")),
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Assign(property) => format!("property:{}", property),
            Self::Custom(_) => "handler".to_string(),
        }
    }

    fn into_handler(self) -> EntityHandler {
        match self {
            Self::Assign(property) => Arc::new(
                move |profile: &mut Profile, data: &Value| -> anyhow::Result<()> {
                    profile.set(property.clone(), data.clone());
                    Ok(())
                },
            ),
            Self::Custom(handler) => handler,
        }
    }
}

/// A compiled entity: where to fetch and how to apply the result
#[derive(Clone)]
pub struct EntitySpec {
    path: String,
    params: QueryParams,
    mapping: String,
    handler: EntityHandler,
}

impl EntitySpec {
    pub fn new(path: impl Into<String>, mapping: EntityMapping) -> Self {
        Self {
            path: path.into(),
            params: QueryParams::new(),
            mapping: mapping.describe(),
            handler: mapping.into_handler(),
        }
    }

    /// Validate and compile one raw entity declaration
    pub fn from_options(options: EntityOptions) -> Result<Self> {
        if options.path.trim().is_empty() {
            return Err(AadError::config_error("entity requires path"));
        }

        let mapping = EntityMapping::from_options(&options)?;
        let params = options
            .params
            .into_iter()
            .map(|(key, value)| (key, query_value(value)))
            .collect();

        Ok(Self {
            params,
            ..Self::new(options.path, mapping)
        })
    }

    /// The built-in `/me` entity
    pub fn me() -> Self {
        Self::new(SELF_PATH, EntityMapping::Custom(Arc::new(map_self_profile)))
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    /// Run the handler against `profile`.
    ///
    /// A handler that returns an error or panics is reported as
    /// `HandlerError` for this entity.
    pub fn apply(&self, profile: &mut Profile, data: &Value) -> Result<()> {
        match catch_unwind(AssertUnwindSafe(|| (self.handler)(profile, data))) {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(AadError::handler_error(&self.path, e.to_string())),
            Err(panic) => {
                let message = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "handler panicked".to_string());
                Err(AadError::handler_error(&self.path, message))
            }
        }
    }
}

impl fmt::Debug for EntitySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntitySpec")
            .field("path", &self.path)
            .field("params", &self.params)
            .field("mapping", &self.mapping)
            .finish()
    }
}

/// Map a Graph `/me` payload onto the standard profile keys.
///
/// Missing source fields become `null`; the payload is kept verbatim
/// under `raw`.
pub fn map_self_profile(profile: &mut Profile, data: &Value) -> anyhow::Result<()> {
    let field = |name: &str| data.get(name).cloned().unwrap_or(Value::Null);

    profile.set("id", field("objectId"));
    profile.set("username", field("userPrincipalName"));
    profile.set("displayName", field("displayName"));
    profile.set("email", field("mail"));
    profile.set(
        "name",
        serde_json::json!({
            "first": field("givenName"),
            "last": field("surname"),
        }),
    );
    profile.set("raw", data.clone());

    Ok(())
}

fn query_value(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}
