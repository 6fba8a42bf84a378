//! Resolution of raw options into immutable provider settings

use tracing::debug;

use aadauth_core::{AadError, AzureAdOptions, QueryParams, Result};

use crate::entity::EntitySpec;

/// Resource requested from the authorization server
pub const DEFAULT_RESOURCE: &str = "https://graph.windows.net/";
/// Root of the directory Graph API
pub const DEFAULT_GRAPH_URI: &str = "https://graph.windows.net";
/// Root of the login service
pub const DEFAULT_PROVIDER_URI: &str = "https://login.windows.net";
pub const DEFAULT_API_VERSION: &str = "1.6";
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 16;

/// Validated configuration, built once per provider and shared by every login
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    resource: String,
    graph_base_uri: String,
    auth_base_uri: String,
    api_version: String,
    tenant: String,
    request_self: bool,
    entities: Vec<EntitySpec>,
    max_concurrent_fetches: usize,
    provider_uri: String,
    resource_uri: String,
}

impl ProviderSettings {
    /// Apply defaults, validate, and compile the entity list.
    ///
    /// User entities keep their declaration order; the `/me` entity, when
    /// requested, always comes last.
    pub fn resolve(options: AzureAdOptions) -> Result<Self> {
        let tenant = options
            .tenant
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| AadError::config_error("tenant required"))?;

        let max_concurrent_fetches = options
            .max_concurrent_fetches
            .unwrap_or(DEFAULT_MAX_CONCURRENT_FETCHES);
        if max_concurrent_fetches == 0 {
            return Err(AadError::config_error(
                "maxConcurrentFetches must be at least 1",
            ));
        }

        let request_self = options.request_me.unwrap_or(true);

        let mut entities = options
            .entities
            .into_iter()
            .map(EntitySpec::from_options)
            .collect::<Result<Vec<_>>>()?;

        if request_self {
            entities.push(EntitySpec::me());
        }

        let graph_base_uri = options
            .graph_uri
            .unwrap_or_else(|| DEFAULT_GRAPH_URI.to_string());
        let auth_base_uri = options
            .provider_uri
            .unwrap_or_else(|| DEFAULT_PROVIDER_URI.to_string());

        let provider_uri = join_tenant(&auth_base_uri, &tenant);
        let resource_uri = join_tenant(&graph_base_uri, &tenant);

        debug!(
            tenant = %tenant,
            entities = entities.len(),
            request_self,
            "Resolved Azure AD provider settings"
        );

        Ok(Self {
            resource: options
                .resource
                .unwrap_or_else(|| DEFAULT_RESOURCE.to_string()),
            graph_base_uri,
            auth_base_uri,
            api_version: options
                .api_version
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            tenant,
            request_self,
            entities,
            max_concurrent_fetches,
            provider_uri,
            resource_uri,
        })
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn graph_base_uri(&self) -> &str {
        &self.graph_base_uri
    }

    pub fn auth_base_uri(&self) -> &str {
        &self.auth_base_uri
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn tenant(&self) -> &str {
        &self.tenant
    }

    pub fn request_self(&self) -> bool {
        self.request_self
    }

    pub fn entities(&self) -> &[EntitySpec] {
        &self.entities
    }

    pub fn max_concurrent_fetches(&self) -> usize {
        self.max_concurrent_fetches
    }

    /// Login service root for this tenant
    pub fn provider_uri(&self) -> &str {
        &self.provider_uri
    }

    /// Graph root for this tenant; entity paths are appended to it
    pub fn resource_uri(&self) -> &str {
        &self.resource_uri
    }

    /// Query parameters sent with every entity fetch
    pub fn common_query_params(&self) -> QueryParams {
        QueryParams::from([("api-version".to_string(), self.api_version.clone())])
    }
}

fn join_tenant(base: &str, tenant: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), tenant)
}
