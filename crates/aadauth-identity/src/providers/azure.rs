//! Azure Active Directory OAuth2 provider
//!
//! Resolves its settings once at construction and, after each login,
//! enriches the credentials with a profile assembled from the configured
//! Graph entities.

use async_trait::async_trait;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

use aadauth_core::{
    AuthenticatedFetch, AzureAdOptions, Credentials, OAuthProfileProvider, OAuthProtocol, Profile,
    ProviderDescriptor, Result,
};

use crate::aggregator::ProfileAggregator;
use crate::settings::ProviderSettings;

/// Name the provider registers under with the hosting framework
pub const PROVIDER_NAME: &str = "azure-ad";

/// Azure AD OAuth2 provider
#[derive(Debug, Clone)]
pub struct AzureAdProvider {
    settings: ProviderSettings,
    aggregator: ProfileAggregator,
}

impl AzureAdProvider {
    /// Create a provider from raw options; fails with `ConfigError` on
    /// invalid options
    pub fn new(options: AzureAdOptions) -> Result<Self> {
        let settings = ProviderSettings::resolve(options)?;
        let aggregator = ProfileAggregator::from_settings(&settings);

        info!(
            tenant = %settings.tenant(),
            entities = settings.entities().len(),
            "Azure AD provider configured"
        );

        Ok(Self {
            settings,
            aggregator,
        })
    }

    pub fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    pub fn authorization_endpoint(&self) -> String {
        format!("{}/oauth2/authorize", self.settings.provider_uri())
    }

    pub fn token_endpoint(&self) -> String {
        format!("{}/oauth2/token", self.settings.provider_uri())
    }

    /// Run the configured entity fetches for one login
    pub async fn fetch_profile(&self, fetch: &dyn AuthenticatedFetch) -> Result<Profile> {
        self.aggregator
            .aggregate(self.settings.entities(), fetch)
            .await
    }
}

#[async_trait]
impl OAuthProfileProvider for AzureAdProvider {
    fn descriptor(&self) -> ProviderDescriptor {
        ProviderDescriptor {
            protocol: OAuthProtocol::OAuth2,
            use_params_auth: true,
            authorization_endpoint: self.authorization_endpoint(),
            token_endpoint: self.token_endpoint(),
            provider_params: BTreeMap::from([(
                "resource".to_string(),
                self.settings.resource().to_string(),
            )]),
        }
    }

    /// With no entities configured nothing is fetched and
    /// `credentials.profile` stays `None` rather than `Some` empty profile.
    #[instrument(skip(self, credentials, fetch), fields(tenant = %self.settings.tenant()))]
    async fn profile(
        &self,
        credentials: &mut Credentials,
        fetch: &dyn AuthenticatedFetch,
    ) -> Result<()> {
        if self.settings.entities().is_empty() {
            debug!("No directory entities configured, leaving profile unset");
            return Ok(());
        }

        let profile = self.fetch_profile(fetch).await?;

        info!(keys = profile.len(), "Directory profile assembled");
        credentials.profile = Some(profile);

        Ok(())
    }
}
