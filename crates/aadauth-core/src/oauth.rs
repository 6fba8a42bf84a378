//! OAuth2 surface consumed by the hosting authentication framework

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::Profile;

/// Authorization protocol spoken by a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OAuthProtocol {
    OAuth2,
}

impl fmt::Display for OAuthProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OAuth2 => write!(f, "oauth2"),
        }
    }
}

/// Static description of a provider, computed once at construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
    pub protocol: OAuthProtocol,
    /// Send client credentials as body parameters rather than basic auth
    pub use_params_auth: bool,
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    /// Extra parameters appended to the authorization request
    pub provider_params: BTreeMap<String, String>,
}

/// Session produced by the token exchange, completed with a profile
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
    pub provider: String,
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub query: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
}

impl Credentials {
    pub fn new(provider: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            token: token.into(),
            ..Default::default()
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("provider", &self.provider)
            .field("token", &"[REDACTED]")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("expires_in", &self.expires_in)
            .field("query", &self.query)
            .field("profile", &self.profile)
            .finish()
    }
}
