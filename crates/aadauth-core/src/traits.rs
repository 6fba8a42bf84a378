//! Core traits at the seams between the provider and its host

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::{AadError, Credentials, ProviderDescriptor, Result};

/// Query parameters attached to a directory fetch
pub type QueryParams = BTreeMap<String, String>;

/// Raw answer of an authenticated fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body into its natural JSON form. An empty body is `null`.
    pub fn json(&self, uri: &str) -> Result<Value> {
        if self.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&self.body).map_err(|e| {
            AadError::fetch_error(uri, Some(self.status), format!("invalid JSON body: {}", e))
        })
    }
}

/// Authenticated GET against the directory API.
///
/// Implementations carry the access token of one login. A transport
/// failure (including a timeout) is an `Err`; any HTTP answer, whatever
/// its status, is an `Ok(FetchResponse)`.
#[async_trait]
pub trait AuthenticatedFetch: Send + Sync {
    async fn fetch(&self, uri: &str, query: &QueryParams) -> Result<FetchResponse>;
}

/// An OAuth2 provider that enriches credentials with a profile after login
#[async_trait]
pub trait OAuthProfileProvider: Send + Sync {
    /// Endpoints and parameters the hosting framework needs for the
    /// authorization-code flow
    fn descriptor(&self) -> ProviderDescriptor;

    /// Build the profile for a freshly authenticated session and install
    /// it on `credentials`. On error the credentials are left untouched.
    async fn profile(
        &self,
        credentials: &mut Credentials,
        fetch: &dyn AuthenticatedFetch,
    ) -> Result<()>;
}
