//! HTTP plumbing shared by provider implementations

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

use aadauth_core::{AadError, AuthenticatedFetch, Credentials, FetchResponse, QueryParams, Result};

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 500;

/// HTTP client wrapper with retry logic
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    max_retries: u32,
    retry_delay_ms: u64,
}

impl HttpClient {
    pub fn new(timeout: Duration, max_retries: u32, retry_delay_ms: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AadError::internal_error(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            max_retries,
            retry_delay_ms,
        })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            DEFAULT_MAX_RETRIES,
            DEFAULT_RETRY_DELAY_MS,
        )
    }

    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Execute a request, retrying throttling, server errors and transport
    /// failures with exponential backoff.
    ///
    /// Any other status is returned as-is. When retries run out on a
    /// retryable status, the last response is returned.
    pub async fn execute_with_retry(
        &self,
        uri: &str,
        request_builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response> {
        let mut last_error = None;
        let mut last_response = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.retry_delay_ms * 2u64.pow(attempt - 1);
                debug!(%uri, attempt, delay_ms = delay, "Retrying request");
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }

            let Some(rb) = request_builder.try_clone() else {
                return Err(AadError::internal_error("Request cannot be cloned for retry"));
            };

            match rb.send().await {
                Ok(response) => {
                    if !is_retryable(response.status()) {
                        return Ok(response);
                    }

                    warn!(%uri, status = %response.status(), attempt, "Retryable HTTP status");
                    last_response = Some(response);
                }
                Err(e) => {
                    warn!(%uri, error = %e, attempt, "Request failed");
                    last_response = None;
                    last_error = Some(e.to_string());
                }
            }
        }

        last_response.ok_or_else(|| {
            AadError::fetch_error(
                uri,
                None,
                format!(
                    "Request failed after {} retries: {}",
                    self.max_retries,
                    last_error.unwrap_or_default()
                ),
            )
        })
    }
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("max_retries", &self.max_retries)
            .field("retry_delay_ms", &self.retry_delay_ms)
            .finish()
    }
}

fn is_retryable(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

/// `AuthenticatedFetch` that sends the login's access token as a bearer token
#[derive(Clone)]
pub struct BearerFetch {
    client: HttpClient,
    access_token: String,
}

impl BearerFetch {
    pub fn new(client: HttpClient, access_token: impl Into<String>) -> Self {
        Self {
            client,
            access_token: access_token.into(),
        }
    }

    pub fn from_credentials(client: HttpClient, credentials: &Credentials) -> Self {
        Self::new(client, credentials.token.clone())
    }
}

impl fmt::Debug for BearerFetch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerFetch")
            .field("client", &self.client)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

#[async_trait]
impl AuthenticatedFetch for BearerFetch {
    async fn fetch(&self, uri: &str, query: &QueryParams) -> Result<FetchResponse> {
        let request = self
            .client
            .inner()
            .get(uri)
            .bearer_auth(&self.access_token)
            .query(query);

        let response = self.client.execute_with_retry(uri, request).await?;
        let status = response.status().as_u16();

        let body = response.bytes().await.map_err(|e| {
            AadError::fetch_error(uri, Some(status), format!("Failed to read response body: {}", e))
        })?;

        Ok(FetchResponse::new(status, body.to_vec()))
    }
}
