//! Concurrent fan-out of entity fetches merged into one profile

use futures::stream::{self, StreamExt};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use aadauth_core::{AadError, AuthenticatedFetch, Profile, QueryParams, Result};

use crate::entity::EntitySpec;
use crate::settings::ProviderSettings;

/// Runs the entity fetches of one login and folds them into a profile.
///
/// Fetches proceed concurrently, at most `max_concurrency` at a time.
/// Handlers run one after another on the aggregating task, which is the
/// only owner of the profile. The first failure ends the run: pending
/// fetches are dropped, so nothing they return reaches the profile.
#[derive(Debug, Clone)]
pub struct ProfileAggregator {
    resource_uri: String,
    common_params: QueryParams,
    max_concurrency: usize,
}

impl ProfileAggregator {
    pub fn new(
        resource_uri: impl Into<String>,
        common_params: QueryParams,
        max_concurrency: usize,
    ) -> Self {
        Self {
            resource_uri: resource_uri.into(),
            common_params,
            max_concurrency: max_concurrency.max(1),
        }
    }

    pub fn from_settings(settings: &ProviderSettings) -> Self {
        Self::new(
            settings.resource_uri(),
            settings.common_query_params(),
            settings.max_concurrent_fetches(),
        )
    }

    /// Fetch every entity and merge the results.
    ///
    /// Returns the profile only once every fetch has succeeded and every
    /// handler has run; otherwise returns the first error.
    #[instrument(skip(self, entities, fetch), fields(resource_uri = %self.resource_uri, entities = entities.len()))]
    pub async fn aggregate(
        &self,
        entities: &[EntitySpec],
        fetch: &dyn AuthenticatedFetch,
    ) -> Result<Profile> {
        let mut profile = Profile::new();

        if entities.is_empty() {
            debug!("No entities to fetch");
            return Ok(profile);
        }

        let fetches: Vec<_> = entities
            .iter()
            .map(|entity| self.settle(entity, fetch))
            .collect();
        let mut settled = stream::iter(fetches).buffer_unordered(self.max_concurrency);

        let mut remaining = entities.len();
        while let Some((entity, outcome)) = settled.next().await {
            let data = outcome.map_err(|e| {
                warn!(path = %entity.path(), error = %e, "Entity fetch failed, abandoning profile");
                e
            })?;

            entity.apply(&mut profile, &data).map_err(|e| {
                warn!(path = %entity.path(), error = %e, "Entity handler failed, abandoning profile");
                e
            })?;

            remaining -= 1;
            debug!(path = %entity.path(), remaining, "Entity merged into profile");
        }

        Ok(profile)
    }

    /// Callback form of [`aggregate`](Self::aggregate); `on_complete` runs
    /// exactly once with the outcome
    pub async fn aggregate_with<F>(
        &self,
        entities: &[EntitySpec],
        fetch: &dyn AuthenticatedFetch,
        on_complete: F,
    ) where
        F: FnOnce(Result<Profile>),
    {
        on_complete(self.aggregate(entities, fetch).await);
    }

    async fn settle<'a>(
        &self,
        entity: &'a EntitySpec,
        fetch: &dyn AuthenticatedFetch,
    ) -> (&'a EntitySpec, Result<Value>) {
        (entity, self.fetch_entity(entity, fetch).await)
    }

    async fn fetch_entity(
        &self,
        entity: &EntitySpec,
        fetch: &dyn AuthenticatedFetch,
    ) -> Result<Value> {
        let uri = format!("{}{}", self.resource_uri, entity.path());

        let mut query = self.common_params.clone();
        query.extend(
            entity
                .params()
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );

        debug!(%uri, "Fetching directory entity");
        let response = fetch.fetch(&uri, &query).await?;

        if !response.is_success() {
            return Err(AadError::fetch_error(
                &uri,
                Some(response.status),
                format!("HTTP {}", response.status),
            ));
        }

        response.json(&uri)
    }
}
