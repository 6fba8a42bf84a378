//! aadauth Identity - Azure AD OAuth2 provider with Graph profile enrichment
//!
//! Two layers:
//! - `ProviderSettings::resolve` validates raw options once, at provider
//!   construction, and compiles every declared entity into a path plus a
//!   uniform handler.
//! - `ProfileAggregator` runs once per login: it fetches every entity
//!   concurrently and folds the responses into one `Profile`, failing the
//!   whole login on the first fetch or handler error.
//!
//! `AzureAdProvider` ties both together behind `OAuthProfileProvider`, and
//! `BearerFetch` is a reqwest-backed `AuthenticatedFetch` for hosts that do
//! not bring their own.

pub mod aggregator;
pub mod entity;
pub mod providers;
pub mod settings;


pub use aggregator::ProfileAggregator;
pub use entity::{map_self_profile, EntityMapping, EntitySpec, SELF_PATH};
pub use providers::azure::{AzureAdProvider, PROVIDER_NAME};
pub use providers::{BearerFetch, HttpClient};
pub use settings::ProviderSettings;

// Re-export core types
pub use aadauth_core::*;
