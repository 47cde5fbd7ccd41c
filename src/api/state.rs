use std::sync::Arc;

use crate::{
    config::Config,
    services::{
        providers::{
            streaming_availability::StreamingAvailabilityProvider, tmdb::TmdbProvider,
            AvailabilityProvider, DisabledAvailability, DisabledMetadata, MetadataProvider,
        },
        Catalog, Reconciler,
    },
};

/// Shared application state
///
/// Holds no per-request data; every request resolves from scratch.
#[derive(Clone)]
pub struct AppState {
    pub metadata: Arc<dyn MetadataProvider>,
    pub availability: Arc<dyn AvailabilityProvider>,
    pub reconciler: Arc<Reconciler>,
    /// Two-letter country code for watch-provider lookups
    pub region: String,
}

impl AppState {
    pub fn new(
        metadata: Arc<dyn MetadataProvider>,
        availability: Arc<dyn AvailabilityProvider>,
        reconciler: Reconciler,
        region: impl Into<String>,
    ) -> Self {
        Self {
            metadata,
            availability,
            reconciler: Arc::new(reconciler),
            region: region.into(),
        }
    }

    /// Wires the upstream providers described by `config`.
    ///
    /// A missing API key disables that source instead of failing startup.
    pub fn from_config(config: &Config) -> Self {
        let metadata: Arc<dyn MetadataProvider> = match &config.tmdb_api_key {
            Some(key) => Arc::new(TmdbProvider::new(
                key.clone(),
                config.tmdb_api_url.clone(),
                config.tmdb_language.clone(),
            )),
            None => {
                tracing::warn!("TMDB_API_KEY not set, metadata lookups return no data");
                Arc::new(DisabledMetadata)
            }
        };

        let availability: Arc<dyn AvailabilityProvider> = match &config.streaming_api_key {
            Some(key) => Arc::new(StreamingAvailabilityProvider::new(
                key.clone(),
                config.streaming_api_url.clone(),
            )),
            None => {
                tracing::warn!("STREAMING_API_KEY not set, streaming availability source disabled");
                Arc::new(DisabledAvailability)
            }
        };

        tracing::info!(
            metadata = metadata.name(),
            availability = availability.name(),
            region = %config.watch_region,
            policy = ?config.reconcile_policy,
            "Providers configured"
        );

        Self::new(
            metadata,
            availability,
            Reconciler::new(Catalog::builtin(), config.reconcile_policy),
            config.watch_region.clone(),
        )
    }
}
