use std::sync::Arc;

use reqwest::Client as HttpClient;

use crate::config::Config;
use crate::error::AppResult;
use crate::services::providers::{
    tmdb::TmdbPosterResolver,
    trakt::{TraktAuth, TraktClient},
    AuthProvider, CatalogProvider, PosterProvider,
};
use crate::services::ListAggregator;

/// Shared application state.
///
/// Everything in here is immutable; the only per-user data, the access
/// token, travels with each request.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<dyn AuthProvider>,
    pub aggregator: ListAggregator,
}

impl AppState {
    pub fn new(auth: Arc<dyn AuthProvider>, aggregator: ListAggregator) -> Self {
        Self { auth, aggregator }
    }

    /// Wires the Trakt and TMDB providers from configuration
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let http_client = HttpClient::new();

        let auth = TraktAuth::from_config(http_client.clone(), config)?;
        let catalog: Arc<dyn CatalogProvider> =
            Arc::new(TraktClient::from_config(http_client.clone(), config));
        let posters: Arc<dyn PosterProvider> =
            Arc::new(TmdbPosterResolver::from_config(http_client, config));

        if config.tmdb_api_key.is_none() {
            tracing::warn!("TMDB_API_KEY is not set, every poster will be the placeholder");
        }

        tracing::info!(
            catalog = catalog.name(),
            posters = posters.name(),
            "Providers configured"
        );

        Ok(Self::new(
            Arc::new(auth),
            ListAggregator::new(catalog, posters),
        ))
    }
}
