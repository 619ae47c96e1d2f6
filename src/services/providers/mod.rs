/// Upstream API abstractions
///
/// The aggregator only talks to these traits. The Trakt module implements the
/// authorization and catalog sides, the TMDB module the poster side.
use crate::{
    error::AppResult,
    models::{AccessToken, Category, MovieRecord, Profile},
};

pub mod tmdb;
pub mod trakt;

/// OAuth authorization-code flow against the tracking API
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait AuthProvider: Send + Sync {
    /// URL the user visits to grant access and receive a code
    fn authorization_url(&self) -> String;

    /// Trades an authorization code for a bearer token
    async fn exchange_code(&self, code: &str) -> AppResult<AccessToken>;
}

/// Authenticated list endpoints of the tracking API
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Looks up the user the token belongs to
    async fn fetch_profile(&self, token: &AccessToken) -> AppResult<Profile>;

    /// Fetches the raw records of one list, in provider order.
    ///
    /// `scope_id` fills the user or seed placeholder of the category's
    /// endpoint and is ignored by global lists.
    async fn fetch_list(
        &self,
        category: Category,
        token: &AccessToken,
        scope_id: Option<String>,
    ) -> AppResult<Vec<MovieRecord>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Per-movie image lookup
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PosterProvider: Send + Sync {
    /// Returns the movie's backdrop URLs in provider order, possibly none
    async fn resolve(&self, movie_id: u64) -> AppResult<Vec<String>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
