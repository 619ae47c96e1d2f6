use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};

use crate::error::{AppError, AppResult};

pub mod category;

pub use category::{is_trakt_id, Category, CategoryDescriptor, IdField, RecordShape, Scope, TRUNCATE_LIMIT};

/// Fallback image used whenever no poster URL can be resolved
pub const PLACEHOLDER_POSTER: &str = "static/img/fondo_gris.jpg";

/// Bearer token issued by the Trakt OAuth endpoint.
///
/// Held by the caller for the length of a session and passed into every
/// catalog call. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Authenticated user as reported by `/users/settings`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub username: String,
    /// Slug used to address user-scoped endpoints
    pub user_id: String,
}

/// Cross-service identifiers attached to every Trakt movie
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieIds {
    #[serde(default)]
    pub trakt: Option<u64>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub imdb: Option<String>,
    #[serde(default)]
    pub tmdb: Option<u64>,
}

/// A movie as returned by the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub title: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub ids: MovieIds,
}

impl MovieRecord {
    /// Id used to look the poster up, drawn from the requested namespace
    pub fn lookup_id(&self, field: IdField) -> Option<u64> {
        match field {
            IdField::Tmdb => self.ids.tmdb,
            IdField::Trakt => self.ids.trakt,
        }
    }
}

/// Display-ready movie returned to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayMovie {
    pub title: String,
    pub year: Option<i32>,
    /// Resolved backdrop URL, or [`PLACEHOLDER_POSTER`]
    pub poster_url: String,
}

/// Movie id a related list is seeded from (Trakt id or slug)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeedId(pub String);

impl SeedId {
    /// Trims a caller-supplied seed and checks it is a Trakt id or slug
    pub fn parse(raw: &str) -> AppResult<Self> {
        let seed = raw.trim();
        if !is_trakt_id(seed) {
            return Err(AppError::InvalidInput(format!(
                "'{}' is not a Trakt movie id or slug",
                seed
            )));
        }
        Ok(Self(seed.to_string()))
    }
}

impl Display for SeedId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Trakt API Types
// ============================================================================

/// Body returned by `/oauth/token`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiTokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// Body returned by `/users/settings`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    pub user: ApiUser,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiUser {
    pub username: String,
    pub ids: ApiUserIds,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiUserIds {
    pub slug: String,
}

impl From<ApiSettings> for Profile {
    fn from(settings: ApiSettings) -> Self {
        Profile {
            username: settings.user.username,
            user_id: settings.user.ids.slug,
        }
    }
}

/// List item that nests the movie next to list-specific counters
/// (`watchers`, `plays`, `revenue`, ...), which are ignored
#[derive(Debug, Clone, Deserialize)]
pub struct ApiWrappedMovie {
    pub movie: MovieRecord,
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Body returned by `/movie/{id}/images`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiImages {
    pub backdrops: Vec<ApiImage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiImage {
    #[serde(default)]
    pub file_path: Option<String>,
}
