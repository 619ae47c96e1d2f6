use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use crate::error::{AppError, AppResult};

/// Number of records kept for the capped lists
pub const TRUNCATE_LIMIT: usize = 10;

/// Named movie lists that can be rendered for a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Watched,
    Watchlist,
    Trending,
    Favorited,
    /// Weekend box office
    Cinema,
    Anticipated,
    Recommended,
    /// Movies related to a seed movie
    Related,
}

/// What an endpoint path has to be formatted with before the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Path is complete as written
    Global,
    /// Path contains `{user}`, filled with the profile's user id
    User,
    /// Path contains `{seed}`, filled with a movie id
    Seed,
}

/// Layout of the items in a list response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordShape {
    /// `{"movie": {...}, "watchers": 12}`
    Wrapped,
    /// `{"title": "...", "year": 2021, "ids": {...}}`
    Flat,
}

/// Which id namespace is used to look the poster up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdField {
    /// TMDB cross-reference id, the namespace the image API is keyed by
    Tmdb,
    /// Trakt-native numeric id
    Trakt,
}

/// Per-category fetch and shaping rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryDescriptor {
    pub endpoint: &'static str,
    pub scope: Scope,
    pub shape: RecordShape,
    pub id_field: IdField,
    pub truncate_to: Option<usize>,
}

/// Trakt ids and slugs: lowercase ASCII letters, digits and hyphens
pub fn is_trakt_id(value: &str) -> bool {
    !value.is_empty()
        && value
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

impl CategoryDescriptor {
    /// Builds the request path, substituting `{user}` or `{seed}`.
    ///
    /// The substituted id must be a Trakt id or slug, so it can never add
    /// path segments or a query to the request.
    pub fn path(&self, user_id: Option<&str>, seed: Option<&str>) -> AppResult<String> {
        let (placeholder, id) = match self.scope {
            Scope::Global => return Ok(self.endpoint.to_string()),
            Scope::User => ("{user}", user_id),
            Scope::Seed => ("{seed}", seed),
        };

        match id {
            Some(id) if is_trakt_id(id) => Ok(self.endpoint.replace(placeholder, id)),
            Some(id) => Err(AppError::InvalidInput(format!(
                "'{}' is not a Trakt id or slug",
                id
            ))),
            None => Err(AppError::InvalidInput(format!(
                "{} requires an id",
                self.endpoint
            ))),
        }
    }
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Watched,
        Category::Watchlist,
        Category::Trending,
        Category::Favorited,
        Category::Cinema,
        Category::Anticipated,
        Category::Recommended,
        Category::Related,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Watched => "watched",
            Category::Watchlist => "watchlist",
            Category::Trending => "trending",
            Category::Favorited => "favorited",
            Category::Cinema => "cinema",
            Category::Anticipated => "anticipated",
            Category::Recommended => "recommended",
            Category::Related => "related",
        }
    }

    /// Endpoint, id namespace and truncation for this category.
    ///
    /// The id field has to match what the image API is keyed by; pointing a
    /// category at the wrong namespace resolves the wrong poster or none.
    pub fn descriptor(&self) -> CategoryDescriptor {
        use IdField::*;
        use RecordShape::*;
        use Scope::*;

        let (endpoint, scope, shape, id_field, truncate_to) = match self {
            Category::Watched => ("/users/{user}/watched/movies", User, Wrapped, Tmdb, None),
            Category::Watchlist => ("/users/{user}/watchlist/movies", User, Wrapped, Tmdb, None),
            Category::Trending => ("/movies/trending", Global, Wrapped, Tmdb, Some(TRUNCATE_LIMIT)),
            Category::Favorited => (
                "/movies/favorited/weekly",
                Global,
                Wrapped,
                Tmdb,
                Some(TRUNCATE_LIMIT),
            ),
            Category::Cinema => ("/movies/boxoffice", Global, Wrapped, Tmdb, None),
            Category::Anticipated => (
                "/movies/anticipated",
                Global,
                Wrapped,
                Tmdb,
                Some(TRUNCATE_LIMIT),
            ),
            Category::Recommended => (
                "/recommendations/movies",
                Global,
                Flat,
                Tmdb,
                Some(TRUNCATE_LIMIT),
            ),
            Category::Related => ("/movies/{seed}/related", Seed, Flat, Tmdb, Some(TRUNCATE_LIMIT)),
        };

        CategoryDescriptor {
            endpoint,
            scope,
            shape,
            id_field,
            truncate_to,
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| AppError::ListNotFound(format!("no movie list named '{}'", s)))
    }
}
