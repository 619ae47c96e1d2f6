use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{
        AccessToken, Category, DisplayMovie, IdField, MovieRecord, Scope, SeedId,
        PLACEHOLDER_POSTER,
    },
    services::providers::{CatalogProvider, PosterProvider},
};

/// Builds display-ready movie lists from the catalog and the poster provider.
///
/// One catalog call per list, then one poster lookup per kept record, awaited
/// in catalog order. Poster failures are contained per item and replaced with
/// [`PLACEHOLDER_POSTER`]; catalog and profile failures abort the build.
#[derive(Clone)]
pub struct ListAggregator {
    catalog: Arc<dyn CatalogProvider>,
    posters: Arc<dyn PosterProvider>,
}

impl ListAggregator {
    pub fn new(catalog: Arc<dyn CatalogProvider>, posters: Arc<dyn PosterProvider>) -> Self {
        Self { catalog, posters }
    }

    /// Builds the named list for the token's owner
    pub async fn build_display_list(
        &self,
        category: Category,
        token: &AccessToken,
    ) -> AppResult<Vec<DisplayMovie>> {
        let scope_id = match category.descriptor().scope {
            Scope::Global => None,
            Scope::User => Some(self.catalog.fetch_profile(token).await?.user_id),
            Scope::Seed => match self.latest_watched(token).await? {
                Some(seed) => Some(seed),
                None => {
                    tracing::info!(category = %category, "No watch history to seed from");
                    return Ok(Vec::new());
                }
            },
        };

        self.assemble(category, token, scope_id).await
    }

    /// Builds the related list for an explicit seed movie
    pub async fn build_related_list(
        &self,
        seed: &SeedId,
        token: &AccessToken,
    ) -> AppResult<Vec<DisplayMovie>> {
        let SeedId(seed) = SeedId::parse(&seed.0)?;

        self.assemble(Category::Related, token, Some(seed)).await
    }

    /// Slug (or Trakt id) of the first entry in the user's watch history
    async fn latest_watched(&self, token: &AccessToken) -> AppResult<Option<String>> {
        let profile = self.catalog.fetch_profile(token).await?;
        let watched = self
            .catalog
            .fetch_list(Category::Watched, token, Some(profile.user_id))
            .await?;

        Ok(watched.into_iter().next().and_then(|movie| {
            movie
                .ids
                .slug
                .or_else(|| movie.ids.trakt.map(|id| id.to_string()))
        }))
    }

    async fn assemble(
        &self,
        category: Category,
        token: &AccessToken,
        scope_id: Option<String>,
    ) -> AppResult<Vec<DisplayMovie>> {
        let descriptor = category.descriptor();
        let mut records = self.catalog.fetch_list(category, token, scope_id).await?;

        if records.is_empty() {
            tracing::info!(category = %category, "Catalog returned an empty list");
            return Ok(Vec::new());
        }

        if let Some(limit) = descriptor.truncate_to {
            records.truncate(limit);
        }

        let mut movies = Vec::with_capacity(records.len());
        let mut placeholders = 0;

        for record in records {
            let poster_url = match self.poster_for(&record, descriptor.id_field).await {
                Some(url) => url,
                None => {
                    placeholders += 1;
                    PLACEHOLDER_POSTER.to_string()
                }
            };

            movies.push(DisplayMovie {
                title: record.title,
                year: record.year,
                poster_url,
            });
        }

        tracing::info!(
            category = %category,
            movies = movies.len(),
            placeholders = placeholders,
            "Display list built"
        );

        Ok(movies)
    }

    /// First resolvable poster URL, or `None` when the placeholder applies
    async fn poster_for(&self, record: &MovieRecord, id_field: IdField) -> Option<String> {
        let Some(movie_id) = record.lookup_id(id_field) else {
            tracing::warn!(
                title = %record.title,
                id_field = ?id_field,
                "Record has no id to look the poster up with"
            );
            return None;
        };

        match self.posters.resolve(movie_id).await {
            Ok(urls) => urls.into_iter().find(|url| !url.is_empty()),
            Err(e @ AppError::Configuration(_)) => {
                tracing::error!(error = %e, movie_id = movie_id, "Poster lookup misconfigured");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, movie_id = movie_id, title = %record.title, "Poster lookup failed");
                None
            }
        }
    }
}
