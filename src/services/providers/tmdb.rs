/// TMDB image provider
///
/// Resolves backdrop URLs for a movie by its TMDB id:
/// `/movie/{id}/images` -> `backdrops[].file_path` joined onto the image base.
use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::ApiImages,
    services::providers::PosterProvider,
};
use reqwest::Client as HttpClient;
use tracing::instrument;

#[derive(Clone)]
pub struct TmdbPosterResolver {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
    image_base: String,
}

impl TmdbPosterResolver {
    pub fn new(
        http_client: HttpClient,
        api_key: Option<String>,
        api_url: String,
        image_base: String,
    ) -> Self {
        Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            image_base: image_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(http_client: HttpClient, config: &Config) -> Self {
        Self::new(
            http_client,
            config.tmdb_api_key.clone(),
            config.tmdb_api_url.clone(),
            config.tmdb_image_base.clone(),
        )
    }

    /// Full URLs for every backdrop carrying a `file_path`, in provider order
    fn backdrop_urls(&self, images: ApiImages) -> Vec<String> {
        images
            .backdrops
            .into_iter()
            .filter_map(|image| image.file_path)
            .map(|path| format!("{}{}", self.image_base, path))
            .collect()
    }
}

#[async_trait::async_trait]
impl PosterProvider for TmdbPosterResolver {
    #[instrument(skip(self), fields(provider = "tmdb"))]
    async fn resolve(&self, movie_id: u64) -> AppResult<Vec<String>> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AppError::Configuration("TMDB_API_KEY is not set".to_string())
        })?;

        let url = format!("{}/movie/{}/images", self.api_url, movie_id);
        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", api_key)])
            .send()
            .await
            .map_err(|e| AppError::ImageFetch(format!("movie {}: {}", movie_id, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::ImageFetch(format!(
                "movie {}: API returned status {}",
                movie_id, status
            )));
        }

        let images: ApiImages = response
            .json()
            .await
            .map_err(|e| AppError::ImageFetch(format!("movie {}: unreadable images: {}", movie_id, e)))?;
        let urls = self.backdrop_urls(images);

        tracing::debug!(
            movie_id = movie_id,
            backdrops = urls.len(),
            provider = "tmdb",
            "Backdrops resolved"
        );

        Ok(urls)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ApiImage;

    fn create_test_resolver(api_key: Option<&str>) -> TmdbPosterResolver {
        TmdbPosterResolver::new(
            HttpClient::new(),
            api_key.map(str::to_string),
            "http://127.0.0.1:1/3".to_string(),
            "https://image.tmdb.org/t/p/w500/".to_string(),
        )
    }

    fn image(file_path: Option<&str>) -> ApiImage {
        ApiImage {
            file_path: file_path.map(str::to_string),
        }
    }

    #[test]
    fn test_backdrop_urls_joined_with_base() {
        let resolver = create_test_resolver(Some("key"));
        let urls = resolver.backdrop_urls(ApiImages {
            backdrops: vec![image(Some("/abc.jpg")), image(Some("/def.jpg"))],
        });

        assert_eq!(
            urls,
            vec![
                "https://image.tmdb.org/t/p/w500/abc.jpg".to_string(),
                "https://image.tmdb.org/t/p/w500/def.jpg".to_string(),
            ]
        );
    }

    #[test]
    fn test_backdrops_without_path_are_skipped() {
        let resolver = create_test_resolver(Some("key"));
        let urls = resolver.backdrop_urls(ApiImages {
            backdrops: vec![image(None), image(Some("/only.jpg")), image(None)],
        });

        assert_eq!(urls, vec!["https://image.tmdb.org/t/p/w500/only.jpg".to_string()]);
    }

    #[test]
    fn test_no_backdrops_is_empty() {
        let resolver = create_test_resolver(Some("key"));
        assert!(resolver.backdrop_urls(ApiImages { backdrops: vec![] }).is_empty());
    }

    #[test]
    fn test_images_body_requires_backdrops() {
        assert!(serde_json::from_str::<ApiImages>(r#"{"id": 438631, "posters": []}"#).is_err());
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_request() {
        let resolver = create_test_resolver(None);
        let result = resolver.resolve(438631).await;
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }
}
