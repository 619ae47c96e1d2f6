/// Trakt API provider
///
/// Covers both halves of the tracking API this service needs:
/// 1. OAuth: `/oauth/authorize` (user-facing URL) and `/oauth/token` (code exchange)
/// 2. Lists: `/users/settings` plus one endpoint per [`Category`]
///
/// The bearer token is passed into every call and never kept on the client.
use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{
        AccessToken, ApiSettings, ApiTokenResponse, ApiWrappedMovie, Category, MovieRecord,
        Profile, RecordShape,
    },
    services::providers::{AuthProvider, CatalogProvider},
};
use reqwest::{Client as HttpClient, RequestBuilder, Url};
use serde_json::json;
use tracing::instrument;

const API_VERSION: &str = "2";

/// Thin authenticated transport: base URL, client id and the Trakt headers
#[derive(Clone)]
pub struct TraktTransport {
    http_client: HttpClient,
    api_url: String,
    client_id: String,
}

impl TraktTransport {
    pub fn new(http_client: HttpClient, api_url: String, client_id: String) -> Self {
        Self {
            http_client,
            api_url: api_url.trim_end_matches('/').to_string(),
            client_id,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// GET with the headers every authenticated Trakt call carries
    fn get(&self, path: &str, token: &AccessToken) -> RequestBuilder {
        self.http_client
            .get(self.url(path))
            .bearer_auth(token.as_str())
            .header("Content-Type", "application/json")
            .header("trakt-api-version", API_VERSION)
            .header("trakt-api-key", &self.client_id)
    }
}

/// Authorization gateway for the Trakt OAuth application
#[derive(Clone)]
pub struct TraktAuth {
    transport: TraktTransport,
    client_secret: String,
    redirect_uri: String,
    authorize_url: Url,
}

impl TraktAuth {
    pub fn new(
        http_client: HttpClient,
        api_url: String,
        client_id: String,
        client_secret: String,
        redirect_uri: String,
    ) -> AppResult<Self> {
        let transport = TraktTransport::new(http_client, api_url, client_id);
        let authorize_url = Url::parse(&transport.url("/oauth/authorize")).map_err(|e| {
            AppError::Configuration(format!("invalid Trakt API URL '{}': {}", transport.api_url, e))
        })?;

        Ok(Self {
            transport,
            client_secret,
            redirect_uri,
            authorize_url,
        })
    }

    pub fn from_config(http_client: HttpClient, config: &Config) -> AppResult<Self> {
        Self::new(
            http_client,
            config.trakt_api_url.clone(),
            config.client_id.clone(),
            config.client_secret.clone(),
            config.redirect_uri.clone(),
        )
    }
}

#[async_trait::async_trait]
impl AuthProvider for TraktAuth {
    fn authorization_url(&self) -> String {
        let mut url = self.authorize_url.clone();
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.transport.client_id)
            .append_pair("redirect_uri", &self.redirect_uri);
        url.to_string()
    }

    async fn exchange_code(&self, code: &str) -> AppResult<AccessToken> {
        let code = code.trim();
        if code.is_empty() {
            return Err(AppError::InvalidInput(
                "Authorization code cannot be empty".to_string(),
            ));
        }

        let body = json!({
            "code": code,
            "client_id": self.transport.client_id,
            "client_secret": self.client_secret,
            "redirect_uri": self.redirect_uri,
            "grant_type": "authorization_code",
        });

        let response = self
            .transport
            .http_client
            .post(self.transport.url("/oauth/token"))
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::TokenExchange(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %body, "Token exchange rejected");
            return Err(AppError::TokenExchange(format!(
                "API returned status {}: {}",
                status, body
            )));
        }

        let token: ApiTokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::TokenExchange(format!("unreadable token response: {}", e)))?;

        let access_token = token.access_token.ok_or_else(|| {
            AppError::TokenExchange("token response has no access_token".to_string())
        })?;

        tracing::info!(
            token_type = token.token_type.as_deref().unwrap_or("unknown"),
            expires_in = token.expires_in,
            scope = token.scope.as_deref().unwrap_or("unknown"),
            "Access token obtained"
        );

        Ok(AccessToken::new(access_token))
    }
}

/// Catalog client for the authenticated list endpoints
#[derive(Clone)]
pub struct TraktClient {
    transport: TraktTransport,
}

impl TraktClient {
    pub fn new(http_client: HttpClient, api_url: String, client_id: String) -> Self {
        Self {
            transport: TraktTransport::new(http_client, api_url, client_id),
        }
    }

    pub fn from_config(http_client: HttpClient, config: &Config) -> Self {
        Self::new(
            http_client,
            config.trakt_api_url.clone(),
            config.client_id.clone(),
        )
    }

    /// Decodes a list body according to the category's item layout
    fn decode_list(shape: RecordShape, body: &str) -> serde_json::Result<Vec<MovieRecord>> {
        match shape {
            RecordShape::Wrapped => Ok(serde_json::from_str::<Vec<ApiWrappedMovie>>(body)?
                .into_iter()
                .map(|item| item.movie)
                .collect()),
            RecordShape::Flat => serde_json::from_str(body),
        }
    }
}

#[async_trait::async_trait]
impl CatalogProvider for TraktClient {
    #[instrument(skip_all, fields(provider = "trakt"))]
    async fn fetch_profile(&self, token: &AccessToken) -> AppResult<Profile> {
        let response = self
            .transport
            .get("/users/settings", token)
            .send()
            .await
            .map_err(|e| AppError::ProfileFetch(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ProfileFetch(format!(
                "API returned status {}: {}",
                status, body
            )));
        }

        let settings: ApiSettings = response
            .json()
            .await
            .map_err(|e| AppError::ProfileFetch(format!("unreadable settings: {}", e)))?;
        let profile = Profile::from(settings);

        tracing::debug!(user_id = %profile.user_id, "Profile fetched");

        Ok(profile)
    }

    #[instrument(skip(self, category, token), fields(category = %category, provider = "trakt"))]
    async fn fetch_list(
        &self,
        category: Category,
        token: &AccessToken,
        scope_id: Option<String>,
    ) -> AppResult<Vec<MovieRecord>> {
        let descriptor = category.descriptor();
        let scope_id = scope_id.as_deref();
        let path = descriptor.path(scope_id, scope_id)?;

        let response = self
            .transport
            .get(&path, token)
            .send()
            .await
            .map_err(|e| AppError::CatalogFetch(format!("{}: {}", category, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::CatalogFetch(format!(
                "{}: API returned status {}: {}",
                category, status, body
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::CatalogFetch(format!("{}: {}", category, e)))?;
        let records = Self::decode_list(descriptor.shape, &body).map_err(|e| {
            AppError::CatalogFetch(format!("{}: unreadable list body: {}", category, e))
        })?;

        tracing::info!(
            category = %category,
            path = %path,
            results = records.len(),
            provider = "trakt",
            "Catalog list fetched"
        );

        Ok(records)
    }

    fn name(&self) -> &'static str {
        "trakt"
    }
}
