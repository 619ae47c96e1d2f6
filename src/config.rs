use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Trakt application client id
    pub client_id: String,

    /// Trakt application client secret, read from `CLIENT_SECRET` or
    /// `SECRET_ID`. Only one of the two may be set.
    #[serde(alias = "secret_id")]
    pub client_secret: String,

    /// Redirect URI registered with the Trakt application
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,

    /// TMDB API key, checked lazily by the poster resolver
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    /// Trakt API base URL
    #[serde(default = "default_trakt_api_url")]
    pub trakt_api_url: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Prefix joined with TMDB `file_path` values
    #[serde(default = "default_tmdb_image_base")]
    pub tmdb_image_base: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_redirect_uri() -> String {
    "urn:ietf:wg:oauth:2.0:oob".to_string()
}

fn default_trakt_api_url() -> String {
    "https://api.trakt.tv".to_string()
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_base() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from an explicit set of variables
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

        // An empty key behaves like an unset one.
        Ok(Config {
            tmdb_api_key: config.tmdb_api_key.filter(|key| !key.trim().is_empty()),
            ..config
        })
    }
}
