use std::env;

use thiserror::Error;
use url::Url;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
pub const DEFAULT_USER_ID: &str = "default_user";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid backend URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("backend URL must be http or https: {0:?}")]
    UnsupportedScheme(String),
}

/// Where the backend lives and who the session starts out as.
#[derive(Debug, Clone)]
pub struct Config {
    pub backend_url: Url,
    pub default_user_id: String,
}

impl Config {
    /// Reads `BACKEND_URL` and `USER_ID`, falling back to the local defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let backend_url = env::var("BACKEND_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string());
        let user_id = env::var("USER_ID").unwrap_or_else(|_| DEFAULT_USER_ID.to_string());
        Self::new(&backend_url, user_id)
    }

    pub fn new(backend_url: &str, default_user_id: impl Into<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            backend_url: parse_base_url(backend_url)?,
            default_user_id: default_user_id.into(),
        })
    }

    /// Applies command line overrides on top of the environment.
    pub fn with_overrides(
        mut self,
        backend_url: Option<&str>,
        user_id: Option<&str>,
    ) -> Result<Self, ConfigError> {
        if let Some(url) = backend_url {
            self.backend_url = parse_base_url(url)?;
        }
        if let Some(id) = user_id {
            self.default_user_id = id.to_string();
        }
        Ok(self)
    }

    /// `{base}/{path}` without losing any path prefix or query the base
    /// already has.
    pub fn endpoint(&self, path: &str) -> Url {
        let mut url = self.backend_url.clone();
        let joined = format!(
            "{}/{}",
            url.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        url.set_path(&joined);
        url.set_fragment(None);
        url
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::UnsupportedScheme(raw.to_string()));
    }
    Ok(url)
}
