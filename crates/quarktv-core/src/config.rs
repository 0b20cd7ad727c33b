//! Provider credentials and endpoint configuration

use crate::error::{Error, Result};
use serde::Deserialize;

/// Bunny Stream API origin
pub const DEFAULT_BASE_URL: &str = "https://video.bunnycdn.com";

pub const ENV_API_KEY: &str = "BUNNY_STREAM_API_KEY";
pub const ENV_LIBRARY_ID: &str = "BUNNY_STREAM_LIBRARY_ID";
pub const ENV_BASE_URL: &str = "BUNNY_STREAM_BASE_URL";
pub const ENV_CDN_HOSTNAME: &str = "BUNNY_STREAM_CDN_HOSTNAME";
pub const ENV_TOKEN_AUTH_KEY: &str = "BUNNY_STREAM_TOKEN_AUTH_KEY";

/// Client configuration as supplied by the operator.
///
/// Optional fields are resolved to their defaults when a
/// [`StreamingClient`](crate::StreamingClient) is built; an empty string
/// counts as absent.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// API access key (secret)
    pub api_key: String,
    /// Video library identifier
    pub library_id: String,
    /// API origin, defaults to [`DEFAULT_BASE_URL`]
    #[serde(default)]
    pub base_url: Option<String>,
    /// CDN pull zone host, defaults to `vz-{library_id}.b-cdn.net`
    #[serde(default)]
    pub cdn_hostname: Option<String>,
    /// Key used to sign CDN URLs, defaults to the API key
    #[serde(default)]
    pub token_auth_key: Option<String>,
}

impl ClientConfig {
    /// Create a configuration with only the required credentials
    pub fn new(api_key: impl Into<String>, library_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            library_id: library_id.into(),
            base_url: None,
            cdn_hostname: None,
            token_auth_key: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_cdn_hostname(mut self, cdn_hostname: impl Into<String>) -> Self {
        self.cdn_hostname = Some(cdn_hostname.into());
        self
    }

    pub fn with_token_auth_key(mut self, token_auth_key: impl Into<String>) -> Self {
        self.token_auth_key = Some(token_auth_key.into());
        self
    }

    /// Load configuration from `BUNNY_STREAM_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |name: &str| {
            non_empty(lookup(name))
                .ok_or_else(|| Error::InvalidConfig(format!("{name} is not set")))
        };

        Ok(Self {
            api_key: required(ENV_API_KEY)?,
            library_id: required(ENV_LIBRARY_ID)?,
            base_url: non_empty(lookup(ENV_BASE_URL)),
            cdn_hostname: non_empty(lookup(ENV_CDN_HOSTNAME)),
            token_auth_key: non_empty(lookup(ENV_TOKEN_AUTH_KEY)),
        })
    }

    pub(crate) fn resolve(self) -> ResolvedConfig {
        let base_url = non_empty(self.base_url).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let cdn_hostname = non_empty(self.cdn_hostname)
            .unwrap_or_else(|| default_cdn_hostname(&self.library_id));
        let token_auth_key = non_empty(self.token_auth_key).unwrap_or_else(|| self.api_key.clone());

        ResolvedConfig {
            api_key: self.api_key,
            library_id: self.library_id,
            base_url,
            cdn_hostname,
            token_auth_key,
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("library_id", &self.library_id)
            .field("base_url", &self.base_url)
            .field("cdn_hostname", &self.cdn_hostname)
            .field("token_auth_key", &self.token_auth_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// CDN host the provider assigns to a library
pub fn default_cdn_hostname(library_id: &str) -> String {
    format!("vz-{library_id}.b-cdn.net")
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Configuration with every default applied. Never mutated once built.
#[derive(Clone)]
pub(crate) struct ResolvedConfig {
    pub api_key: String,
    pub library_id: String,
    pub base_url: String,
    pub cdn_hostname: String,
    pub token_auth_key: String,
}
