//! Bunny Stream API client
//!
//! Every network call goes through one authenticated helper that adds the
//! `AccessKey` credential, fails on non-success status with the response
//! body attached, and decodes the JSON payload. Thumbnail URLs are signed
//! locally and never touch the network.

use crate::{
    config::{ClientConfig, ResolvedConfig},
    token::{Clock, SecurityToken, SystemClock},
    types::{PlayData, VideoMetadata},
    Error, Result,
};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::{Client, Method};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Header carrying the API key
pub const ACCESS_KEY_HEADER: &str = "accesskey";

/// Per-request overrides for [`StreamingClient::request`]
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Defaults to GET
    pub method: Method,
    /// Merged over the base headers; same-name headers replace them
    pub headers: HeaderMap,
    pub body: Option<String>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Set a JSON body and the matching content type
    pub fn with_json_body<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_string(body)?);
        self.headers.insert(
            reqwest::header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        Ok(self)
    }
}

/// Authenticated client for one video library
#[derive(Clone)]
pub struct StreamingClient {
    config: ResolvedConfig,
    http: Client,
    clock: Arc<dyn Clock>,
}

impl StreamingClient {
    /// Create a client with a default HTTP transport. Performs no I/O.
    pub fn new(config: ClientConfig) -> Self {
        Self::with_http_client(config, Client::new())
    }

    /// Create a client over a caller-configured transport (timeouts, proxies)
    pub fn with_http_client(config: ClientConfig, http: Client) -> Self {
        Self {
            config: config.resolve(),
            http,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the time source used for token expiration
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn library_id(&self) -> &str {
        &self.config.library_id
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn cdn_hostname(&self) -> &str {
        &self.config.cdn_hostname
    }

    /// Fetch descriptive metadata for a video
    #[instrument(skip(self))]
    pub async fn get_video(&self, video_id: &str) -> Result<VideoMetadata> {
        self.fetch_with_auth(&self.video_path(video_id, ""), RequestOptions::default())
            .await
    }

    /// Fetch the viewer heatmap (provider-shaped JSON)
    #[instrument(skip(self))]
    pub async fn get_video_heatmap(&self, video_id: &str) -> Result<Value> {
        self.fetch_with_auth(&self.video_path(video_id, "/heatmap"), RequestOptions::default())
            .await
    }

    /// Fetch view statistics (provider-shaped JSON)
    #[instrument(skip(self))]
    pub async fn get_video_statistics(&self, video_id: &str) -> Result<Value> {
        self.fetch_with_auth(&self.video_path(video_id, "/statistics"), RequestOptions::default())
            .await
    }

    /// Fetch the playback descriptor for a video
    #[instrument(skip(self))]
    pub async fn get_play_url(&self, video_id: &str) -> Result<PlayData> {
        self.fetch_with_auth(&self.video_path(video_id, "/play"), RequestOptions::default())
            .await
    }

    /// HLS playlist URL for a video.
    ///
    /// Resolves to an empty string when the provider response has no
    /// playlist; callers must check before handing it to a player.
    #[instrument(skip(self))]
    pub async fn get_hls_stream_url(&self, video_id: &str) -> Result<String> {
        let play = self.get_play_url(video_id).await?;
        let url = play.hls_url();
        if url.is_empty() {
            warn!(video_id, "Play data has no playlist URL");
        }
        Ok(url)
    }

    /// Signed thumbnail URL, optionally at a given time offset.
    ///
    /// A `time` of zero, NaN or infinity is treated as absent.
    pub fn get_thumbnail_url(&self, video_id: &str, time: Option<f64>) -> String {
        let path = format!("/{video_id}/thumbnail.jpg");
        let mut url = self.signed_url(&path);
        if let Some(time) = time.filter(|t| *t != 0.0 && t.is_finite()) {
            url.push_str("&time=");
            url.push_str(&format_time(time));
        }
        url
    }

    /// Sign an arbitrary CDN path: `https://{cdn_hostname}{path}?token=...`
    pub fn signed_url(&self, path: &str) -> String {
        let token = self.security_token(path);
        let slash = if path.starts_with('/') { "" } else { "/" };
        format!("https://{}{slash}{path}?token={token}", self.config.cdn_hostname)
    }

    /// Token for `path`, expiring one hour from the client's clock
    pub fn security_token(&self, path: &str) -> SecurityToken {
        SecurityToken::generate(&self.config.token_auth_key, path, self.clock.now_unix())
    }

    /// Authenticated call to any API path not modelled by the accessors
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T> {
        self.fetch_with_auth(endpoint, options).await
    }

    fn video_path(&self, video_id: &str, suffix: &str) -> String {
        format!("/library/{}/videos/{video_id}{suffix}", self.config.library_id)
    }

    fn base_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut key = HeaderValue::from_str(&self.config.api_key)?;
        key.set_sensitive(true);
        headers.insert(HeaderName::from_static(ACCESS_KEY_HEADER), key);

        Ok(headers)
    }

    async fn fetch_with_auth<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T> {
        let url = format!("{}{}", self.config.base_url, endpoint);

        let mut headers = self.base_headers()?;
        headers.extend(options.headers);

        debug!(method = %options.method, url = %url, "Fetching");

        let mut request = self.http.request(options.method, &url).headers(headers);
        if let Some(body) = options.body {
            request = request.body(body);
        }

        let response = request.send().await?;
        let status = response.status();
        // Read the body first so a failure still carries the provider's message
        let text = response.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), body = %text, "API error");
            return Err(Error::Request {
                status: status.as_u16(),
                body: text,
            });
        }

        let data = serde_json::from_str(&text)?;
        debug!(endpoint, bytes = text.len(), "API response");
        Ok(data)
    }
}

/// Decimal below 1e21 and down to 1e-6, exponent form (`1e+21`, `1e-7`) outside
fn format_time(time: f64) -> String {
    let magnitude = time.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return time.to_string();
    }
    let exp = format!("{time:e}");
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
        _ => exp,
    }
}

impl std::fmt::Debug for StreamingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamingClient")
            .field("library_id", &self.config.library_id)
            .field("base_url", &self.config.base_url)
            .field("cdn_hostname", &self.config.cdn_hostname)
            .finish_non_exhaustive()
    }
}
