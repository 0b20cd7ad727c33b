//! Playback Session - prepares a video for a player view
//!
//! Coordinates:
//! - Metadata and stream URL lookup (issued concurrently)
//! - State machine transitions
//! - Handing the player a ready-to-load source

use crate::{client::StreamingClient, types::VideoMetadata, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// MIME type handed to the player for HLS sources
pub const HLS_MIME_TYPE: &str = "application/x-mpegurl";

/// Unique identifier for a playback session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a player needs from the provider
#[async_trait]
pub trait VideoSource: Send + Sync {
    async fn get_video(&self, video_id: &str) -> Result<VideoMetadata>;

    async fn get_hls_stream_url(&self, video_id: &str) -> Result<String>;
}

#[async_trait]
impl VideoSource for StreamingClient {
    async fn get_video(&self, video_id: &str) -> Result<VideoMetadata> {
        StreamingClient::get_video(self, video_id).await
    }

    async fn get_hls_stream_url(&self, video_id: &str) -> Result<String> {
        StreamingClient::get_hls_stream_url(self, video_id).await
    }
}

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaybackState {
    Idle,
    Loading,
    Ready,
    Failed,
}

impl std::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaybackState::Idle => write!(f, "idle"),
            PlaybackState::Loading => write!(f, "loading"),
            PlaybackState::Ready => write!(f, "ready"),
            PlaybackState::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackOptions {
    pub autoplay: bool,
}

/// Resolved source for a player
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSource {
    pub video_id: String,
    /// Empty when the provider returned no playlist
    pub stream_url: String,
    pub mime_type: &'static str,
    pub autoplay: bool,
    pub metadata: VideoMetadata,
}

impl PlaybackSource {
    /// False when there is nothing to hand to the player
    pub fn is_playable(&self) -> bool {
        !self.stream_url.is_empty()
    }
}

/// Loads videos for one player view
pub struct PlaybackSession {
    id: SessionId,
    source: Arc<dyn VideoSource>,
    options: PlaybackOptions,
    state_tx: watch::Sender<PlaybackState>,
}

impl PlaybackSession {
    pub fn new(source: Arc<dyn VideoSource>, options: PlaybackOptions) -> Self {
        let (state_tx, _) = watch::channel(PlaybackState::Idle);
        Self {
            id: SessionId::new(),
            source,
            options,
            state_tx,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn state(&self) -> PlaybackState {
        *self.state_tx.borrow()
    }

    /// Subscribe to state changes
    pub fn subscribe_state(&self) -> watch::Receiver<PlaybackState> {
        self.state_tx.subscribe()
    }

    fn set_state(&self, state: PlaybackState) {
        let previous = self.state_tx.send_replace(state);
        if previous != state {
            info!(from = %previous, to = %state, session_id = %self.id, "State transition");
        }
    }

    /// Fetch metadata and the stream URL in parallel.
    ///
    /// Either failure fails the load; there is no retry.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub async fn load(&self, video_id: &str) -> Result<PlaybackSource> {
        self.set_state(PlaybackState::Loading);

        let fetched = tokio::try_join!(
            self.source.get_video(video_id),
            self.source.get_hls_stream_url(video_id),
        );

        let (metadata, stream_url) = match fetched {
            Ok(pair) => pair,
            Err(e) => {
                warn!(error = %e, code = e.error_code(), "Failed to set up playback");
                self.set_state(PlaybackState::Failed);
                return Err(e);
            }
        };

        let source = PlaybackSource {
            video_id: video_id.to_string(),
            stream_url,
            mime_type: HLS_MIME_TYPE,
            autoplay: self.options.autoplay,
            metadata,
        };

        if !source.is_playable() {
            warn!("No stream URL available, nothing to play");
        }

        self.set_state(PlaybackState::Ready);
        Ok(source)
    }
}
