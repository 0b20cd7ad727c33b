//! QuarkTV Core - Bunny Stream client for the QuarkTV player
//!
//! This crate provides:
//! - Authenticated requests to the Bunny Stream video API
//! - Typed video metadata and play data
//! - HLS stream URL lookup
//! - Signed, time-limited CDN thumbnail URLs
//! - A playback session that prepares a video for a player view
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                     QuarkTV Core                        │
//! ├─────────────────────────────────────────────────────────┤
//! │                                                         │
//! │  ┌──────────────┐        ┌──────────────┐               │
//! │  │ ClientConfig │───────▶│  Streaming   │──▶ video API  │
//! │  └──────────────┘        │    Client    │               │
//! │                          └──────┬───────┘               │
//! │                                 │                       │
//! │              ┌──────────────────┼──────────────┐        │
//! │              │                  │              │        │
//! │       ┌──────┴──────┐   ┌───────┴──────┐ ┌─────┴─────┐  │
//! │       │  Security   │   │   Playback   │ │  Types    │  │
//! │       │   Token     │   │   Session    │ │           │  │
//! │       └─────────────┘   └──────────────┘ └───────────┘  │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use quarktv_core::{ClientConfig, StreamingClient};
//!
//! # async fn example() -> quarktv_core::Result<()> {
//! let client = StreamingClient::new(ClientConfig::new("api-key", "12345"));
//!
//! let (video, stream_url) = tokio::try_join!(
//!     client.get_video("video-guid"),
//!     client.get_hls_stream_url("video-guid"),
//! )?;
//! let poster = client.get_thumbnail_url("video-guid", Some(10.0));
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod session;
pub mod token;
pub mod types;

pub use client::{RequestOptions, StreamingClient};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use session::{PlaybackOptions, PlaybackSession, PlaybackSource, PlaybackState, SessionId, VideoSource};
pub use token::{Clock, FixedClock, SecurityToken, SystemClock};
pub use types::*;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
