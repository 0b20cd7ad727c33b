//! Provider response types
//!
//! Every field the provider may omit while a video is still processing is an
//! `Option`. Only the identifiers are required.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;

/// Descriptive record for one video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoMetadata {
    #[serde(deserialize_with = "string_or_number")]
    pub video_library_id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub guid: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub date_uploaded: Option<String>,
    #[serde(default)]
    pub views: Option<u64>,
    #[serde(default)]
    pub is_public: Option<bool>,
    /// Length in seconds
    #[serde(default)]
    pub length: Option<f64>,
    /// Raw encoding status code, see [`EncodingStatus`]
    #[serde(default)]
    pub status: Option<i32>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default, deserialize_with = "list_or_csv")]
    pub resolutions: Option<Vec<String>>,
    #[serde(default)]
    pub encode_progress: Option<f64>,
    /// Size in bytes
    #[serde(default)]
    pub storage_size: Option<u64>,
    #[serde(default)]
    pub captions: Option<Vec<Caption>>,
}

impl VideoMetadata {
    pub fn encoding_status(&self) -> Option<EncodingStatus> {
        self.status.map(EncodingStatus::from_code)
    }

    pub fn duration(&self) -> Option<Duration> {
        self.length
            .filter(|l| l.is_finite() && *l >= 0.0)
            .map(Duration::from_secs_f64)
    }

    /// Upload timestamp. The provider sends ISO-8601 without an offset (UTC).
    pub fn uploaded_at(&self) -> Option<NaiveDateTime> {
        let raw = self.date_uploaded.as_deref()?;
        let raw = raw.trim_end_matches('Z');
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()
    }

    /// Caption tracks in provider order; empty when none were returned
    pub fn caption_tracks(&self) -> &[Caption] {
        self.captions.as_deref().unwrap_or_default()
    }
}

/// One caption track attached to a video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caption {
    /// Language code, e.g. `en`
    #[serde(default)]
    pub srclang: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Encoding state reported in [`VideoMetadata::status`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EncodingStatus {
    Created,
    Uploaded,
    Processing,
    Transcoding,
    Finished,
    Error,
    UploadFailed,
    JitSegmenting,
    JitPlaylistsCreated,
    Unknown(i32),
}

impl EncodingStatus {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => EncodingStatus::Created,
            1 => EncodingStatus::Uploaded,
            2 => EncodingStatus::Processing,
            3 => EncodingStatus::Transcoding,
            4 => EncodingStatus::Finished,
            5 => EncodingStatus::Error,
            6 => EncodingStatus::UploadFailed,
            7 => EncodingStatus::JitSegmenting,
            8 => EncodingStatus::JitPlaylistsCreated,
            other => EncodingStatus::Unknown(other),
        }
    }

    /// Whether at least one rendition can be streamed
    pub fn is_playable(&self) -> bool {
        matches!(
            self,
            EncodingStatus::Finished
                | EncodingStatus::JitSegmenting
                | EncodingStatus::JitPlaylistsCreated
        )
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, EncodingStatus::Error | EncodingStatus::UploadFailed)
    }
}

impl std::fmt::Display for EncodingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EncodingStatus::Created => write!(f, "created"),
            EncodingStatus::Uploaded => write!(f, "uploaded"),
            EncodingStatus::Processing => write!(f, "processing"),
            EncodingStatus::Transcoding => write!(f, "transcoding"),
            EncodingStatus::Finished => write!(f, "finished"),
            EncodingStatus::Error => write!(f, "error"),
            EncodingStatus::UploadFailed => write!(f, "upload failed"),
            EncodingStatus::JitSegmenting => write!(f, "jit segmenting"),
            EncodingStatus::JitPlaylistsCreated => write!(f, "jit playlists created"),
            EncodingStatus::Unknown(code) => write!(f, "unknown ({code})"),
        }
    }
}

/// Playback descriptor for one video
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayData {
    #[serde(default)]
    pub video: Option<PlayVideo>,
    /// Adaptive streaming (HLS) playlist
    #[serde(default)]
    pub video_playlist_url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub fallback_url: Option<String>,
    #[serde(default)]
    pub captions_path: Option<String>,
    #[serde(default)]
    pub seek_path: Option<String>,
}

impl PlayData {
    /// Playlist URL, or an empty string when the provider omitted it
    pub fn hls_url(&self) -> String {
        self.video_playlist_url.clone().unwrap_or_default()
    }
}

/// Video descriptor nested in [`PlayData`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayVideo {
    #[serde(deserialize_with = "string_or_number")]
    pub video_library_id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub guid: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub framerate: Option<f64>,
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub width: Option<u32>,
}

impl PlayVideo {
    /// Returns quality tier name for the source height
    pub fn quality_name(&self) -> Option<&'static str> {
        let name = match self.height? {
            0..=240 => "240p",
            241..=360 => "360p",
            361..=480 => "480p",
            481..=720 => "720p",
            721..=1080 => "1080p",
            1081..=1440 => "1440p",
            _ => "4K",
        };
        Some(name)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Int(i64),
    Float(f64),
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s,
        StringOrNumber::Int(n) => n.to_string(),
        StringOrNumber::Float(n) => n.to_string(),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListOrCsv {
    List(Vec<String>),
    Csv(String),
}

fn list_or_csv<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<ListOrCsv>::deserialize(deserializer)?.map(|value| match value {
        ListOrCsv::List(list) => list,
        ListOrCsv::Csv(csv) => csv
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
    }))
}
