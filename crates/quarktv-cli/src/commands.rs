//! CLI command implementations

use std::sync::Arc;

use anyhow::bail;
use quarktv_core::{PlaybackOptions, PlaybackSession, StreamingClient};
use serde_json::json;
use tracing::info;

use crate::output::{emit, or_dash, OutputFormat};

/// Show video metadata
pub async fn video(client: &StreamingClient, video_id: &str, format: OutputFormat) -> anyhow::Result<()> {
    let video = client.get_video(video_id).await?;

    emit(&video, format, |v| {
        println!("Video: {}", v.guid);
        println!("  Library: {}", v.video_library_id);
        println!("  Title: {}", or_dash(v.title.as_deref()));
        println!("  Uploaded: {}", or_dash(v.uploaded_at()));
        println!("  Status: {}", or_dash(v.encoding_status()));
        println!("  Encode progress: {}", or_dash(v.encode_progress));
        println!("  Length: {}", or_dash(v.duration().map(|d| format!("{}s", d.as_secs()))));
        println!("  Views: {}", or_dash(v.views));
        println!("  Public: {}", or_dash(v.is_public));
        println!("  Storage: {}", or_dash(v.storage_size.map(|b| format!("{b} bytes"))));
        println!("  Resolutions: {}", or_dash(v.resolutions.as_ref().map(|r| r.join(", "))));

        let captions = v.caption_tracks();
        if !captions.is_empty() {
            println!("\nCaptions:");
            for (i, c) in captions.iter().enumerate() {
                println!(
                    "  {}. [{}] {} {}",
                    i + 1,
                    or_dash(c.srclang.as_deref()),
                    or_dash(c.label.as_deref()),
                    or_dash(c.url.as_deref())
                );
            }
        }
    })
}

/// Show play data
pub async fn play(client: &StreamingClient, video_id: &str, format: OutputFormat) -> anyhow::Result<()> {
    let play = client.get_play_url(video_id).await?;

    emit(&play, format, |p| {
        if let Some(video) = &p.video {
            println!("Video: {} ({})", video.guid, or_dash(video.title.as_deref()));
            println!(
                "  Size: {}x{} {}",
                or_dash(video.width),
                or_dash(video.height),
                or_dash(video.quality_name())
            );
            println!("  Framerate: {}", or_dash(video.framerate));
            println!("  Length: {}", or_dash(video.length));
        }
        println!("  Playlist: {}", or_dash(p.video_playlist_url.as_deref()));
        println!("  Thumbnail: {}", or_dash(p.thumbnail_url.as_deref()));
        println!("  Preview: {}", or_dash(p.preview_url.as_deref()));
        println!("  Fallback: {}", or_dash(p.fallback_url.as_deref()));
        println!("  Captions path: {}", or_dash(p.captions_path.as_deref()));
        println!("  Seek path: {}", or_dash(p.seek_path.as_deref()));
    })
}

/// Print the HLS playlist URL
pub async fn stream(client: &StreamingClient, video_id: &str, format: OutputFormat) -> anyhow::Result<()> {
    let url = client.get_hls_stream_url(video_id).await?;
    if url.is_empty() {
        bail!("video {video_id} has no playlist URL yet");
    }

    emit(&json!({ "videoId": video_id, "streamUrl": url }), format, |_| println!("{url}"))
}

/// Show the viewer heatmap
pub async fn heatmap(client: &StreamingClient, video_id: &str) -> anyhow::Result<()> {
    let heatmap = client.get_video_heatmap(video_id).await?;
    println!("{}", serde_json::to_string_pretty(&heatmap)?);
    Ok(())
}

/// Show view statistics
pub async fn stats(client: &StreamingClient, video_id: &str) -> anyhow::Result<()> {
    let stats = client.get_video_statistics(video_id).await?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

/// Print a signed thumbnail URL
pub fn thumbnail(
    client: &StreamingClient,
    video_id: &str,
    time: Option<f64>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let url = client.get_thumbnail_url(video_id, time);

    emit(&json!({ "videoId": video_id, "url": url }), format, |_| println!("{url}"))
}

/// Prepare playback for a video
pub async fn prepare(
    client: StreamingClient,
    video_id: &str,
    autoplay: bool,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let session = PlaybackSession::new(Arc::new(client), PlaybackOptions { autoplay });
    info!(session_id = %session.id(), video_id, "Preparing playback");

    let source = session.load(video_id).await?;

    emit(&source, format, |s| {
        println!("Source: {}", s.video_id);
        println!("  Title: {}", or_dash(s.metadata.title.as_deref()));
        println!("  Stream: {}", if s.is_playable() { s.stream_url.as_str() } else { "-" });
        println!("  Type: {}", s.mime_type);
        println!("  Autoplay: {}", s.autoplay);
        println!("  Playable: {}", s.is_playable());
    })
}
