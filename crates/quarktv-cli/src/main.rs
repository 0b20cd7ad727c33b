//! QuarkTV CLI - Bunny Stream inspection tool
//!
//! Features:
//! - Video metadata, play data, heatmap and statistics lookup
//! - HLS stream URL resolution
//! - Signed thumbnail URL generation
//! - Playback preparation as a player would do it

use clap::{Args, Parser, Subcommand};
use quarktv_core::{ClientConfig, StreamingClient};
use tracing_subscriber::EnvFilter;
use url::Url;

mod commands;
mod output;

use output::OutputFormat;

/// QuarkTV CLI - Bunny Stream toolkit
#[derive(Parser)]
#[command(name = "quarktv-cli")]
#[command(version)]
#[command(about = "Inspect Bunny Stream videos and generate signed CDN URLs", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    #[command(flatten)]
    provider: ProviderArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Provider credentials, from flags or the environment
#[derive(Args)]
struct ProviderArgs {
    /// Library API key
    #[arg(long, env = "BUNNY_STREAM_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Video library ID
    #[arg(long, env = "BUNNY_STREAM_LIBRARY_ID")]
    library_id: String,

    /// API origin
    #[arg(long, env = "BUNNY_STREAM_BASE_URL")]
    base_url: Option<Url>,

    /// CDN hostname for signed URLs
    #[arg(long, env = "BUNNY_STREAM_CDN_HOSTNAME")]
    cdn_hostname: Option<String>,

    /// Token authentication key (defaults to the API key)
    #[arg(long, env = "BUNNY_STREAM_TOKEN_AUTH_KEY", hide_env_values = true)]
    token_auth_key: Option<String>,
}

impl ProviderArgs {
    fn into_config(self) -> ClientConfig {
        let mut config = ClientConfig::new(self.api_key, self.library_id);
        if let Some(base_url) = self.base_url {
            config = config.with_base_url(base_url.as_str().trim_end_matches('/'));
        }
        if let Some(cdn_hostname) = self.cdn_hostname {
            config = config.with_cdn_hostname(cdn_hostname);
        }
        if let Some(token_auth_key) = self.token_auth_key {
            config = config.with_token_auth_key(token_auth_key);
        }
        config
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show video metadata
    Video {
        /// Video GUID
        video_id: String,
    },

    /// Show play data
    Play {
        /// Video GUID
        video_id: String,
    },

    /// Print the HLS playlist URL
    Stream {
        /// Video GUID
        video_id: String,
    },

    /// Show the viewer heatmap
    Heatmap {
        /// Video GUID
        video_id: String,
    },

    /// Show view statistics
    Stats {
        /// Video GUID
        video_id: String,
    },

    /// Print a signed thumbnail URL
    Thumbnail {
        /// Video GUID
        video_id: String,

        /// Time offset in seconds
        #[arg(short, long)]
        time: Option<f64>,
    },

    /// Resolve metadata and stream URL the way the player does at mount
    Prepare {
        /// Video GUID
        video_id: String,

        /// Mark the source for autoplay
        #[arg(long)]
        autoplay: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let client = StreamingClient::new(cli.provider.into_config());
    let format = cli.format;

    match cli.command {
        Commands::Video { video_id } => commands::video(&client, &video_id, format).await?,
        Commands::Play { video_id } => commands::play(&client, &video_id, format).await?,
        Commands::Stream { video_id } => commands::stream(&client, &video_id, format).await?,
        Commands::Heatmap { video_id } => commands::heatmap(&client, &video_id).await?,
        Commands::Stats { video_id } => commands::stats(&client, &video_id).await?,
        Commands::Thumbnail { video_id, time } => {
            commands::thumbnail(&client, &video_id, time, format)?
        }
        Commands::Prepare { video_id, autoplay } => {
            commands::prepare(client, &video_id, autoplay, format).await?
        }
    }

    Ok(())
}
