/// Cadence - terminal music player
use cadence_catalog::{CatalogClient, DEFAULT_PLAYLIST_LIMIT, DEFAULT_SEARCH_LIMIT};
use cadence_cli::commands::{self, SearchKind};
use cadence_cli::CliConfig;
use cadence_core::RepeatMode;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cadence")]
#[command(about = "Search, download and play music from the catalog", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./cadence.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog
    Search {
        /// What to search for
        #[arg(value_enum)]
        kind: SearchKind,
        /// Search terms
        query: String,
        /// Result page, starting at 0
        #[arg(long, default_value_t = 0)]
        page: u32,
        /// Results per page
        #[arg(long, default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: u32,
    },
    /// Show an artist's songs and albums
    Artist {
        /// Artist id
        id: String,
    },
    /// List the songs of a playlist
    Playlist {
        /// Playlist id
        id: String,
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long, default_value_t = DEFAULT_PLAYLIST_LIMIT)]
        limit: u32,
    },
    /// Download a track for offline playback
    Download {
        /// Track id
        track_id: String,
        /// Bitrate variant, e.g. 320kbps
        #[arg(short, long)]
        quality: Option<String>,
    },
    /// List downloaded tracks
    Downloads,
    /// Delete a downloaded track
    RemoveDownload {
        /// Track id
        track_id: String,
    },
    /// Show the saved queue and player settings
    Queue,
    /// Search for songs and play every result
    Play {
        /// Search terms
        query: String,
        /// Shuffle the results
        #[arg(long)]
        shuffle: bool,
        /// Repeat mode: off, all, one
        #[arg(long)]
        repeat: Option<RepeatMode>,
        /// Number of songs to queue
        #[arg(long, default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "cadence_cli=info,cadence_playback=info,cadence_storage=info,cadence_catalog=warn"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = CliConfig::load_from(cli.config.as_deref())?;
    let catalog = CatalogClient::new(config.catalog_config())?;

    match cli.command {
        Commands::Search {
            kind,
            query,
            page,
            limit,
        } => {
            commands::search(&catalog, kind, &query, page, limit).await?;
        }
        Commands::Artist { id } => {
            commands::artist(&catalog, &id).await?;
        }
        Commands::Playlist { id, page, limit } => {
            commands::playlist(&catalog, &id, page, limit).await?;
        }
        Commands::Download { track_id, quality } => {
            commands::download(&config, &catalog, &track_id, quality.as_deref()).await?;
        }
        Commands::Downloads => {
            commands::list_downloads(&config).await?;
        }
        Commands::RemoveDownload { track_id } => {
            commands::remove_download(&config, &track_id).await?;
        }
        Commands::Queue => {
            commands::show_queue(&config).await?;
        }
        Commands::Play {
            query,
            shuffle,
            repeat,
            limit,
        } => {
            commands::play(&config, &catalog, &query, shuffle, repeat, limit).await?;
        }
    }

    Ok(())
}
