//! Telop Kiosk
//!
//! Always-on earthquake alert display for one feed: connects to the
//! quake feed, lets the core director sequence the announcements, and
//! renders them on a console surface with optional sound.
//!
//! # Usage
//!
//! ```bash
//! # Defaults (config at ~/.config/telop/kiosk.toml if present)
//! telop-kiosk
//!
//! # Explicit config and station directory
//! telop-kiosk --config kiosk.toml --stations stations.json
//!
//! # With verbose logging
//! RUST_LOG=debug telop-kiosk
//! ```
//!
//! # Environment Variables
//!
//! - `TELOP_CONFIG`: Config file path
//! - `TELOP_FEED_URL`: Feed WebSocket URL
//! - `TELOP_STATIONS`: Station directory source (file path or http(s) URL)
//! - `TELOP_WIDTH_BUDGET`: Line width budget in character cells
//! - `RUST_LOG`: Log level (trace, debug, info, warn, error)
//!
//! # Signals
//!
//! - SIGTERM/SIGINT: shut down. The process also ends on its own when
//!   the feed exhausts its reconnect budget and the queue drains.

mod audio;
mod console;

use std::path::PathBuf;

use clap::Parser;
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use telop_core::{
    config::{default_config_path, load_config_from_path, KioskConfig},
    Director, DirectorConfig, FeedConnection, StationDirectory, SurfaceCommand,
};

use audio::AudioPlayer;
use console::ConsoleSurface;

/// Earthquake alert telop kiosk
#[derive(Debug, Parser)]
#[command(name = "telop-kiosk", version, about)]
struct Cli {
    /// Path to the TOML config file (default: ~/.config/telop/kiosk.toml)
    #[arg(long, env = "TELOP_CONFIG")]
    config: Option<PathBuf>,

    /// Feed WebSocket URL
    #[arg(long)]
    feed_url: Option<String>,

    /// Station directory source: a local JSON file or an http(s) URL
    #[arg(long)]
    stations: Option<String>,

    /// Line width budget for the intensity listing, in character cells
    #[arg(long)]
    width_budget: Option<usize>,

    /// Disable audio playback
    #[arg(long)]
    no_audio: bool,
}

impl Cli {
    /// CLI overrides are applied last, on top of file and environment.
    fn apply(&self, config: &mut KioskConfig) {
        if let Some(ref url) = self.feed_url {
            config.feed_url = url.clone();
        }
        if let Some(ref stations) = self.stations {
            config.stations_source = Some(stations.clone());
        }
        if let Some(budget) = self.width_budget {
            config.width_budget = budget;
        }
        if self.no_audio {
            config.audio.enabled = false;
        }
    }
}

/// Load the station directory, continuing with an empty one on failure:
/// a missing name table degrades names, never alerting.
async fn load_stations(source: Option<&str>) -> StationDirectory {
    let Some(source) = source else {
        info!("No station directory configured; station codes shown raw");
        return StationDirectory::empty();
    };
    let result = if source.starts_with("http://") || source.starts_with("https://") {
        StationDirectory::fetch(source).await
    } else {
        StationDirectory::load(source)
    };
    match result {
        Ok(directory) => {
            info!(source, stations = directory.len(), "Loaded station directory");
            directory
        }
        Err(err) => {
            warn!(source, error = %err, "Failed to load station directory; continuing without names");
            StationDirectory::empty()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("telop_kiosk=info".parse()?)
                .add_directive("telop_core=info".parse()?),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.clone().or_else(default_config_path);
    let mut config = load_config_from_path(config_path)?;
    cli.apply(&mut config);

    info!(feed_url = %config.feed_url, width_budget = config.width_budget, "Starting telop kiosk");

    let stations = load_stations(config.stations_source.as_deref()).await;
    let player = AudioPlayer::new(&config.audio);

    let (cmd_tx, mut cmd_rx) = mpsc::channel::<SurfaceCommand>(256);
    let (event_tx, event_rx) = mpsc::channel(64);

    // The surface is a pure executor of the director's command stream.
    let surface_handle = tokio::spawn(async move {
        let mut console = ConsoleSurface::new();
        while let Some(command) = cmd_rx.recv().await {
            if let SurfaceCommand::PlaySound { sound } = command {
                player.play(sound);
            } else {
                console.apply(&command);
            }
        }
    });

    let director = Director::new(
        DirectorConfig {
            timings: config.timings,
            width_budget: config.width_budget,
        },
        stations,
        cmd_tx,
    );
    let mut director_handle = tokio::spawn(director.run(event_rx));

    let feed = FeedConnection::new(config.feed_url.clone(), config.reconnect);
    let feed_handle = tokio::spawn(feed.run(event_tx));

    let terminate = async {
        #[cfg(unix)]
        {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                }
                Err(err) => {
                    warn!(error = %err, "Failed to install SIGTERM handler");
                    std::future::pending::<()>().await;
                }
            }
        }
        #[cfg(not(unix))]
        std::future::pending::<()>().await;
    };

    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
        () = terminate => {
            info!("Received SIGTERM, shutting down");
        }
        // When the feed gives up its channel closes and the director
        // drains the queue, then finishes on its own.
        result = &mut director_handle => {
            if let Err(err) = result {
                error!(error = %err, "Director task failed");
            }
            match feed_handle.await {
                Ok(Err(err)) => error!(error = %err, "Feed terminated"),
                Ok(Ok(())) => info!("Feed stopped"),
                Err(err) => error!(error = %err, "Feed task failed"),
            }
        }
    }

    drop(surface_handle);
    info!("Telop kiosk stopped");
    Ok(())
}
