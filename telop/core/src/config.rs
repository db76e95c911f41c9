//! TOML Configuration File Support
//!
//! Centralized configuration loading for the kiosk, supporting a TOML
//! file at `~/.config/telop/kiosk.toml`.
//!
//! # Configuration Priority
//!
//! Configuration values are loaded with the following priority (highest
//! first):
//! 1. CLI arguments (applied by the binary after loading)
//! 2. Environment variables (`TELOP_*`)
//! 3. TOML configuration file
//! 4. Default values
//!
//! A missing config file is not an error; an unparsable one is.
//!
//! # Example Configuration
//!
//! ```toml
//! [feed]
//! url = "wss://api-realtime-sandbox.p2pquake.net/v2/ws"
//! max_reconnect_attempts = 5
//! reconnect_delay_secs = 5
//!
//! [presentation]
//! width_budget = 64
//! main_alert_secs = 3
//! details_secs = 5
//! intensity_page_secs = 5
//! end_alert_secs = 3
//! cooldown_secs = 2
//! early_warning_secs = 10
//!
//! [stations]
//! source = "stations.json"
//!
//! [audio]
//! enabled = true
//! chime = "sounds/chime.wav"
//! alarm = "sounds/eew_alert.wav"
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::director::PresentationTimings;
use crate::feed::ReconnectPolicy;
use crate::intensity::DEFAULT_WIDTH_BUDGET;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {}: {source}", path.display())]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// Feed section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedToml {
    /// WebSocket endpoint of the quake feed
    pub url: Option<String>,

    /// Maximum consecutive reconnect attempts before giving up
    pub max_reconnect_attempts: Option<u32>,

    /// Fixed delay between reconnect attempts in seconds
    pub reconnect_delay_secs: Option<u64>,
}

/// Presentation section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationToml {
    /// Line width budget in character cells (wide characters count double)
    pub width_budget: Option<usize>,

    /// Main alert banner duration in seconds
    pub main_alert_secs: Option<u64>,

    /// Event details duration in seconds
    pub details_secs: Option<u64>,

    /// Per intensity page duration in seconds
    pub intensity_page_secs: Option<u64>,

    /// Closing banner duration in seconds
    pub end_alert_secs: Option<u64>,

    /// Pause after a presentation before the next queued report (0 allowed)
    pub cooldown_secs: Option<u64>,

    /// Early warning display duration in seconds
    pub early_warning_secs: Option<u64>,
}

/// Stations section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StationsToml {
    /// Where to load the station directory from: a local JSON file path
    /// or an http(s) URL fetched once at startup
    pub source: Option<String>,
}

/// Audio section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioToml {
    /// Whether to play sounds at all
    pub enabled: Option<bool>,

    /// Path to the chime played on connect and report start
    pub chime: Option<String>,

    /// Path to the early warning alarm
    pub alarm: Option<String>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KioskToml {
    /// Feed configuration section
    pub feed: FeedToml,

    /// Presentation configuration section
    pub presentation: PresentationToml,

    /// Stations configuration section
    pub stations: StationsToml,

    /// Audio configuration section
    pub audio: AudioToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Resolved audio settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AudioConfig {
    /// Whether to play sounds at all.
    pub enabled: bool,
    /// Chime sound file, if configured.
    pub chime_path: Option<PathBuf>,
    /// Alarm sound file, if configured.
    pub alarm_path: Option<PathBuf>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            chime_path: None,
            alarm_path: None,
        }
    }
}

/// Fully resolved kiosk configuration.
#[derive(Clone, Debug)]
pub struct KioskConfig {
    /// Feed endpoint.
    pub feed_url: String,

    /// Reconnect policy for the feed connection.
    pub reconnect: ReconnectPolicy,

    /// Phase durations for the presentation director.
    pub timings: PresentationTimings,

    /// Line width budget in character cells.
    pub width_budget: usize,

    /// Station directory source (file path or http(s) URL), if any.
    pub stations_source: Option<String>,

    /// Audio settings.
    pub audio: AudioConfig,

    /// Path to the config file that was loaded (if any).
    pub config_file_path: Option<PathBuf>,
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            feed_url: crate::feed::DEFAULT_FEED_URL.to_string(),
            reconnect: ReconnectPolicy::default(),
            timings: PresentationTimings::default(),
            width_budget: DEFAULT_WIDTH_BUDGET,
            stations_source: None,
            audio: AudioConfig::default(),
            config_file_path: None,
        }
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/telop/kiosk.toml` or
/// `~/.config/telop/kiosk.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("telop").join("kiosk.toml"))
}

/// Load configuration from all sources with proper priority
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed.
/// A missing config file is not an error (defaults are used).
pub fn load_config() -> Result<KioskConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or
/// parsed.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<KioskConfig, ConfigError> {
    let mut config = KioskConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: KioskToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.clone());

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config);

    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut KioskConfig, toml: &KioskToml) {
    // Feed settings
    if let Some(ref url) = toml.feed.url {
        config.feed_url = url.clone();
    }
    if let Some(attempts) = toml.feed.max_reconnect_attempts {
        config.reconnect.max_attempts = attempts;
    }
    if let Some(delay) = toml.feed.reconnect_delay_secs {
        config.reconnect.delay = Duration::from_secs(delay);
    }

    // Presentation settings
    if let Some(budget) = toml.presentation.width_budget {
        config.width_budget = budget;
    }
    if let Some(secs) = toml.presentation.main_alert_secs {
        config.timings.main_alert = Duration::from_secs(secs);
    }
    if let Some(secs) = toml.presentation.details_secs {
        config.timings.details = Duration::from_secs(secs);
    }
    if let Some(secs) = toml.presentation.intensity_page_secs {
        config.timings.intensity_page = Duration::from_secs(secs);
    }
    if let Some(secs) = toml.presentation.end_alert_secs {
        config.timings.end_alert = Duration::from_secs(secs);
    }
    if let Some(secs) = toml.presentation.cooldown_secs {
        config.timings.cooldown = Duration::from_secs(secs);
    }
    if let Some(secs) = toml.presentation.early_warning_secs {
        config.timings.early_warning = Duration::from_secs(secs);
    }

    // Stations settings
    if toml.stations.source.is_some() {
        config.stations_source = toml.stations.source.clone();
    }

    // Audio settings
    if let Some(enabled) = toml.audio.enabled {
        config.audio.enabled = enabled;
    }
    if let Some(ref chime) = toml.audio.chime {
        config.audio.chime_path = Some(PathBuf::from(chime));
    }
    if let Some(ref alarm) = toml.audio.alarm {
        config.audio.alarm_path = Some(PathBuf::from(alarm));
    }
}

/// Apply environment variable overrides to the config
fn apply_env_config(config: &mut KioskConfig) {
    if let Ok(url) = std::env::var("TELOP_FEED_URL") {
        config.feed_url = url;
    }
    if let Ok(source) = std::env::var("TELOP_STATIONS") {
        config.stations_source = Some(source);
    }
    if let Ok(budget) = std::env::var("TELOP_WIDTH_BUDGET") {
        if let Ok(cells) = budget.parse::<usize>() {
            config.width_budget = cells;
        }
    }
    if let Ok(attempts) = std::env::var("TELOP_RECONNECT_ATTEMPTS") {
        if let Ok(n) = attempts.parse::<u32>() {
            config.reconnect.max_attempts = n;
        }
    }
    if let Ok(delay) = std::env::var("TELOP_RECONNECT_DELAY_SECS") {
        if let Ok(secs) = delay.parse::<u64>() {
            config.reconnect.delay = Duration::from_secs(secs);
        }
    }
    if let Ok(enabled) = std::env::var("TELOP_AUDIO") {
        config.audio.enabled = enabled != "0" && enabled.to_lowercase() != "false";
    }
}

// =============================================================================
// Tests
// =============================================================================
