//! Telop Core - Earthquake Alert Presentation Engine
//!
//! This crate contains everything needed to turn a live quake feed into
//! a timed on-screen announcement sequence, completely independent of
//! any rendering technology. A renderer (console, TUI, browser overlay)
//! only has to execute [`SurfaceCommand`]s.
//!
//! # Architecture
//!
//! ```text
//!   quake feed (WebSocket)
//!         │
//!   ┌─────▼──────────┐   FeedEvent    ┌─────────────────────────────┐
//!   │ FeedConnection │ ─────────────▶ │     Director (one task)     │
//!   │  reconnect +   │    (mpsc)      │  queue → phase state machine│
//!   │  classification│                │  + early-warning interrupt  │
//!   └────────────────┘                └──────────────┬──────────────┘
//!                                                    │ SurfaceCommand
//!                                                    │    (mpsc)
//!                                     ┌──────────────▼──────────────┐
//!                                     │   rendering surface + audio │
//!                                     └─────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`Director`]: the presentation sequencer; owns the report queue and
//!   all phase timing
//! - [`FeedConnection`]: the live feed driver with bounded reconnection
//! - [`FeedEvent`]: classified inbound events (report / warning / opened)
//! - [`SurfaceCommand`]: show/hide/set-text/play-sound instructions to
//!   the renderer
//! - [`StationDirectory`]: station code → display name lookup
//! - [`KioskConfig`]: TOML + environment configuration

pub mod config;
pub mod director;
pub mod events;
pub mod feed;
pub mod intensity;
pub mod messages;
pub mod queue;
pub mod stations;

pub use config::{default_config_path, load_config, load_config_from_path, ConfigError, KioskConfig};
pub use director::{Director, DirectorConfig, PresentationTimings};
pub use events::{
    EarlyWarning, EarthquakeReport, FeedEvent, Hypocenter, QuakeSummary, StationReading,
    TsunamiFlag,
};
pub use feed::{FeedConnection, FeedError, ReconnectPolicy};
pub use intensity::{format_intensity_lines, scale_label, DEFAULT_WIDTH_BUDGET};
pub use messages::{Region, SoundId, SurfaceCommand};
pub use queue::PresentationQueue;
pub use stations::{StationDirectory, StationsError};
