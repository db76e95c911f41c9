//! Surface Commands
//!
//! Commands sent from the presentation director to whatever renders the
//! kiosk: show or hide one of the fixed display regions, replace a
//! region's text, or play a named sound.
//!
//! # Design Philosophy
//!
//! The director is the only component that decides what appears on screen
//! and when. Renderers are pure executors: they receive [`SurfaceCommand`]s
//! over a channel and apply them without any timing or sequencing logic of
//! their own. This keeps every timed behavior in one place and lets tests
//! assert on the exact command stream instead of scraping rendered output.

use std::fmt;

// =============================================================================
// Display Regions
// =============================================================================

/// The fixed set of display regions on the kiosk screen.
///
/// Regions are independent: showing or hiding one never affects the others.
/// The early-warning region sits above everything else and is driven outside
/// the ordinary presentation sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Region {
    /// Opening banner flashed when an earthquake report begins.
    MainAlert,
    /// Hypocenter, depth, magnitude and tsunami summary.
    EventDetails,
    /// Paginated per-station intensity listing.
    IntensityInfo,
    /// Closing banner shown after the intensity pages.
    EndAlert,
    /// Dedicated always-on-top area for early warnings.
    EarlyWarning,
}

impl Region {
    /// All regions, in ordinary presentation order.
    #[must_use]
    pub const fn all() -> [Region; 5] {
        [
            Region::MainAlert,
            Region::EventDetails,
            Region::IntensityInfo,
            Region::EndAlert,
            Region::EarlyWarning,
        ]
    }

    /// Stable lowercase name used in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Region::MainAlert => "main-alert",
            Region::EventDetails => "event-details",
            Region::IntensityInfo => "intensity-info",
            Region::EndAlert => "end-alert",
            Region::EarlyWarning => "early-warning",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Sounds
// =============================================================================

/// Named sounds the kiosk can play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundId {
    /// Short chime: played on connect and at the start of each report.
    Chime,
    /// Urgent alarm reserved for early warnings.
    Alarm,
}

impl SoundId {
    /// Stable lowercase name used in logs and configuration.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            SoundId::Chime => "chime",
            SoundId::Alarm => "alarm",
        }
    }
}

impl fmt::Display for SoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Commands
// =============================================================================

/// One instruction from the director to the rendering surface.
///
/// The director guarantees that every `Show` it emits is eventually
/// followed by a matching `Hide` for the same region, on every path
/// including abandoned presentations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SurfaceCommand {
    /// Make a region visible with its current text.
    Show {
        /// Target region.
        region: Region,
    },

    /// Remove a region from the screen.
    Hide {
        /// Target region.
        region: Region,
    },

    /// Replace a region's text content.
    SetText {
        /// Target region.
        region: Region,
        /// Full replacement text; may contain newlines.
        text: String,
    },

    /// Play a named sound. Fire and forget: the surface logs playback
    /// failures and never reports them back.
    PlaySound {
        /// Which sound to play.
        sound: SoundId,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn region_names_are_distinct() {
        let names: Vec<&str> = Region::all().iter().map(|r| r.name()).collect();
        let mut deduped = names.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(deduped.len(), names.len());
    }

    #[test]
    fn region_display_matches_name() {
        for region in Region::all() {
            assert_eq!(region.to_string(), region.name());
        }
    }

    #[test]
    fn five_regions_in_presentation_order() {
        assert_eq!(
            Region::all(),
            [
                Region::MainAlert,
                Region::EventDetails,
                Region::IntensityInfo,
                Region::EndAlert,
                Region::EarlyWarning,
            ]
        );
    }

    #[test]
    fn sound_names() {
        assert_eq!(SoundId::Chime.to_string(), "chime");
        assert_eq!(SoundId::Alarm.to_string(), "alarm");
    }

    #[test]
    fn commands_compare_by_content() {
        assert_eq!(
            SurfaceCommand::SetText {
                region: Region::EventDetails,
                text: "a".to_string(),
            },
            SurfaceCommand::SetText {
                region: Region::EventDetails,
                text: "a".to_string(),
            }
        );
        assert_ne!(
            SurfaceCommand::Show {
                region: Region::MainAlert
            },
            SurfaceCommand::Hide {
                region: Region::MainAlert
            }
        );
    }
}
