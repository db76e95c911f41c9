//! Console Surface
//!
//! The in-repo reference renderer: applies [`SurfaceCommand`]s to a
//! small per-region state table and prints visible regions as framed
//! text panels on stdout. It contains no timing or sequencing logic of
//! its own; the director decides everything.

use std::collections::HashMap;

use tracing::debug;

use telop_core::{Region, SurfaceCommand};

/// Per-region display state reduced from the command stream.
#[derive(Clone, Debug, Default)]
struct RegionState {
    visible: bool,
    text: String,
}

/// Renders surface commands as framed panels on stdout.
#[derive(Debug, Default)]
pub struct ConsoleSurface {
    regions: HashMap<Region, RegionState>,
}

impl ConsoleSurface {
    /// Create a surface with every region hidden and empty.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one command, printing on show and hide.
    pub fn apply(&mut self, command: &SurfaceCommand) {
        match command {
            SurfaceCommand::Show { region } => {
                let state = self.regions.entry(*region).or_default();
                state.visible = true;
                let text = state.text.clone();
                self.print_panel(*region, &text);
            }
            SurfaceCommand::Hide { region } => {
                let state = self.regions.entry(*region).or_default();
                state.visible = false;
                println!("[{region}] ---");
            }
            SurfaceCommand::SetText { region, text } => {
                let state = self.regions.entry(*region).or_default();
                state.text = text.clone();
                // Visible regions repaint immediately (early warnings
                // replace their text mid-display).
                if state.visible {
                    let text = state.text.clone();
                    self.print_panel(*region, &text);
                }
            }
            SurfaceCommand::PlaySound { sound } => {
                debug!(sound = %sound, "Sound command reached the console surface");
            }
        }
    }

    /// Whether a region is currently visible.
    #[must_use]
    pub fn is_visible(&self, region: Region) -> bool {
        self.regions.get(&region).is_some_and(|s| s.visible)
    }

    /// Current text of a region.
    #[must_use]
    pub fn text(&self, region: Region) -> &str {
        self.regions.get(&region).map_or("", |s| s.text.as_str())
    }

    fn print_panel(&self, region: Region, text: &str) {
        let width = text
            .lines()
            .map(str::len)
            .max()
            .unwrap_or(0)
            .max(region.name().len());
        println!("+{}+", "-".repeat(width + 2));
        println!("| {:<width$} |", region.name());
        for line in text.lines() {
            println!("| {line:<width$} |");
        }
        println!("+{}+", "-".repeat(width + 2));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use telop_core::SoundId;

    #[test]
    fn show_and_hide_track_visibility() {
        let mut surface = ConsoleSurface::new();
        assert!(!surface.is_visible(Region::MainAlert));

        surface.apply(&SurfaceCommand::Show {
            region: Region::MainAlert,
        });
        assert!(surface.is_visible(Region::MainAlert));
        assert!(!surface.is_visible(Region::EndAlert));

        surface.apply(&SurfaceCommand::Hide {
            region: Region::MainAlert,
        });
        assert!(!surface.is_visible(Region::MainAlert));
    }

    #[test]
    fn set_text_replaces_content() {
        let mut surface = ConsoleSurface::new();
        surface.apply(&SurfaceCommand::SetText {
            region: Region::EventDetails,
            text: "first".to_string(),
        });
        assert_eq!(surface.text(Region::EventDetails), "first");

        surface.apply(&SurfaceCommand::SetText {
            region: Region::EventDetails,
            text: "second".to_string(),
        });
        assert_eq!(surface.text(Region::EventDetails), "second");
    }

    #[test]
    fn regions_are_independent() {
        let mut surface = ConsoleSurface::new();
        surface.apply(&SurfaceCommand::Show {
            region: Region::EarlyWarning,
        });
        surface.apply(&SurfaceCommand::Show {
            region: Region::MainAlert,
        });
        surface.apply(&SurfaceCommand::Hide {
            region: Region::MainAlert,
        });
        assert!(surface.is_visible(Region::EarlyWarning));
        assert!(!surface.is_visible(Region::MainAlert));
    }

    #[test]
    fn sound_commands_do_not_touch_display_state() {
        let mut surface = ConsoleSurface::new();
        surface.apply(&SurfaceCommand::PlaySound {
            sound: SoundId::Alarm,
        });
        for region in Region::all() {
            assert!(!surface.is_visible(region));
        }
    }
}
