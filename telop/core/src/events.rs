//! Feed Events
//!
//! The classified event stream handed from the feed connection to the
//! presentation director, together with the decoded payload types.
//!
//! # Design Philosophy
//!
//! The raw feed is a firehose of JSON frames with a numeric discriminant.
//! Classification happens once, at the connection edge; everything past
//! that point works with these typed events. Optional wire fields stay
//! `Option` all the way to the formatting layer, where absence renders as
//! the sentinel text, never as a failure.

// =============================================================================
// Event Stream
// =============================================================================

/// One classified event from the live feed.
#[derive(Clone, Debug, PartialEq)]
pub enum FeedEvent {
    /// The connection was (re-)established. Triggers the ready chime.
    Opened,
    /// A full earthquake information report (wire code 551). Queued and
    /// presented one at a time, in arrival order.
    Report(EarthquakeReport),
    /// An early warning (wire code 554). Presented immediately on its own
    /// region, bypassing the queue.
    Warning(EarlyWarning),
}

// =============================================================================
// Payloads
// =============================================================================

/// A full earthquake information report.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EarthquakeReport {
    /// Summary of the quake itself. Reports missing this (or its
    /// hypocenter) are abandoned at presentation time.
    pub quake: Option<QuakeSummary>,
    /// Per-station intensity readings, in arrival order. Empty when the
    /// wire frame carried none; the intensity phase is skipped then.
    pub points: Vec<StationReading>,
}

/// An early warning issued ahead of the full report.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EarlyWarning {
    /// Summary of the quake, when the warning carries one.
    pub quake: Option<QuakeSummary>,
    /// Names of the warned areas, in arrival order.
    pub areas: Vec<String>,
}

/// Hypocenter, magnitude and tsunami summary shared by both event kinds.
#[derive(Clone, Debug, PartialEq)]
pub struct QuakeSummary {
    /// Where the quake originated.
    pub hypocenter: Option<Hypocenter>,
    /// Reported magnitude. Rendered as `M{value:.1}`.
    pub magnitude: Option<f64>,
    /// Domestic tsunami expectation.
    pub tsunami: TsunamiFlag,
}

impl Default for QuakeSummary {
    fn default() -> Self {
        Self {
            hypocenter: None,
            magnitude: None,
            tsunami: TsunamiFlag::Unknown,
        }
    }
}

/// Reported origin point of a seismic event.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Hypocenter {
    /// Human-readable place name.
    pub name: Option<String>,
    /// Depth in kilometers. Zero is a valid value (very shallow).
    pub depth_km: Option<i64>,
}

/// One station's intensity reading.
#[derive(Clone, Debug, PartialEq)]
pub struct StationReading {
    /// Station code as received; resolved to a display name via the
    /// station directory, falling back to this raw code.
    pub station: String,
    /// Raw intensity scale code (10, 20, ... 70). Unrecognized codes map
    /// to the explicit unknown label instead of being dropped.
    pub scale: i64,
}

impl StationReading {
    /// Convenience constructor.
    #[must_use]
    pub fn new(station: impl Into<String>, scale: i64) -> Self {
        Self {
            station: station.into(),
            scale,
        }
    }
}

// =============================================================================
// Tsunami Flag
// =============================================================================

/// Domestic tsunami expectation, decoded from the wire `domesticTsunami`
/// string.
///
/// The canonical mapping: the literal `"None"` means no tsunami, a missing
/// field means the feed did not say, and every other value (Checking,
/// Watch, Warning, ...) is treated as a possible tsunami.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TsunamiFlag {
    /// The feed explicitly reported no tsunami.
    None,
    /// The feed reported some tsunami-related condition.
    Possible,
    /// The feed did not include the field.
    Unknown,
}

impl TsunamiFlag {
    /// Decode the wire value.
    #[must_use]
    pub fn from_wire(value: Option<&str>) -> Self {
        match value {
            Some("None") => TsunamiFlag::None,
            Some(_) => TsunamiFlag::Possible,
            None => TsunamiFlag::Unknown,
        }
    }

    /// Display label used on the details line.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            TsunamiFlag::None => "なし",
            TsunamiFlag::Possible => "有り",
            TsunamiFlag::Unknown => "不明",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn tsunami_none_literal_maps_to_none() {
        assert_eq!(TsunamiFlag::from_wire(Some("None")), TsunamiFlag::None);
        assert_eq!(TsunamiFlag::None.label(), "なし");
    }

    #[test]
    fn tsunami_other_values_map_to_possible() {
        for value in ["Checking", "NonEffective", "Watch", "Warning"] {
            assert_eq!(TsunamiFlag::from_wire(Some(value)), TsunamiFlag::Possible);
        }
        assert_eq!(TsunamiFlag::Possible.label(), "有り");
    }

    #[test]
    fn tsunami_missing_field_maps_to_unknown() {
        assert_eq!(TsunamiFlag::from_wire(None), TsunamiFlag::Unknown);
        assert_eq!(TsunamiFlag::Unknown.label(), "不明");
    }

    #[test]
    fn default_report_is_empty_and_unvalidated() {
        let report = EarthquakeReport::default();
        assert_eq!(report.quake, None);
        assert!(report.points.is_empty());
    }

    #[test]
    fn station_reading_constructor() {
        let reading = StationReading::new("A1", 50);
        assert_eq!(reading.station, "A1");
        assert_eq!(reading.scale, 50);
    }
}
