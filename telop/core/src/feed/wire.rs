//! Wire Decode
//!
//! Serde shapes for the inbound feed frames and the classification of
//! raw frame text into [`FeedEvent`]s. Classification happens once at
//! the connection edge: code 551 becomes an earthquake report, 554 an
//! early warning, everything else is ignored. Undecodable text is logged
//! and dropped without disturbing the stream.

use serde::Deserialize;
use tracing::{trace, warn};

use crate::events::{
    EarlyWarning, EarthquakeReport, FeedEvent, Hypocenter, QuakeSummary, StationReading,
    TsunamiFlag,
};

/// Wire code for a full earthquake information frame.
pub const CODE_EARTHQUAKE_INFO: i64 = 551;

/// Wire code for an early warning frame.
pub const CODE_EARLY_WARNING: i64 = 554;

#[derive(Debug, Deserialize)]
struct Frame {
    code: i64,
    earthquake: Option<WireEarthquake>,
    points: Option<Vec<WirePoint>>,
    areas: Option<Vec<WireArea>>,
}

#[derive(Debug, Deserialize)]
struct WireEarthquake {
    hypocenter: Option<WireHypocenter>,
    magnitude: Option<f64>,
    #[serde(rename = "domesticTsunami")]
    domestic_tsunami: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireHypocenter {
    name: Option<String>,
    depth: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct WirePoint {
    addr: Option<String>,
    scale: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct WireArea {
    name: Option<String>,
}

/// Classify one frame of feed text into a [`FeedEvent`].
///
/// Returns `None` for unknown codes and for text that does not decode;
/// both are logged, neither is an error.
#[must_use]
pub fn classify(text: &str) -> Option<FeedEvent> {
    let frame: Frame = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(err) => {
            warn!(error = %err, "Undecodable feed frame, dropping");
            return None;
        }
    };

    match frame.code {
        CODE_EARTHQUAKE_INFO => Some(FeedEvent::Report(EarthquakeReport {
            quake: frame.earthquake.map(decode_summary),
            points: frame
                .points
                .unwrap_or_default()
                .into_iter()
                .map(decode_point)
                .collect(),
        })),
        CODE_EARLY_WARNING => Some(FeedEvent::Warning(EarlyWarning {
            quake: frame.earthquake.map(decode_summary),
            areas: frame
                .areas
                .unwrap_or_default()
                .into_iter()
                .filter_map(|area| area.name)
                .collect(),
        })),
        other => {
            trace!(code = other, "Ignoring feed frame with unhandled code");
            None
        }
    }
}

fn decode_summary(wire: WireEarthquake) -> QuakeSummary {
    QuakeSummary {
        hypocenter: wire.hypocenter.map(|h| Hypocenter {
            name: h.name,
            depth_km: h.depth,
        }),
        magnitude: wire.magnitude,
        tsunami: TsunamiFlag::from_wire(wire.domestic_tsunami.as_deref()),
    }
}

fn decode_point(wire: WirePoint) -> StationReading {
    StationReading {
        station: wire.addr.unwrap_or_default(),
        // A missing scale still yields a reading; -1 maps to the unknown
        // label rather than dropping the station.
        scale: wire.scale.unwrap_or(-1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn classifies_earthquake_info_frame() {
        let text = r#"{
            "code": 551,
            "earthquake": {
                "hypocenter": {"name": "Tokyo Bay", "depth": 50},
                "magnitude": 5.3,
                "domesticTsunami": "None"
            },
            "points": [
                {"addr": "A1", "scale": 50},
                {"addr": "A2", "scale": 40}
            ]
        }"#;

        let Some(FeedEvent::Report(report)) = classify(text) else {
            panic!("expected a report");
        };
        let quake = report.quake.expect("quake summary");
        let hypocenter = quake.hypocenter.expect("hypocenter");
        assert_eq!(hypocenter.name.as_deref(), Some("Tokyo Bay"));
        assert_eq!(hypocenter.depth_km, Some(50));
        assert_eq!(quake.magnitude, Some(5.3));
        assert_eq!(quake.tsunami, TsunamiFlag::None);
        assert_eq!(
            report.points,
            vec![StationReading::new("A1", 50), StationReading::new("A2", 40)]
        );
    }

    #[test]
    fn classifies_early_warning_frame() {
        let text = r#"{
            "code": 554,
            "earthquake": {
                "hypocenter": {"name": "Sagami Bay", "depth": 20},
                "magnitude": 6.1
            },
            "areas": [{"name": "Kanagawa"}, {"name": "Shizuoka"}]
        }"#;

        let Some(FeedEvent::Warning(warning)) = classify(text) else {
            panic!("expected a warning");
        };
        assert_eq!(warning.areas, vec!["Kanagawa", "Shizuoka"]);
        let quake = warning.quake.expect("quake summary");
        // domesticTsunami absent on the wire decodes as Unknown.
        assert_eq!(quake.tsunami, TsunamiFlag::Unknown);
    }

    #[test]
    fn unknown_codes_are_ignored() {
        assert_eq!(classify(r#"{"code": 555}"#), None);
        assert_eq!(classify(r#"{"code": 552, "areas": []}"#), None);
    }

    #[test]
    fn undecodable_text_is_dropped_not_fatal() {
        assert_eq!(classify("not json"), None);
        assert_eq!(classify(r#"{"code": "oops"}"#), None);
        assert_eq!(classify(""), None);
    }

    #[test]
    fn missing_optional_fields_decode_to_defaults() {
        let Some(FeedEvent::Report(report)) = classify(r#"{"code": 551}"#) else {
            panic!("expected a report");
        };
        assert_eq!(report.quake, None);
        assert!(report.points.is_empty());
    }

    #[test]
    fn point_missing_scale_maps_to_unknown_reading() {
        let Some(FeedEvent::Report(report)) =
            classify(r#"{"code": 551, "points": [{"addr": "A1"}]}"#)
        else {
            panic!("expected a report");
        };
        assert_eq!(report.points, vec![StationReading::new("A1", -1)]);
    }
}
