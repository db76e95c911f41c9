//! Intensity Formatter
//!
//! Turns a report's per-station intensity readings into the ordered,
//! wrapped display lines shown on the intensity region.
//!
//! The output is what the presentation director paginates: each element is
//! one rendered line, groups are separated by a single blank line, and no
//! line exceeds the configured width budget (names that individually
//! exceed the per-line capacity are emitted intact on an over-wide line
//! rather than split).
//!
//! Everything here is pure: same readings, same directory, same budget,
//! same lines.

use unicode_width::UnicodeWidthStr;

use crate::events::StationReading;
use crate::stations::StationDirectory;

/// Canonical severity labels, strongest first. Groups are emitted in this
/// order; the unknown label sorts after everything else.
pub const SEVERITY_ORDER: [&str; 9] = ["7", "6強", "6弱", "5強", "5弱", "4", "3", "2", "1"];

/// Label for intensity codes outside the closed scale mapping.
pub const UNKNOWN_LABEL: &str = "不明";

/// Default line width budget in character cells (wide characters count
/// double), equal to 32 full-width characters.
pub const DEFAULT_WIDTH_BUDGET: usize = 64;

/// Ideographic space used as the name separator and for indentation.
const WIDE_SPACE: &str = "　";

/// Continuation-line indent: four full-width spaces.
const CONTINUATION_INDENT: &str = "　　　　";

/// Map a raw wire scale code to its canonical display label.
///
/// The scale is a closed enumeration; anything outside it maps to
/// [`UNKNOWN_LABEL`] instead of being dropped.
#[must_use]
pub const fn scale_label(scale: i64) -> &'static str {
    match scale {
        10 => "1",
        20 => "2",
        30 => "3",
        40 => "4",
        45 => "5弱",
        50 => "5強",
        55 => "6弱",
        60 => "6強",
        70 => "7",
        _ => UNKNOWN_LABEL,
    }
}

/// Format station readings into display lines.
///
/// Stations are resolved through `stations` (raw code fallback), grouped
/// by severity label preserving arrival order within each group, and the
/// groups are emitted strongest first with one blank separator line
/// between them. Within a group, names are greedily packed into lines
/// joined by an ideographic space; the first line carries the
/// `　　震度{label}　` prefix and continuation lines are indented to
/// align under it.
///
/// Empty input yields empty output; the caller skips the intensity phase
/// entirely in that case.
#[must_use]
pub fn format_intensity_lines(
    points: &[StationReading],
    stations: &StationDirectory,
    width_budget: usize,
) -> Vec<String> {
    let mut groups: Vec<(&'static str, Vec<&str>)> = Vec::new();
    for point in points {
        let label = scale_label(point.scale);
        let name = stations.display_name(&point.station);
        match groups.iter_mut().find(|(l, _)| *l == label) {
            Some((_, names)) => names.push(name),
            None => groups.push((label, vec![name])),
        }
    }

    let mut lines = Vec::new();
    for label in SEVERITY_ORDER.iter().chain(std::iter::once(&UNKNOWN_LABEL)) {
        let Some((_, names)) = groups.iter().find(|(l, _)| l == label) else {
            continue;
        };
        if !lines.is_empty() {
            lines.push(String::new());
        }
        let header = format!("{WIDE_SPACE}{WIDE_SPACE}震度{label}{WIDE_SPACE}");
        append_group_lines(&mut lines, &header, names, width_budget);
    }
    lines
}

/// Greedily pack one group's names into lines under the width budget.
fn append_group_lines(lines: &mut Vec<String>, header: &str, names: &[&str], width_budget: usize) {
    let mut first = true;
    let mut packed: Vec<&str> = Vec::new();
    let mut packed_cells = 0usize;

    let capacity = |first: bool| {
        let prefix = if first { header } else { CONTINUATION_INDENT };
        width_budget.saturating_sub(prefix.width())
    };
    let flush = |lines: &mut Vec<String>, packed: &[&str], first: bool| {
        let prefix = if first { header } else { CONTINUATION_INDENT };
        lines.push(format!("{prefix}{}", packed.join(WIDE_SPACE)));
    };

    for name in names {
        let name_cells = name.width();
        let joined = if packed.is_empty() {
            name_cells
        } else {
            packed_cells + WIDE_SPACE.width() + name_cells
        };
        if !packed.is_empty() && joined > capacity(first) {
            flush(lines, &packed, first);
            first = false;
            packed.clear();
            packed.push(name);
            packed_cells = name_cells;
        } else {
            packed.push(name);
            packed_cells = joined;
        }
    }
    if !packed.is_empty() {
        flush(lines, &packed, first);
    }
}
