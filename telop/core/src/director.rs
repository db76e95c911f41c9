//! Presentation Director
//!
//! The sequencing core of the kiosk. One task owns a director; it
//! receives classified [`FeedEvent`]s and drives the timed presentation
//! sequence for earthquake reports, emitting [`SurfaceCommand`]s to
//! whatever renders.
//!
//! # Phase Machine
//!
//! ```text
//! Idle → MainAlert(3s) → Details(5s) → IntensityPage(i)(5s each)
//!      → EndAlert(3s) → Cooldown(2s) → Idle
//! ```
//!
//! Phases advance on absolute deadlines fixed at phase entry: once a
//! timed wait begins it completes exactly once, regardless of inbound
//! traffic. The select loop keeps receiving events during waits, so
//! ingestion is never blocked by display timing, while reports are
//! presented strictly one at a time in arrival order.
//!
//! Early warnings bypass the queue entirely: they play the alarm and
//! hold their own always-on-top region for a fixed window, tracked on a
//! deadline separate from the phase deadline. A newer warning replaces
//! the text and extends the window instead of stacking.
//!
//! Malformed reports (no quake summary or no hypocenter) are abandoned
//! with a log line before anything is shown, so a single bad report can
//! never stall the queue or leave a region visible.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

use crate::events::{EarlyWarning, FeedEvent, QuakeSummary};
use crate::intensity::format_intensity_lines;
use crate::messages::{Region, SoundId, SurfaceCommand};
use crate::queue::PresentationQueue;
use crate::stations::StationDirectory;

/// Sentinel text for absent optional fields.
const UNKNOWN: &str = "不明";

/// Static banner text on the main alert region.
pub const MAIN_ALERT_TEXT: &str = "地震情報";

/// Static banner text on the closing region.
pub const END_ALERT_TEXT: &str = "地震情報をお伝えしました";

/// Lines per intensity page.
const LINES_PER_PAGE: usize = 2;

// =============================================================================
// Configuration
// =============================================================================

/// Phase durations for the presentation sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PresentationTimings {
    /// Main alert banner duration.
    pub main_alert: Duration,
    /// Event details duration.
    pub details: Duration,
    /// Duration of each intensity page.
    pub intensity_page: Duration,
    /// Closing banner duration.
    pub end_alert: Duration,
    /// Pause after the closing banner before the next queued report.
    /// May be zero.
    pub cooldown: Duration,
    /// Early warning display window.
    pub early_warning: Duration,
}

impl Default for PresentationTimings {
    fn default() -> Self {
        Self {
            main_alert: Duration::from_secs(3),
            details: Duration::from_secs(5),
            intensity_page: Duration::from_secs(5),
            end_alert: Duration::from_secs(3),
            cooldown: Duration::from_secs(2),
            early_warning: Duration::from_secs(10),
        }
    }
}

/// Director configuration.
#[derive(Clone, Debug)]
pub struct DirectorConfig {
    /// Phase durations.
    pub timings: PresentationTimings,
    /// Line width budget for the intensity formatter, in character cells.
    pub width_budget: usize,
}

impl Default for DirectorConfig {
    fn default() -> Self {
        Self {
            timings: PresentationTimings::default(),
            width_budget: crate::intensity::DEFAULT_WIDTH_BUDGET,
        }
    }
}

impl DirectorConfig {
    /// Configuration with default timings and the given width budget.
    #[must_use]
    pub fn with_width_budget(width_budget: usize) -> Self {
        Self {
            timings: PresentationTimings::default(),
            width_budget,
        }
    }
}

// =============================================================================
// Phase State
// =============================================================================

/// Current phase of the active presentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    MainAlert,
    Details,
    IntensityPage { next: usize },
    EndAlert,
    Cooldown,
}

/// Text prepared once per report when its presentation starts.
#[derive(Debug)]
struct ActivePresentation {
    details: String,
    pages: Vec<String>,
}

// =============================================================================
// Director
// =============================================================================

/// The presentation director. Owns the queue and all phase state; drives
/// one report at a time from a single task.
pub struct Director {
    config: DirectorConfig,
    stations: StationDirectory,
    queue: PresentationQueue,
    phase: Phase,
    phase_deadline: Option<Instant>,
    active: Option<ActivePresentation>,
    warning_deadline: Option<Instant>,
    warning_visible: bool,
    inbound_closed: bool,
    tx: mpsc::Sender<SurfaceCommand>,
}

impl Director {
    /// Create a director that emits surface commands on `tx`.
    #[must_use]
    pub fn new(
        config: DirectorConfig,
        stations: StationDirectory,
        tx: mpsc::Sender<SurfaceCommand>,
    ) -> Self {
        Self {
            config,
            stations,
            queue: PresentationQueue::new(),
            phase: Phase::Idle,
            phase_deadline: None,
            active: None,
            warning_deadline: None,
            warning_visible: false,
            inbound_closed: false,
            tx,
        }
    }

    /// Run the director until the event channel closes and all queued
    /// presentations (and any visible warning) have completed.
    pub async fn run(mut self, mut rx: mpsc::Receiver<FeedEvent>) {
        info!("Presentation director started");
        loop {
            if self.inbound_closed && self.is_idle() {
                break;
            }
            let deadline = self.next_deadline();
            tokio::select! {
                event = rx.recv(), if !self.inbound_closed => {
                    match event {
                        Some(event) => self.handle_event(event).await,
                        None => {
                            debug!("Feed channel closed; finishing remaining presentations");
                            self.inbound_closed = true;
                        }
                    }
                }
                () = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.advance().await;
                }
            }
        }
        info!("Presentation director stopped");
    }

    /// Handle one classified feed event.
    pub async fn handle_event(&mut self, event: FeedEvent) {
        match event {
            FeedEvent::Opened => {
                self.play(SoundId::Chime).await;
            }
            FeedEvent::Report(report) => {
                self.queue.enqueue(report);
                debug!(queued = self.queue.len(), "Queued earthquake report");
                if self.phase == Phase::Idle {
                    self.start_next().await;
                }
            }
            FeedEvent::Warning(warning) => {
                self.show_warning(&warning).await;
            }
        }
    }

    fn is_idle(&self) -> bool {
        self.phase == Phase::Idle && self.warning_deadline.is_none() && self.queue.is_empty()
    }

    fn next_deadline(&self) -> Option<Instant> {
        match (self.phase_deadline, self.warning_deadline) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Fire whichever deadlines have expired.
    async fn advance(&mut self) {
        let now = Instant::now();
        if let Some(deadline) = self.warning_deadline {
            if deadline <= now {
                self.warning_deadline = None;
                self.warning_visible = false;
                self.hide(Region::EarlyWarning).await;
            }
        }
        if let Some(deadline) = self.phase_deadline {
            if deadline <= now {
                self.step_phase(deadline).await;
            }
        }
    }

    /// Validate and start the next queued report, abandoning malformed
    /// heads until a presentable one (or an empty queue) is found.
    async fn start_next(&mut self) {
        loop {
            let prepared = match self.queue.front() {
                None => {
                    self.phase = Phase::Idle;
                    self.phase_deadline = None;
                    return;
                }
                Some(report) => report
                    .quake
                    .as_ref()
                    .filter(|quake| quake.hypocenter.is_some())
                    .map(|quake| ActivePresentation {
                        details: details_text(quake),
                        pages: paginate(format_intensity_lines(
                            &report.points,
                            &self.stations,
                            self.config.width_budget,
                        )),
                    }),
            };
            match prepared {
                Some(active) => {
                    info!(
                        queued = self.queue.len(),
                        pages = active.pages.len(),
                        "Starting earthquake presentation"
                    );
                    self.active = Some(active);
                    self.play(SoundId::Chime).await;
                    self.set_text(Region::MainAlert, MAIN_ALERT_TEXT.to_string())
                        .await;
                    self.show(Region::MainAlert).await;
                    self.phase = Phase::MainAlert;
                    self.phase_deadline = Some(Instant::now() + self.config.timings.main_alert);
                    return;
                }
                None => {
                    warn!("Malformed earthquake report (missing hypocenter), abandoning");
                    self.queue.complete_front();
                }
            }
        }
    }

    /// Advance the phase machine. `base` is the deadline that just
    /// expired; the next deadline is anchored to it so phases never
    /// drift.
    async fn step_phase(&mut self, base: Instant) {
        match self.phase {
            Phase::Idle => {}
            Phase::MainAlert => {
                self.hide(Region::MainAlert).await;
                let details = self
                    .active
                    .as_ref()
                    .map(|a| a.details.clone())
                    .unwrap_or_default();
                self.set_text(Region::EventDetails, details).await;
                self.show(Region::EventDetails).await;
                self.phase = Phase::Details;
                self.phase_deadline = Some(base + self.config.timings.details);
            }
            Phase::Details => {
                self.hide(Region::EventDetails).await;
                self.show_page_or_end(0, base).await;
            }
            Phase::IntensityPage { next } => {
                self.hide(Region::IntensityInfo).await;
                self.show_page_or_end(next, base).await;
            }
            Phase::EndAlert => {
                self.hide(Region::EndAlert).await;
                if self.config.timings.cooldown.is_zero() {
                    self.finish_presentation().await;
                } else {
                    self.phase = Phase::Cooldown;
                    self.phase_deadline = Some(base + self.config.timings.cooldown);
                }
            }
            Phase::Cooldown => {
                self.finish_presentation().await;
            }
        }
    }

    /// Show intensity page `index`, or the closing banner when the pages
    /// are exhausted (or there were none at all).
    async fn show_page_or_end(&mut self, index: usize, base: Instant) {
        let page = self
            .active
            .as_ref()
            .and_then(|a| a.pages.get(index).cloned());
        match page {
            Some(text) => {
                let total = self.active.as_ref().map_or(0, |a| a.pages.len());
                debug!(page = index + 1, total, "Showing intensity page");
                self.set_text(Region::IntensityInfo, text).await;
                self.show(Region::IntensityInfo).await;
                self.phase = Phase::IntensityPage { next: index + 1 };
                self.phase_deadline = Some(base + self.config.timings.intensity_page);
            }
            None => {
                self.set_text(Region::EndAlert, END_ALERT_TEXT.to_string())
                    .await;
                self.show(Region::EndAlert).await;
                self.phase = Phase::EndAlert;
                self.phase_deadline = Some(base + self.config.timings.end_alert);
            }
        }
    }

    /// The active report is done: pop it and start the next, if any.
    async fn finish_presentation(&mut self) {
        self.active = None;
        self.queue.complete_front();
        debug!(queued = self.queue.len(), "Presentation complete");
        self.start_next().await;
    }

    /// Present an early warning immediately, independent of the queue.
    /// A warning arriving while one is showing replaces the text and
    /// extends the hide deadline to a fresh window.
    async fn show_warning(&mut self, warning: &EarlyWarning) {
        warn!(areas = warning.areas.len(), "Early warning received");
        self.play(SoundId::Alarm).await;
        self.set_text(Region::EarlyWarning, warning_text(warning))
            .await;
        if !self.warning_visible {
            self.show(Region::EarlyWarning).await;
            self.warning_visible = true;
        }
        self.warning_deadline = Some(Instant::now() + self.config.timings.early_warning);
    }

    // =========================================================================
    // Surface command helpers
    // =========================================================================

    async fn show(&self, region: Region) {
        self.send(SurfaceCommand::Show { region }).await;
    }

    async fn hide(&self, region: Region) {
        self.send(SurfaceCommand::Hide { region }).await;
    }

    async fn set_text(&self, region: Region, text: String) {
        self.send(SurfaceCommand::SetText { region, text }).await;
    }

    async fn play(&self, sound: SoundId) {
        self.send(SurfaceCommand::PlaySound { sound }).await;
    }

    async fn send(&self, command: SurfaceCommand) {
        if self.tx.send(command).await.is_err() {
            warn!("Surface command channel closed, command dropped");
        }
    }
}

// =============================================================================
// Text Builders
// =============================================================================

/// The two-line details text: hypocenter and depth, then magnitude and
/// tsunami. Absent optionals render as the unknown sentinel; a missing
/// depth drops the km suffix, depth zero renders as `0km`.
fn details_text(quake: &QuakeSummary) -> String {
    let hypocenter = quake.hypocenter.as_ref();
    let name = hypocenter
        .and_then(|h| h.name.as_deref())
        .unwrap_or(UNKNOWN);
    let depth = match hypocenter.and_then(|h| h.depth_km) {
        Some(depth) => format!("{depth}km"),
        None => UNKNOWN.to_string(),
    };
    let magnitude = match quake.magnitude {
        Some(magnitude) => format!("M{magnitude:.1}"),
        None => UNKNOWN.to_string(),
    };
    format!(
        "震源地：{name}　　震源の深さ：{depth}\nマグニチュード：{magnitude}　　津波の有無：{}",
        quake.tsunami.label()
    )
}

/// The four-line early warning text.
fn warning_text(warning: &EarlyWarning) -> String {
    let quake = warning.quake.as_ref();
    let hypocenter = quake.and_then(|q| q.hypocenter.as_ref());
    let name = hypocenter
        .and_then(|h| h.name.as_deref())
        .unwrap_or(UNKNOWN);
    let magnitude = match quake.and_then(|q| q.magnitude) {
        Some(magnitude) => format!("M{magnitude:.1}"),
        None => UNKNOWN.to_string(),
    };
    let depth = match hypocenter.and_then(|h| h.depth_km) {
        Some(depth) => format!("{depth}km"),
        None => UNKNOWN.to_string(),
    };
    let areas = if warning.areas.is_empty() {
        UNKNOWN.to_string()
    } else {
        warning.areas.join("、")
    };
    format!(
        "震源地: {name}\nマグニチュード: {magnitude}\n深さ: {depth}\n警報対象地域: {areas}"
    )
}

/// Split formatted intensity lines into display pages.
fn paginate(lines: Vec<String>) -> Vec<String> {
    lines
        .chunks(LINES_PER_PAGE)
        .map(|chunk| chunk.join("\n"))
        .collect()
}
