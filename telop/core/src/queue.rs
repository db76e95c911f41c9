//! Presentation Queue
//!
//! FIFO of earthquake reports awaiting presentation. The director is the
//! only consumer: the head stays in the queue while it is being presented
//! and is removed with [`PresentationQueue::complete_front`] only after
//! its full presentation (or abandonment). No priority, no dedup.

use std::collections::VecDeque;

use crate::events::EarthquakeReport;

/// Ordered queue of reports, one presented at a time.
#[derive(Clone, Debug, Default)]
pub struct PresentationQueue {
    reports: VecDeque<EarthquakeReport>,
}

impl PresentationQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a report in arrival order.
    pub fn enqueue(&mut self, report: EarthquakeReport) {
        self.reports.push_back(report);
    }

    /// The report currently at the head, if any. While a presentation is
    /// running this is the active report.
    #[must_use]
    pub fn front(&self) -> Option<&EarthquakeReport> {
        self.reports.front()
    }

    /// Remove the head after its presentation has fully completed.
    pub fn complete_front(&mut self) -> Option<EarthquakeReport> {
        self.reports.pop_front()
    }

    /// Whether there is nothing queued; when true a drain cycle may end.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Number of queued reports, including the active head.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reports.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Hypocenter, QuakeSummary};

    fn report(name: &str) -> EarthquakeReport {
        EarthquakeReport {
            quake: Some(QuakeSummary {
                hypocenter: Some(Hypocenter {
                    name: Some(name.to_string()),
                    depth_km: Some(10),
                }),
                ..QuakeSummary::default()
            }),
            points: Vec::new(),
        }
    }

    fn front_name(queue: &PresentationQueue) -> Option<String> {
        queue
            .front()
            .and_then(|r| r.quake.as_ref())
            .and_then(|q| q.hypocenter.as_ref())
            .and_then(|h| h.name.clone())
    }

    #[test]
    fn fifo_order_preserved() {
        let mut queue = PresentationQueue::new();
        queue.enqueue(report("first"));
        queue.enqueue(report("second"));
        queue.enqueue(report("third"));

        assert_eq!(queue.len(), 3);
        assert_eq!(front_name(&queue).as_deref(), Some("first"));
        queue.complete_front();
        assert_eq!(front_name(&queue).as_deref(), Some("second"));
        queue.complete_front();
        assert_eq!(front_name(&queue).as_deref(), Some("third"));
        queue.complete_front();
        assert!(queue.is_empty());
    }

    #[test]
    fn head_stays_until_completed() {
        let mut queue = PresentationQueue::new();
        queue.enqueue(report("active"));

        // Peeking does not consume; enqueues land behind the active head.
        assert_eq!(front_name(&queue).as_deref(), Some("active"));
        queue.enqueue(report("waiting"));
        assert_eq!(front_name(&queue).as_deref(), Some("active"));
        assert_eq!(queue.len(), 2);

        let done = queue.complete_front().unwrap();
        assert_eq!(
            done.quake.unwrap().hypocenter.unwrap().name.as_deref(),
            Some("active")
        );
        assert_eq!(front_name(&queue).as_deref(), Some("waiting"));
    }

    #[test]
    fn complete_on_empty_is_none() {
        let mut queue = PresentationQueue::new();
        assert!(queue.complete_front().is_none());
    }
}
