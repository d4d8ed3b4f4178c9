//! Receipt scan lifecycle.
//!
//! A scan is the only long-running operation in a session. While one is outstanding the session
//! reports `scanning == true` plus a progress percentage, and refuses to start another one.
//!
//! State is published through a `tokio::sync::watch` channel so that the presentation side can
//! observe progress through a [`ScanMonitor`] even while the scan future holds the session.

use crate::constants::PROGRESS_MAX;
use crate::error::{BillError, BillResult};
use crate::model::ItemId;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;

/// Snapshot of the scan slot as seen by the presentation layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ScanState {
    pub scanning: bool,
    /// Percentage in `0..=100`. Always zero when not scanning.
    pub progress: u8,
}

#[derive(Clone, Copy, Debug, Default)]
struct Tracked {
    state: ScanState,
    /// Bumped on every accepted scan so late progress from an old scan is ignored.
    generation: u64,
}

/// What a completed scan did to the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Items appended to the bill, in receipt order.
    Added(Vec<ItemId>),
    /// Recognition worked but no line looked like an item. Not an error.
    NothingFound,
}

/// Owner side of the scan slot, held by the session.
#[derive(Debug)]
pub(crate) struct ScanTracker {
    tx: Arc<watch::Sender<Tracked>>,
}

impl ScanTracker {
    pub(crate) fn new() -> Self {
        let (tx, _rx) = watch::channel(Tracked::default());
        Self { tx: Arc::new(tx) }
    }

    pub(crate) fn state(&self) -> ScanState {
        self.tx.borrow().state
    }

    pub(crate) fn monitor(&self) -> ScanMonitor {
        ScanMonitor {
            rx: self.tx.subscribe(),
        }
    }

    /// True when `ticket` was issued by this tracker.
    pub(crate) fn issued(&self, ticket: &ScanTicket) -> bool {
        Arc::ptr_eq(&self.tx, &ticket.tx)
    }

    /// Claims the scan slot, or fails with [`BillError::ScanInProgress`].
    pub(crate) fn begin(&self) -> BillResult<ScanTicket> {
        let mut claimed = None;
        self.tx.send_if_modified(|tracked| {
            if tracked.state.scanning {
                return false;
            }
            tracked.generation += 1;
            tracked.state = ScanState {
                scanning: true,
                progress: 0,
            };
            claimed = Some(tracked.generation);
            true
        });

        let generation = claimed.ok_or(BillError::ScanInProgress)?;
        tracing::info!(generation, "receipt scan started");
        Ok(ScanTicket {
            tx: Arc::clone(&self.tx),
            generation,
        })
    }
}

/// Proof that the caller owns the scan slot.
///
/// Dropping the ticket releases the slot and resets progress, whether the scan completed, failed
/// or was abandoned midway.
#[derive(Debug)]
pub struct ScanTicket {
    tx: Arc<watch::Sender<Tracked>>,
    generation: u64,
}

impl ScanTicket {
    /// Handle the recognizer reports progress into.
    pub fn reporter(&self) -> ProgressReporter {
        ProgressReporter {
            tx: Arc::clone(&self.tx),
            generation: self.generation,
        }
    }
}

impl Drop for ScanTicket {
    fn drop(&mut self) {
        let generation = self.generation;
        self.tx.send_if_modified(|tracked| {
            if tracked.generation != generation || !tracked.state.scanning {
                return false;
            }
            tracked.state = ScanState::default();
            true
        });
    }
}

/// Progress sink handed to a [`crate::recognizer::TextRecognizer`].
///
/// Values are clamped to `0..=100`. The core does not enforce monotonic progress. Reports that
/// arrive after the scan has ended are dropped.
#[derive(Clone, Debug)]
pub struct ProgressReporter {
    tx: Arc<watch::Sender<Tracked>>,
    generation: u64,
}

impl ProgressReporter {
    pub fn report(&self, percent: u8) {
        let percent = percent.min(PROGRESS_MAX);
        let generation = self.generation;
        self.tx.send_if_modified(|tracked| {
            if tracked.generation != generation || !tracked.state.scanning {
                return false;
            }
            let changed = tracked.state.progress != percent;
            tracked.state.progress = percent;
            changed
        });
    }
}

/// Read-only view of the scan slot for the presentation layer.
#[derive(Clone, Debug)]
pub struct ScanMonitor {
    rx: watch::Receiver<Tracked>,
}

impl ScanMonitor {
    pub fn current(&self) -> ScanState {
        self.rx.borrow().state
    }

    /// Waits for the next state change.
    ///
    /// Returns `None` once the session and every ticket and reporter it handed out are gone.
    pub async fn changed(&mut self) -> Option<ScanState> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_marks_scanning() {
        let tracker = ScanTracker::new();
        assert_eq!(tracker.state(), ScanState::default());

        let _ticket = tracker.begin().unwrap();
        assert_eq!(
            tracker.state(),
            ScanState {
                scanning: true,
                progress: 0
            }
        );
    }

    #[test]
    fn second_begin_is_rejected_while_busy() {
        let tracker = ScanTracker::new();
        let ticket = tracker.begin().unwrap();

        assert!(matches!(tracker.begin(), Err(BillError::ScanInProgress)));

        drop(ticket);
        assert!(tracker.begin().is_ok());
    }

    #[test]
    fn progress_is_clamped() {
        let tracker = ScanTracker::new();
        let ticket = tracker.begin().unwrap();
        let reporter = ticket.reporter();

        reporter.report(42);
        assert_eq!(tracker.state().progress, 42);
        reporter.report(250);
        assert_eq!(tracker.state().progress, 100);
        reporter.report(7);
        assert_eq!(tracker.state().progress, 7);
    }

    #[test]
    fn dropping_ticket_resets_state() {
        let tracker = ScanTracker::new();
        let ticket = tracker.begin().unwrap();
        ticket.reporter().report(80);

        drop(ticket);
        assert_eq!(tracker.state(), ScanState::default());
    }

    #[test]
    fn late_progress_from_old_scan_is_ignored() {
        let tracker = ScanTracker::new();
        let first = tracker.begin().unwrap();
        let stale = first.reporter();
        drop(first);

        stale.report(90);
        assert_eq!(tracker.state(), ScanState::default());

        let _second = tracker.begin().unwrap();
        stale.report(90);
        assert_eq!(tracker.state().progress, 0);
    }

    #[test]
    fn tickets_know_their_tracker() {
        let tracker = ScanTracker::new();
        let other = ScanTracker::new();
        let ticket = tracker.begin().unwrap();

        assert!(tracker.issued(&ticket));
        assert!(!other.issued(&ticket));
    }

    #[tokio::test]
    async fn monitor_ends_after_last_handle_is_dropped() {
        let tracker = ScanTracker::new();
        let mut monitor = tracker.monitor();
        let ticket = tracker.begin().unwrap();
        let reporter = ticket.reporter();
        drop(tracker);

        assert!(monitor.changed().await.unwrap().scanning);
        drop(ticket);
        assert_eq!(monitor.changed().await.unwrap(), ScanState::default());
        drop(reporter);
        assert_eq!(monitor.changed().await, None);
    }

    #[tokio::test]
    async fn monitor_sees_updates() {
        let tracker = ScanTracker::new();
        let mut monitor = tracker.monitor();
        assert!(!monitor.current().scanning);

        let ticket = tracker.begin().unwrap();
        let seen = monitor.changed().await.unwrap();
        assert!(seen.scanning);

        ticket.reporter().report(55);
        assert_eq!(monitor.changed().await.unwrap().progress, 55);

        drop(ticket);
        assert_eq!(monitor.changed().await.unwrap(), ScanState::default());
    }
}
