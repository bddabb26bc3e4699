//! Per-screen request state
//!
//! `Load` replaces the loose loading/error booleans each screen used to
//! carry. `Tracker` hands out tickets so a screen can tell whether a reply
//! still matters: only the most recently issued request of a slot may change
//! state, and nothing issued before `invalidate` may change it at all.

use std::sync::atomic::{AtomicU64, Ordering};

/// Where a fetch stands
#[derive(Debug, Clone, PartialEq)]
pub enum Load<T> {
    /// Nothing requested yet
    Idle,
    /// A request is in flight
    Loading,
    /// Last request succeeded
    Loaded(T),
    /// Last request failed, with a message for the log
    Failed(String),
}

impl<T> Default for Load<T> {
    fn default() -> Self {
        Load::Idle
    }
}

impl<T> Load<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Load::Loading)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Load::Failed(_))
    }

    /// The loaded value, if any
    pub fn value(&self) -> Option<&T> {
        match self {
            Load::Loaded(value) => Some(value),
            _ => None,
        }
    }
}

/// Epochs are unique per process so tickets from a torn-down screen can never
/// be mistaken for tickets of its replacement.
static NEXT_EPOCH: AtomicU64 = AtomicU64::new(1);

/// Identifies one issued request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    epoch: u64,
    seq: u64,
}

/// Issues tickets for one screen and decides which replies to apply
#[derive(Debug)]
pub struct Tracker {
    epoch: u64,
    latest: u64,
}

impl Default for Tracker {
    fn default() -> Self {
        Self::new()
    }
}

impl Tracker {
    pub fn new() -> Self {
        Self {
            epoch: NEXT_EPOCH.fetch_add(1, Ordering::Relaxed),
            latest: 0,
        }
    }

    /// Issue a ticket for a new request. It supersedes every earlier ticket.
    pub fn issue(&mut self) -> Ticket {
        self.latest += 1;
        Ticket {
            epoch: self.epoch,
            seq: self.latest,
        }
    }

    /// True if `ticket` is the most recently issued one and the screen is
    /// still mounted.
    pub fn is_latest(&self, ticket: Ticket) -> bool {
        ticket.epoch == self.epoch && ticket.seq == self.latest
    }

    /// True if `ticket` was issued since the last `invalidate`.
    /// Used for mutations, whose replies matter even when newer requests exist.
    pub fn is_live(&self, ticket: Ticket) -> bool {
        ticket.epoch == self.epoch
    }

    /// Forget every outstanding ticket (screen unmounted)
    pub fn invalidate(&mut self) {
        self.epoch = NEXT_EPOCH.fetch_add(1, Ordering::Relaxed);
        self.latest = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_ticket_supersedes_older() {
        let mut tracker = Tracker::new();
        let first = tracker.issue();
        let second = tracker.issue();

        assert!(!tracker.is_latest(first));
        assert!(tracker.is_latest(second));
        assert!(tracker.is_live(first));
    }

    #[test]
    fn test_invalidate_drops_everything() {
        let mut tracker = Tracker::new();
        let ticket = tracker.issue();
        tracker.invalidate();

        assert!(!tracker.is_latest(ticket));
        assert!(!tracker.is_live(ticket));

        // A fresh ticket after invalidation never equals an old one
        let fresh = tracker.issue();
        assert_ne!(fresh, ticket);
        assert!(tracker.is_latest(fresh));
    }

    #[test]
    fn test_trackers_do_not_share_tickets() {
        let mut a = Tracker::new();
        let mut b = Tracker::new();
        let ticket = a.issue();
        b.issue();
        assert!(!b.is_latest(ticket));
    }

    #[test]
    fn test_load_accessors() {
        let mut load: Load<Vec<u32>> = Load::default();
        assert_eq!(load, Load::Idle);
        assert!(load.value().is_none());

        load = Load::Loaded(vec![1, 2]);
        assert_eq!(load.value(), Some(&vec![1, 2]));
        assert!(!load.is_loading());
        assert!(Load::<u32>::Failed("timeout".to_string()).is_failed());
    }
}
