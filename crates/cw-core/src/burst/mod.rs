//! Trailing-window burst detection for mute-style event spam.
//!
//! # Architecture
//!
//! Sliding log per identity: every event appends its timestamp to that
//! identity's bounded history, then the detector counts retained events
//! inside the trailing window ending at the event itself. Crossing the
//! threshold raises an alarm and clears the identity's entire history,
//! so the next alarm needs a fresh burst rather than one more event.
//!
//! Time is supplied by the caller with each event; the detector never
//! reads a clock, which keeps replays and tests deterministic.
//!
//! # Example
//!
//! ```ignore
//! let mut detector = BurstDetector::new(BurstConfig::default_tuning())?;
//! let outcome = detector.record_and_check(identity, event_time);
//! if outcome.alarmed {
//!     // raise the alert, history for this identity is already cleared
//! }
//! ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

use cw_common::{Error, PeerId};
use cw_config::BurstSettings;

/// Validated burst-detection parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurstConfig {
    /// Trailing window in seconds.
    pub time_window_secs: u64,
    /// Events inside the window that raise an alarm.
    pub threshold: u32,
    /// Raw events retained per identity; the oldest beyond this are
    /// evicted unconditionally, in or out of the window.
    pub history_capacity: usize,
}

impl BurstConfig {
    /// Deployed tuning: 3 events in 30 seconds, 10 retained.
    pub fn default_tuning() -> Self {
        BurstConfig {
            time_window_secs: 30,
            threshold: 3,
            history_capacity: 10,
        }
    }

    /// Bridge from the configuration schema.
    pub fn from_settings(settings: &BurstSettings) -> Self {
        BurstConfig {
            time_window_secs: settings.time_window_secs,
            threshold: settings.threshold,
            history_capacity: settings.history_capacity,
        }
    }

    fn validate(&self) -> Result<(), Error> {
        if self.threshold == 0 {
            return Err(Error::InvalidConfig {
                field: "threshold".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.time_window_secs == 0 {
            return Err(Error::InvalidConfig {
                field: "time_window_secs".to_string(),
                message: "must be positive".to_string(),
            });
        }
        // A capacity below the threshold silently disarms the detector:
        // eviction would discard events before the count can reach the
        // threshold. Reject instead of resizing.
        if self.history_capacity < self.threshold as usize {
            return Err(Error::InvalidConfig {
                field: "history_capacity".to_string(),
                message: format!("must be >= threshold ({})", self.threshold),
            });
        }
        Ok(())
    }

    fn window(&self) -> Duration {
        // chrono durations top out at i64 milliseconds; clamp rather than
        // panic on absurdly large configured windows.
        Duration::seconds(self.time_window_secs.min(i64::MAX as u64 / 1_000) as i64)
    }
}

/// Bounded insertion-ordered event log for one identity.
#[derive(Debug, Clone, Default)]
struct EventHistory {
    stamps: VecDeque<DateTime<Utc>>,
}

impl EventHistory {
    /// Append a timestamp, evicting the oldest beyond `capacity`.
    fn push(&mut self, at: DateTime<Utc>, capacity: usize) {
        self.stamps.push_back(at);
        while self.stamps.len() > capacity {
            self.stamps.pop_front();
        }
    }

    /// Count retained events strictly newer than `now - window`.
    fn count_within(&self, now: DateTime<Utc>, window: Duration) -> u32 {
        // A window reaching past the representable time span covers
        // every retained event.
        match now.checked_sub_signed(window) {
            Some(cutoff) => self.stamps.iter().filter(|&&ts| ts > cutoff).count() as u32,
            None => self.stamps.len() as u32,
        }
    }

    fn len(&self) -> usize {
        self.stamps.len()
    }
}

/// Result of recording one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BurstOutcome {
    /// The identity crossed the threshold on this event.
    pub alarmed: bool,
    /// Retained events inside the window at check time, this one included.
    pub events_in_window: u32,
}

/// Per-identity burst detector.
///
/// Owned by the enclosing service. Construction validates the
/// configuration once, so per-event recording is infallible.
#[derive(Debug, Clone)]
pub struct BurstDetector {
    config: BurstConfig,
    histories: HashMap<PeerId, EventHistory>,
}

impl BurstDetector {
    /// Build a detector, rejecting configurations that cannot fire.
    pub fn new(config: BurstConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(BurstDetector {
            config,
            histories: HashMap::new(),
        })
    }

    /// Record an event for `identity` at `at` and check the window.
    ///
    /// `at` is the reference point for the window; callers replaying
    /// captured events pass the captured timestamps. On alarm the whole
    /// history for the identity is dropped, not just the counted slice.
    pub fn record_and_check(&mut self, identity: PeerId, at: DateTime<Utc>) -> BurstOutcome {
        let window = self.config.window();
        let capacity = self.config.history_capacity;

        let history = self.histories.entry(identity).or_default();
        history.push(at, capacity);
        let events_in_window = history.count_within(at, window);

        let alarmed = events_in_window >= self.config.threshold;
        if alarmed {
            self.histories.remove(&identity);
        }

        BurstOutcome {
            alarmed,
            events_in_window,
        }
    }

    /// Retained raw events for an identity; 0 when unseen or cleared.
    pub fn tracked_events(&self, identity: PeerId) -> usize {
        self.histories.get(&identity).map_or(0, EventHistory::len)
    }

    /// Identities currently holding at least one retained event.
    pub fn tracked_identities(&self) -> usize {
        self.histories.values().filter(|h| h.len() > 0).count()
    }

    /// Drop one identity's history, e.g. when it leaves the chat.
    pub fn reset(&mut self, identity: PeerId) {
        self.histories.remove(&identity);
    }

    pub fn config(&self) -> &BurstConfig {
        &self.config
    }
}
