//! Fuzz target for burst detector event streams.
//!
//! Drives the detector with arbitrary tunings and arbitrary event
//! sequences, checking the invariants that hold for any accepted
//! configuration: window counts stay within capacity and an alarm
//! always empties the identity's history.

#![no_main]

use arbitrary::Arbitrary;
use chrono::TimeZone;
use cw_common::PeerId;
use cw_core::burst::{BurstConfig, BurstDetector};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Feed {
    threshold: u8,
    capacity: u8,
    // Full range, so windows wider than the representable time span
    // get exercised too
    window_secs: u64,
    events: Vec<(i32, u32)>,
}

fuzz_target!(|feed: Feed| {
    let config = BurstConfig {
        time_window_secs: feed.window_secs,
        threshold: u32::from(feed.threshold),
        history_capacity: usize::from(feed.capacity),
    };
    // Rejected tunings are the detector's answer, not a crash.
    let Ok(mut detector) = BurstDetector::new(config) else {
        return;
    };

    for (raw_identity, offset) in feed.events {
        let Ok(identity) = PeerId::new(i64::from(raw_identity)) else {
            continue;
        };
        let Some(at) = chrono::Utc.timestamp_opt(i64::from(offset), 0).single() else {
            continue;
        };
        let outcome = detector.record_and_check(identity, at);
        assert!(outcome.events_in_window as usize <= config.history_capacity);
        if outcome.alarmed {
            assert!(outcome.events_in_window >= config.threshold);
            assert_eq!(detector.tracked_events(identity), 0);
        }
    }
});
