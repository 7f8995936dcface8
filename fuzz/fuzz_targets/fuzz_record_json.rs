//! Fuzz target for participant record parsing and classification.
//!
//! Roster captures cross the platform boundary as JSON, so parsing must
//! return an error on malformed input, never panic. Records that do parse
//! are pushed through the classifier and display-name fallback.

#![no_main]

use cw_core::classify::{classify, ParticipantRecord};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(record) = serde_json::from_slice::<ParticipantRecord>(data) {
        let verdict = classify(&record);
        if verdict.is_channel {
            assert!(verdict.rule.is_some());
        }
        assert!(!record.display_name().is_empty());
    }
});
