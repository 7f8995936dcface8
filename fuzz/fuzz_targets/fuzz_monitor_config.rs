//! Fuzz target for chanwatch.json parsing and validation.
//!
//! Config files are operator-supplied, so parsing and semantic validation
//! must reject bad input with an error, never panic.

#![no_main]

use cw_config::{validate_monitor, MonitorConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(config) = serde_json::from_slice::<MonitorConfig>(data) {
        let _ = validate_monitor(&config);
    }
});
