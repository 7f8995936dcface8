//! Chanwatch core: the decision engine of a voice-chat channel monitor.
//!
//! Channels joining a group voice chat are unwanted there; this crate
//! decides which participants are channels and which identities are
//! spamming mute-style events, and tracks what has already been actioned:
//!
//! - [`classify`]: ordered heuristic classification of participant records
//! - [`burst`]: trailing-window burst detection per identity
//! - [`monitor`]: scan-cycle roster diffing and the ban ledger
//! - [`report`]: rendered notices and status lines for the log chat
//!
//! The platform client (login, roster fetch, ban RPC, message delivery)
//! lives outside this crate and exchanges plain data with it.

pub mod burst;
pub mod classify;
pub mod exit_codes;
pub mod logging;
pub mod monitor;
pub mod report;

pub use burst::{BurstConfig, BurstDetector, BurstOutcome};
pub use classify::{classify, Classification, ParticipantRecord, Rule};
pub use monitor::{CycleReport, Detection, Monitor};
