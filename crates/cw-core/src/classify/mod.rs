//! Participant classification.
//!
//! The platform's entity model is coarse: channels joining a voice chat
//! surface through the same participant lookup as human accounts, with
//! most fields optional. Classification therefore degrades from the
//! authoritative schema tag down to weak textual heuristics, evaluated
//! in a fixed order where the first matching rule wins.

mod record;
mod rules;

pub use record::ParticipantRecord;
pub use rules::{classify, Classification, Rule};
