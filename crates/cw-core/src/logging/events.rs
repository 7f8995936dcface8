//! Structured event vocabulary.
//!
//! Event names are stable dotted strings used as tracing targets, so
//! downstream collectors can filter without parsing messages. The
//! [`crate::log_event!`] macro attaches the shared context fields.

use serde::{Deserialize, Serialize};
use std::fmt;

use cw_common::MonitorSessionId;

/// Pipeline stage a log event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Init,
    Config,
    Scan,
    Classify,
    Burst,
    Report,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Init => "init",
            Stage::Config => "config",
            Stage::Scan => "scan",
            Stage::Classify => "classify",
            Stage::Burst => "burst",
            Stage::Report => "report",
        };
        write!(f, "{}", name)
    }
}

/// Stable event names.
pub mod event_names {
    pub const RUN_STARTED: &str = "run.started";
    pub const RUN_COMPLETED: &str = "run.completed";
    pub const CONFIG_LOADED: &str = "config.loaded";
    pub const CONFIG_DEFAULTS: &str = "config.defaults_used";
    pub const CYCLE_COMPLETED: &str = "cycle.completed";
    pub const CHANNEL_DETECTED: &str = "channel.detected";
    pub const BAN_RECORDED: &str = "ban.recorded";
    pub const BURST_ALARM: &str = "burst.alarm";
    pub const INTERNAL_ERROR: &str = "internal_error";
}

/// Context fields attached to every event in a run.
#[derive(Debug, Clone)]
pub struct LogContext {
    /// Short unique id for this CLI invocation.
    pub run_id: String,
    /// Monitor session, when one is active.
    pub session_id: Option<MonitorSessionId>,
}

impl LogContext {
    pub fn new(run_id: String) -> Self {
        LogContext {
            run_id,
            session_id: None,
        }
    }

    pub fn with_session_id(mut self, session_id: MonitorSessionId) -> Self {
        self.session_id = Some(session_id);
        self
    }
}

/// Emit a structured event with the shared context fields.
///
/// The event name becomes the tracing target and must be one of the
/// [`event_names`] constants.
#[macro_export]
macro_rules! log_event {
    ($ctx:expr, INFO, $event:expr, $stage:expr, $msg:expr $(, $key:ident = $val:expr)* $(,)?) => {
        tracing::info!(
            target: $event,
            run_id = %$ctx.run_id,
            session_id = ?$ctx.session_id,
            stage = %$stage,
            message = $msg,
            $($key = $val,)*
        )
    };
    ($ctx:expr, DEBUG, $event:expr, $stage:expr, $msg:expr $(, $key:ident = $val:expr)* $(,)?) => {
        tracing::debug!(
            target: $event,
            run_id = %$ctx.run_id,
            session_id = ?$ctx.session_id,
            stage = %$stage,
            message = $msg,
            $($key = $val,)*
        )
    };
    ($ctx:expr, WARN, $event:expr, $stage:expr, $msg:expr $(, $key:ident = $val:expr)* $(,)?) => {
        tracing::warn!(
            target: $event,
            run_id = %$ctx.run_id,
            session_id = ?$ctx.session_id,
            stage = %$stage,
            message = $msg,
            $($key = $val,)*
        )
    };
    ($ctx:expr, ERROR, $event:expr, $stage:expr, $msg:expr $(, $key:ident = $val:expr)* $(,)?) => {
        tracing::error!(
            target: $event,
            run_id = %$ctx.run_id,
            session_id = ?$ctx.session_id,
            stage = %$stage,
            message = $msg,
            $($key = $val,)*
        )
    };
}
