//! Rendered notices and status lines for the log chat.
//!
//! These are the exact message shapes the deployed monitor posts; the
//! delivery transport lives with the platform client. Timestamps are
//! supplied by the caller and rendered as `YYYY-MM-DD HH:MM:SS`.

use chrono::{DateTime, Utc};

use crate::burst::{BurstConfig, BurstOutcome};
use crate::monitor::Detection;

/// Banner posted once after the platform client logs in.
pub fn startup_banner(account_name: &str, account_username: Option<&str>) -> String {
    match account_username {
        Some(username) => format!(
            "🚀 Voice Chat Channel Monitor Started!\nLogged in as: {} (@{})",
            account_name, username
        ),
        None => format!(
            "🚀 Voice Chat Channel Monitor Started!\nLogged in as: {}",
            account_name
        ),
    }
}

/// Banner posted when monitoring of a chat begins.
pub fn monitoring_banner(chat_label: &str, scan_interval_secs: u64) -> String {
    format!(
        "📞 Monitoring voice chat in: {}\n🚫 Auto-banning all channels in voice chat\n⚡ Scan interval: {} seconds",
        chat_label, scan_interval_secs
    )
}

/// Log line for a fresh detection, before the ban is attempted.
pub fn detection_line(detection: &Detection) -> String {
    format!(
        "🎯 Detected channel in voice chat: {} (ID: {})",
        detection.display_name, detection.id
    )
}

/// Notice posted to the log chat after a confirmed ban.
pub fn ban_notice(detection: &Detection, banned_at: DateTime<Utc>) -> String {
    let mut message = String::from("🚫 CHANNEL BANNED FROM VOICE CHAT\n");
    message.push_str(&format!("📢 Channel Name: {}\n", detection.display_name));
    message.push_str(&format!("🆔 Channel ID: `{}`\n", detection.id));

    match &detection.username {
        Some(username) => message.push_str(&format!("👤 Username: @{}\n", username)),
        None => message.push_str("👤 Username: No username\n"),
    }

    let kind = if detection.username.is_some() {
        "Public"
    } else {
        "Private"
    };
    message.push_str(&format!("📞 Type: {} channel\n", kind));
    message.push_str(&format!(
        "⏰ Banned at: {}\n",
        banned_at.format("%Y-%m-%d %H:%M:%S")
    ));
    message.push_str("🔒 Action: Permanently banned from group");
    message
}

/// Per-cycle summary, posted only when something was found.
pub fn cycle_summary(found: usize) -> String {
    format!("✅ Found and banned {} channels from voice chat", found)
}

/// Periodic status line.
pub fn status_line(cycle: u64, at: DateTime<Utc>, banned_total: usize) -> String {
    format!(
        "📊 Voice chat scan #{} at {} - {} total channels banned",
        cycle,
        at.format("%H:%M:%S"),
        banned_total
    )
}

/// Alert posted when an identity crosses the burst threshold.
pub fn burst_alert(
    display_name: &str,
    identity: cw_common::PeerId,
    outcome: &BurstOutcome,
    config: &BurstConfig,
    at: DateTime<Utc>,
) -> String {
    let mut message = String::from("⚠️ MUTE SPAM DETECTED\n");
    message.push_str(&format!("👤 User: {}\n", display_name));
    message.push_str(&format!("🆔 ID: `{}`\n", identity));
    message.push_str(&format!(
        "📈 Events: {} in {} seconds\n",
        outcome.events_in_window, config.time_window_secs
    ));
    message.push_str(&format!(
        "⏰ Detected at: {}",
        at.format("%Y-%m-%d %H:%M:%S")
    ));
    message
}
