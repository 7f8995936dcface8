//! End-to-end CLI tests for the chanwatch binary.
//!
//! Every command runs with a cleared environment so ambient CHANWATCH_*
//! or XDG settings on the host cannot leak into resolution.

use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;

fn chanwatch() -> Command {
    let mut cmd = cargo_bin_cmd!("chanwatch");
    cmd.env_clear();
    cmd
}

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("test")
        .join("fixtures")
}

fn roster_fixture() -> PathBuf {
    fixtures_dir().join("rosters").join("mixed_roster.json")
}

fn events_fixture() -> PathBuf {
    fixtures_dir().join("events").join("burst_events.json")
}

fn valid_config() -> PathBuf {
    fixtures_dir().join("config").join("valid_monitor.json")
}

// ============================================================================
// Help and version
// ============================================================================

mod help {
    use super::*;

    #[test]
    fn help_flag_works() {
        chanwatch()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("channel detection"));
    }

    #[test]
    fn help_lists_all_commands() {
        let output = chanwatch().arg("--help").assert().success();
        output
            .stdout(predicate::str::contains("classify"))
            .stdout(predicate::str::contains("scan"))
            .stdout(predicate::str::contains("replay"))
            .stdout(predicate::str::contains("check"));
    }

    #[test]
    fn version_flag_works() {
        chanwatch()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("chanwatch"));
    }

    #[test]
    fn version_subcommand_reports_name_and_version() {
        chanwatch()
            .arg("version")
            .assert()
            .success()
            .stdout(predicate::str::contains("\"name\": \"chanwatch\""));

        chanwatch()
            .args(["version", "--format", "text"])
            .assert()
            .success()
            .stdout(predicate::str::contains("chanwatch 0.1.0"));
    }

    #[test]
    fn unknown_command_fails() {
        chanwatch()
            .arg("nonexistent-command")
            .assert()
            .failure()
            .stderr(predicate::str::contains("error"));
    }
}

// ============================================================================
// classify
// ============================================================================

mod classify_cmd {
    use super::*;

    #[test]
    fn classify_fixture_roster_json() {
        chanwatch()
            .args(["classify", "-i"])
            .arg(roster_fixture())
            .assert()
            .success()
            .stdout(predicate::str::contains("\"channels\": 7"))
            .stdout(predicate::str::contains("\"total\": 9"))
            .stdout(predicate::str::contains("explicit_type"))
            .stdout(predicate::str::contains("bot_exclusion"));
    }

    #[test]
    fn classify_reads_stdin_by_default() {
        chanwatch()
            .arg("classify")
            .write_stdin("[]")
            .assert()
            .success()
            .stdout(predicate::str::contains("\"total\": 0"));
    }

    #[test]
    fn classify_text_format_summarizes() {
        chanwatch()
            .args(["classify", "--format", "text", "-i"])
            .arg(roster_fixture())
            .assert()
            .success()
            .stdout(predicate::str::contains("Crypto Signals Daily"))
            .stdout(predicate::str::contains("9 records, 7 channels"));
    }

    #[test]
    fn classify_rejects_malformed_roster() {
        chanwatch()
            .arg("classify")
            .write_stdin("this is not json")
            .assert()
            .code(12)
            .stderr(predicate::str::contains("Participant record rejected"));
    }

    #[test]
    fn classify_rejects_zero_id() {
        chanwatch()
            .arg("classify")
            .write_stdin(r#"[{"id": 0}]"#)
            .assert()
            .code(12)
            .stderr(predicate::str::contains("zero sentinel"));
    }
}

// ============================================================================
// scan
// ============================================================================

mod scan_cmd {
    use super::*;

    #[test]
    fn scan_fixture_roster_reports_detections() {
        chanwatch()
            .args(["scan", "--config"])
            .arg(valid_config())
            .arg("-i")
            .arg(roster_fixture())
            .assert()
            .code(1)
            .stdout(predicate::str::contains("\"cycle\": 1"))
            .stdout(predicate::str::contains("\"banned_total\": 7"))
            .stdout(predicate::str::contains("\"session_id\""));
    }

    #[test]
    fn scan_empty_roster_is_clean() {
        chanwatch()
            .args(["scan", "--config"])
            .arg(valid_config())
            .write_stdin("[]")
            .assert()
            .code(0)
            .stdout(predicate::str::contains("\"detections\": []"));
    }

    #[test]
    fn scan_text_format_renders_notices() {
        chanwatch()
            .args(["scan", "--format", "text", "--config"])
            .arg(valid_config())
            .arg("-i")
            .arg(roster_fixture())
            .assert()
            .code(1)
            .stdout(predicate::str::contains("📞 Monitoring voice chat in:"))
            .stdout(predicate::str::contains("🚫 CHANNEL BANNED FROM VOICE CHAT"))
            .stdout(predicate::str::contains(
                "✅ Found and banned 7 channels from voice chat",
            ));
    }

    #[test]
    fn scan_duplicate_capture_rows_ban_once() {
        let capture = r#"[
            {"id": -1001234567001, "channel_entity": true, "title": "Crypto Signals Daily"},
            {"id": -1001234567001, "channel_entity": true, "title": "Crypto Signals Daily"}
        ]"#;
        chanwatch()
            .args(["scan", "--format", "text", "--config"])
            .arg(valid_config())
            .write_stdin(capture)
            .assert()
            .code(1)
            .stdout(predicate::str::contains("🚫 CHANNEL BANNED FROM VOICE CHAT").count(1))
            .stdout(predicate::str::contains(
                "✅ Found and banned 1 channels from voice chat",
            ));
    }

    #[test]
    fn scan_with_bad_config_reports_config_error() {
        chanwatch()
            .args(["scan", "--config"])
            .arg(fixtures_dir().join("config").join("invalid_monitor_capacity.json"))
            .write_stdin("[]")
            .assert()
            .code(11)
            .stderr(predicate::str::contains("burst.history_capacity"));
    }
}

// ============================================================================
// replay
// ============================================================================

mod replay_cmd {
    use super::*;

    #[test]
    fn replay_fixture_events_raises_alarm() {
        chanwatch()
            .args(["replay", "--config"])
            .arg(valid_config())
            .arg("-e")
            .arg(events_fixture())
            .assert()
            .code(2)
            .stdout(predicate::str::contains("\"alarms\": 1"))
            .stdout(predicate::str::contains("\"events\": 5"));
    }

    #[test]
    fn replay_empty_events_is_clean() {
        chanwatch()
            .args(["replay", "--config"])
            .arg(valid_config())
            .write_stdin("[]")
            .assert()
            .code(0)
            .stdout(predicate::str::contains("\"alarms\": 0"));
    }

    #[test]
    fn replay_text_format_prints_alert() {
        chanwatch()
            .args(["replay", "--format", "text", "--config"])
            .arg(valid_config())
            .arg("-e")
            .arg(events_fixture())
            .assert()
            .code(2)
            .stdout(predicate::str::contains("⚠️ MUTE SPAM DETECTED"))
            .stdout(predicate::str::contains("👤 User: Mute Happy Mod"))
            .stdout(predicate::str::contains("5 events replayed, 1 alarms"));
    }

    #[test]
    fn replay_rejects_malformed_events() {
        chanwatch()
            .args(["replay", "--config"])
            .arg(valid_config())
            .write_stdin("{broken")
            .assert()
            .code(21)
            .stderr(predicate::str::contains("JSON input could not be parsed"));
    }
}

// ============================================================================
// check
// ============================================================================

mod check_cmd {
    use super::*;

    #[test]
    fn check_valid_config_succeeds() {
        chanwatch()
            .args(["check", "--config"])
            .arg(valid_config())
            .assert()
            .success()
            .stdout(predicate::str::contains("\"valid\": true"))
            .stdout(predicate::str::contains("CLI argument"));
    }

    #[test]
    fn check_invalid_capacity_fails_validation() {
        chanwatch()
            .args(["check", "--config"])
            .arg(fixtures_dir().join("config").join("invalid_monitor_capacity.json"))
            .assert()
            .code(11)
            .stderr(predicate::str::contains("burst.history_capacity"));
    }

    #[test]
    fn check_show_text_prints_summary() {
        chanwatch()
            .args(["check", "--show", "--format", "text", "--config"])
            .arg(valid_config())
            .assert()
            .success()
            .stdout(predicate::str::contains("✓ Configuration valid"))
            .stdout(predicate::str::contains("Burst:"));
    }

    #[test]
    fn bare_invocation_checks_builtin_defaults() {
        chanwatch()
            .assert()
            .success()
            .stdout(predicate::str::contains("\"valid\": true"))
            .stdout(predicate::str::contains("builtin default"));
    }
}
