//! Chanwatch: voice-chat channel monitor, offline decision engine.
//!
//! Subcommands:
//! - `classify`: rule verdicts for every record in a roster capture
//! - `scan`: one full scan cycle with roster diffing and ban notices
//! - `replay`: feed captured mute events through the burst detector
//! - `check`: resolve and validate the configuration
//! - `version`: version information
//!
//! Roster captures and event logs are JSON files produced by the
//! platform client; `-` reads them from stdin. Logs go to stderr,
//! command output to stdout.

use std::io::{IsTerminal, Read};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::Deserialize;

use cw_common::{format_error_human, Error, ErrorCategory, MonitorSessionId, OutputFormat, PeerId};
use cw_config::{resolve_config, MonitorConfig};
use cw_core::burst::{BurstConfig, BurstDetector};
use cw_core::classify::{classify, ParticipantRecord};
use cw_core::exit_codes::ExitCode;
use cw_core::log_event;
use cw_core::logging::{
    event_names, generate_run_id, init_logging, LogConfig, LogContext, LogFormat, LogLevel, Stage,
};
use cw_core::monitor::Monitor;
use cw_core::report;

/// Chanwatch: channel detection for group voice chats
#[derive(Parser)]
#[command(name = "chanwatch")]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    global: GlobalOpts,
}

#[derive(Args, Debug)]
struct GlobalOpts {
    /// Path to chanwatch.json (otherwise resolved from the environment)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify every record in a roster capture
    Classify(ClassifyArgs),

    /// Run one scan cycle: diff the roster, classify joiners, render notices
    Scan(ScanArgs),

    /// Replay captured mute events through the burst detector
    Replay(ReplayArgs),

    /// Resolve and validate the configuration
    Check(CheckArgs),

    /// Show version information
    Version,
}

#[derive(Args, Debug)]
struct ClassifyArgs {
    /// Roster capture (JSON array of participant records), '-' for stdin
    #[arg(long, short = 'i', default_value = "-")]
    input: String,
}

#[derive(Args, Debug)]
struct ScanArgs {
    /// Roster capture (JSON array of participant records), '-' for stdin
    #[arg(long, short = 'i', default_value = "-")]
    input: String,
}

#[derive(Args, Debug)]
struct ReplayArgs {
    /// Event log (JSON array of mute events), '-' for stdin
    #[arg(long, short = 'e', default_value = "-")]
    events: String,
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Include the resolved configuration in the output
    #[arg(long)]
    show: bool,
}

/// One captured mute-style event for replay.
#[derive(Debug, Deserialize)]
struct ReplayEvent {
    identity: PeerId,
    timestamp: chrono::DateTime<chrono::Utc>,
    #[serde(default)]
    display_name: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let cli_level = if cli.global.quiet {
        Some(LogLevel::Error)
    } else {
        match cli.global.verbose {
            0 => None,
            1 => Some(LogLevel::Debug),
            _ => Some(LogLevel::Trace),
        }
    };
    let log_format = match cli.global.format {
        OutputFormat::Json => LogFormat::Jsonl,
        OutputFormat::Text => LogFormat::Human,
    };
    init_logging(&LogConfig::from_env(cli_level, log_format));

    let exit_code = match &cli.command {
        Some(Commands::Classify(args)) => run_classify(&cli.global, args),
        Some(Commands::Scan(args)) => run_scan(&cli.global, args),
        Some(Commands::Replay(args)) => run_replay(&cli.global, args),
        Some(Commands::Check(args)) => run_check(&cli.global, args),
        Some(Commands::Version) => run_version(&cli.global),
        None => run_check(&cli.global, &CheckArgs { show: false }),
    };

    std::process::exit(exit_code.as_i32());
}

fn run_classify(global: &GlobalOpts, args: &ClassifyArgs) -> ExitCode {
    let ctx = LogContext::new(generate_run_id());
    log_event!(ctx, INFO, event_names::RUN_STARTED, Stage::Init, "classify starting");

    let records = match read_records(&args.input) {
        Ok(records) => records,
        Err(err) => return fail(&ctx, Stage::Classify, &err),
    };

    let verdicts: Vec<_> = records.iter().map(|r| (r, classify(r))).collect();
    let channels = verdicts.iter().filter(|(_, v)| v.is_channel).count();

    match global.format {
        OutputFormat::Json => {
            let results: Vec<serde_json::Value> = verdicts
                .iter()
                .map(|(record, verdict)| {
                    serde_json::json!({
                        "id": record.id,
                        "display_name": record.display_name(),
                        "is_channel": verdict.is_channel,
                        "rule": verdict.rule,
                    })
                })
                .collect();
            let output = serde_json::json!({
                "schema_version": cw_common::SCHEMA_VERSION,
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "run_id": ctx.run_id,
                "total": records.len(),
                "channels": channels,
                "results": results,
            });
            println!("{}", serde_json::to_string_pretty(&output).unwrap());
        }
        OutputFormat::Text => {
            for (record, verdict) in &verdicts {
                let verdict_text = match verdict.rule {
                    Some(rule) if verdict.is_channel => format!("channel ({})", rule),
                    Some(rule) => format!("user ({})", rule),
                    None => "user".to_string(),
                };
                println!("{}  {}  {}", record.id, record.display_name(), verdict_text);
            }
            println!();
            println!("{} records, {} channels", records.len(), channels);
        }
    }

    log_event!(
        ctx,
        INFO,
        event_names::RUN_COMPLETED,
        Stage::Report,
        "classify finished",
        total = records.len(),
        channels = channels
    );
    ExitCode::Clean
}

fn run_scan(global: &GlobalOpts, args: &ScanArgs) -> ExitCode {
    let session_id = MonitorSessionId::new();
    let ctx = LogContext::new(generate_run_id()).with_session_id(session_id.clone());
    log_event!(ctx, INFO, event_names::RUN_STARTED, Stage::Init, "scan starting");

    let (config, source) = match MonitorConfig::load(global.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(err) => return fail(&ctx, Stage::Config, &err.into()),
    };
    log_event!(
        ctx,
        INFO,
        event_names::CONFIG_LOADED,
        Stage::Config,
        "configuration resolved",
        source = source.to_string()
    );

    let mut monitor = match Monitor::new(BurstConfig::from_settings(&config.burst)) {
        Ok(monitor) => monitor,
        Err(err) => return fail(&ctx, Stage::Config, &err),
    };

    let records = match read_records(&args.input) {
        Ok(records) => records,
        Err(err) => return fail(&ctx, Stage::Scan, &err),
    };

    let cycle = monitor.begin_cycle(&records);
    let banned_at = chrono::Utc::now();

    let mut notices = Vec::with_capacity(cycle.detections.len());
    for detection in &cycle.detections {
        log_event!(
            ctx,
            INFO,
            event_names::CHANNEL_DETECTED,
            Stage::Classify,
            "channel detected",
            id = detection.id.get(),
            rule = detection.rule.to_string()
        );
        // Single-shot cycle: treat every detection as a confirmed ban so
        // the ledger and notices match what the live loop would post.
        if monitor.confirm_ban(detection.id) {
            log_event!(
                ctx,
                INFO,
                event_names::BAN_RECORDED,
                Stage::Report,
                "ban recorded",
                id = detection.id.get()
            );
            notices.push(report::ban_notice(detection, banned_at));
        }
    }

    let status_due = monitor.status_due(config.status_every_cycles);
    let chat_label = config
        .description
        .clone()
        .unwrap_or_else(|| config.target_chat.to_string());

    match global.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "schema_version": cw_common::SCHEMA_VERSION,
                "generated_at": banned_at.to_rfc3339(),
                "run_id": ctx.run_id,
                "session_id": session_id,
                "config_source": source.to_string(),
                "target_chat": config.target_chat,
                "cycle": cycle.cycle,
                "joined": cycle.joined,
                "departed": cycle.departed,
                "detections": cycle.detections,
                "banned_total": monitor.banned_total(),
                "status_due": status_due,
            });
            println!("{}", serde_json::to_string_pretty(&output).unwrap());
        }
        OutputFormat::Text => {
            println!(
                "{}",
                report::monitoring_banner(&chat_label, config.scan_interval_secs)
            );
            println!();
            for (detection, notice) in cycle.detections.iter().zip(&notices) {
                println!("{}", report::detection_line(detection));
                println!("{}", notice);
                println!();
            }
            if !cycle.detections.is_empty() {
                println!("{}", report::cycle_summary(cycle.detections.len()));
            }
            if status_due {
                println!(
                    "{}",
                    report::status_line(cycle.cycle, banned_at, monitor.banned_total())
                );
            }
        }
    }

    log_event!(
        ctx,
        INFO,
        event_names::CYCLE_COMPLETED,
        Stage::Scan,
        "scan cycle finished",
        cycle = cycle.cycle,
        joined = cycle.joined.len(),
        departed = cycle.departed.len(),
        detections = cycle.detections.len()
    );

    if cycle.detections.is_empty() {
        ExitCode::Clean
    } else {
        ExitCode::DetectionsFound
    }
}

fn run_replay(global: &GlobalOpts, args: &ReplayArgs) -> ExitCode {
    let ctx = LogContext::new(generate_run_id());
    log_event!(ctx, INFO, event_names::RUN_STARTED, Stage::Init, "replay starting");

    let (config, _source) = match MonitorConfig::load(global.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(err) => return fail(&ctx, Stage::Config, &err.into()),
    };

    let burst_config = BurstConfig::from_settings(&config.burst);
    let mut detector = match BurstDetector::new(burst_config) {
        Ok(detector) => detector,
        Err(err) => return fail(&ctx, Stage::Config, &err),
    };

    let events = match read_events(&args.events) {
        Ok(events) => events,
        Err(err) => return fail(&ctx, Stage::Burst, &err),
    };

    let mut outcomes = Vec::with_capacity(events.len());
    let mut alarms = 0usize;
    for event in &events {
        let outcome = detector.record_and_check(event.identity, event.timestamp);
        if outcome.alarmed {
            alarms += 1;
            log_event!(
                ctx,
                WARN,
                event_names::BURST_ALARM,
                Stage::Burst,
                "burst threshold crossed",
                identity = event.identity.get(),
                events_in_window = outcome.events_in_window
            );
            if global.format == OutputFormat::Text {
                let fallback = format!("Peer{}", event.identity);
                let name = event.display_name.as_deref().unwrap_or(&fallback);
                println!(
                    "{}",
                    report::burst_alert(
                        name,
                        event.identity,
                        &outcome,
                        &burst_config,
                        event.timestamp
                    )
                );
                println!();
            }
        }
        outcomes.push(serde_json::json!({
            "identity": event.identity,
            "timestamp": event.timestamp.to_rfc3339(),
            "events_in_window": outcome.events_in_window,
            "alarmed": outcome.alarmed,
        }));
    }

    match global.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "schema_version": cw_common::SCHEMA_VERSION,
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "run_id": ctx.run_id,
                "events": events.len(),
                "alarms": alarms,
                "tracked_identities": detector.tracked_identities(),
                "outcomes": outcomes,
            });
            println!("{}", serde_json::to_string_pretty(&output).unwrap());
        }
        OutputFormat::Text => {
            println!("{} events replayed, {} alarms", events.len(), alarms);
        }
    }

    log_event!(
        ctx,
        INFO,
        event_names::RUN_COMPLETED,
        Stage::Report,
        "replay finished",
        events = events.len(),
        alarms = alarms
    );

    if alarms == 0 {
        ExitCode::Clean
    } else {
        ExitCode::AlarmsRaised
    }
}

fn run_check(global: &GlobalOpts, args: &CheckArgs) -> ExitCode {
    let ctx = LogContext::new(generate_run_id());
    let paths = resolve_config(global.config.as_deref());

    match MonitorConfig::load(global.config.as_deref()) {
        Ok((config, source)) => {
            if paths.monitor.is_some() {
                log_event!(
                    ctx,
                    INFO,
                    event_names::CONFIG_LOADED,
                    Stage::Config,
                    "configuration valid",
                    source = source.to_string()
                );
            } else {
                log_event!(
                    ctx,
                    INFO,
                    event_names::CONFIG_DEFAULTS,
                    Stage::Config,
                    "configuration valid",
                    source = source.to_string()
                );
            }

            match global.format {
                OutputFormat::Json => {
                    let mut output = serde_json::json!({
                        "schema_version": cw_common::SCHEMA_VERSION,
                        "valid": true,
                        "source": source.to_string(),
                        "path": paths.monitor,
                    });
                    if args.show {
                        output["config"] = serde_json::json!(config);
                    }
                    println!("{}", serde_json::to_string_pretty(&output).unwrap());
                }
                OutputFormat::Text => {
                    println!("✓ Configuration valid");
                    match &paths.monitor {
                        Some(path) => println!("  Source: {} ({})", source, path.display()),
                        None => println!("  Source: {}", source),
                    }
                    if args.show {
                        println!("  Target chat: {}", config.target_chat);
                        println!("  Log chat: {}", config.log_chat);
                        println!(
                            "  Scan: every {}s, status every {} cycles",
                            config.scan_interval_secs, config.status_every_cycles
                        );
                        println!(
                            "  Burst: {} events / {}s, capacity {}",
                            config.burst.threshold,
                            config.burst.time_window_secs,
                            config.burst.history_capacity
                        );
                    }
                }
            }
            ExitCode::Clean
        }
        Err(err) => fail(&ctx, Stage::Config, &err.into()),
    }
}

fn run_version(global: &GlobalOpts) -> ExitCode {
    match global.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "name": "chanwatch",
                "version": env!("CARGO_PKG_VERSION"),
            });
            println!("{}", serde_json::to_string_pretty(&output).unwrap());
        }
        OutputFormat::Text => {
            println!("chanwatch {}", env!("CARGO_PKG_VERSION"));
        }
    }
    ExitCode::Clean
}

/// Read a path argument, treating `-` as stdin.
fn read_input(path: &str) -> Result<String, Error> {
    if path == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

fn read_records(input: &str) -> Result<Vec<ParticipantRecord>, Error> {
    let raw = read_input(input)?;
    serde_json::from_str(&raw).map_err(|e| Error::InvalidRecord {
        message: format!("roster capture rejected: {}", e),
    })
}

fn read_events(input: &str) -> Result<Vec<ReplayEvent>, Error> {
    let raw = read_input(input)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Log, print, and map an error to its exit code.
fn fail(ctx: &LogContext, stage: Stage, err: &Error) -> ExitCode {
    log_event!(
        ctx,
        ERROR,
        event_names::INTERNAL_ERROR,
        stage,
        "command failed",
        code = err.code()
    );
    eprintln!("{}", format_error_human(err, std::io::stderr().is_terminal()));

    match err.category() {
        ErrorCategory::Config => ExitCode::ConfigError,
        ErrorCategory::Record => ExitCode::RecordError,
        ErrorCategory::Io => ExitCode::IoError,
    }
}
