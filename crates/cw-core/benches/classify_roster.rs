//! Criterion benchmarks for the classifier and burst detector hot paths.
//!
//! Rosters are synthesized in memory so runs stay deterministic and never
//! depend on captures from a live chat.

use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use cw_common::PeerId;
use cw_core::burst::{BurstConfig, BurstDetector};
use cw_core::classify::{classify, ParticipantRecord};
use cw_core::monitor::Monitor;

/// Roster mixing every record shape the classifier distinguishes.
fn synthetic_roster(n: usize) -> Vec<ParticipantRecord> {
    (0..n)
        .map(|i| {
            let id = PeerId::new(i as i64 + 1).expect("nonzero id");
            let mut record = ParticipantRecord::new(id);
            match i % 6 {
                0 => {
                    record.channel_entity = true;
                    record.title = Some(format!("Channel {i}"));
                }
                1 => {
                    record.bot = true;
                    record.username = Some(format!("helper_{i}_bot"));
                }
                2 => {
                    record.title = Some(format!("Lounge {i}"));
                    record.members_count = Some(1_000 + i as u64);
                }
                3 => {
                    record.first_name = Some("Telegram".to_string());
                    record.last_name = Some("Tips".to_string());
                }
                4 => {
                    record.username = Some(format!("user_{i}_channel"));
                    record.first_name = Some("Alex".to_string());
                }
                _ => {
                    record.first_name = Some("John".to_string());
                    record.last_name = Some("Smith".to_string());
                    record.username = Some(format!("jsmith{i}"));
                }
            }
            record
        })
        .collect()
}

fn bench_classify_roster(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");

    for size in [16usize, 256] {
        let roster = synthetic_roster(size);
        group.bench_with_input(BenchmarkId::new("roster", size), &roster, |b, roster| {
            b.iter(|| {
                for record in roster {
                    black_box(classify(black_box(record)));
                }
            });
        });
    }

    group.finish();
}

fn bench_monitor_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("monitor");

    for size in [16usize, 256] {
        let roster = synthetic_roster(size);
        group.bench_with_input(
            BenchmarkId::new("begin_cycle", size),
            &roster,
            |b, roster| {
                b.iter(|| {
                    let mut monitor =
                        Monitor::new(BurstConfig::default_tuning()).expect("valid tuning");
                    black_box(monitor.begin_cycle(black_box(roster)));
                });
            },
        );
    }

    group.finish();
}

fn bench_burst_record(c: &mut Criterion) {
    let base = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let identities: Vec<PeerId> = (1..=32)
        .map(|i| PeerId::new(i).expect("nonzero id"))
        .collect();

    c.bench_function("burst/record_and_check", |b| {
        b.iter(|| {
            let mut detector =
                BurstDetector::new(BurstConfig::default_tuning()).expect("valid tuning");
            for (i, identity) in identities.iter().cycle().take(512).enumerate() {
                let at = base + Duration::seconds(i as i64);
                black_box(detector.record_and_check(*identity, at));
            }
        });
    });
}

criterion_group!(
    benches,
    bench_classify_roster,
    bench_monitor_cycle,
    bench_burst_record
);
criterion_main!(benches);
