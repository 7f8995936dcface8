//! Scan-cycle state: roster diffing, the ban ledger, burst routing.
//!
//! The outer polling loop fetches the voice-chat roster and feeds each
//! snapshot here. The monitor diffs it against the previous cycle,
//! classifies the newcomers, and keeps a ledger of confirmed bans so an
//! identity is only actioned once per process lifetime. Banning itself
//! is a platform call made by the caller; the ledger records only
//! confirmed outcomes, so a failed ban leaves the identity eligible for
//! re-detection when it rejoins.
//!
//! All state is owned here and handed to the caller explicitly; nothing
//! is global and nothing survives a restart.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;

use cw_common::{Error, PeerId};

use crate::burst::{BurstConfig, BurstDetector, BurstOutcome};
use crate::classify::{classify, ParticipantRecord, Rule};

/// A newly joined participant classified as a channel.
#[derive(Debug, Clone, Serialize)]
pub struct Detection {
    pub id: PeerId,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Rule that fired, for provenance in notices and logs.
    pub rule: Rule,
}

/// Outcome of one scan cycle.
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    /// 1-based cycle number.
    pub cycle: u64,
    /// Identities present now but absent in the previous cycle.
    pub joined: Vec<PeerId>,
    /// Identities present previously but gone now.
    pub departed: Vec<PeerId>,
    /// Channel classifications among the joiners, in roster order.
    pub detections: Vec<Detection>,
}

/// Monitor state carried across scan cycles.
pub struct Monitor {
    roster: HashSet<PeerId>,
    banned: HashSet<PeerId>,
    cycles: u64,
    bursts: BurstDetector,
}

impl Monitor {
    pub fn new(burst: BurstConfig) -> Result<Self, Error> {
        Ok(Monitor {
            roster: HashSet::new(),
            banned: HashSet::new(),
            cycles: 0,
            bursts: BurstDetector::new(burst)?,
        })
    }

    /// Ingest one roster snapshot.
    ///
    /// Computes joins and departures against the previous snapshot,
    /// classifies joiners that are not already in the ban ledger, and
    /// advances the cycle counter. On the first call every participant
    /// counts as joined. A snapshot listing an id more than once yields
    /// one detection, from its first row.
    pub fn begin_cycle(&mut self, records: &[ParticipantRecord]) -> CycleReport {
        self.cycles += 1;

        let current: HashSet<PeerId> = records.iter().map(|r| r.id).collect();
        let joined_set: HashSet<PeerId> = current.difference(&self.roster).copied().collect();
        let mut departed: Vec<PeerId> = self.roster.difference(&current).copied().collect();

        let mut detections = Vec::new();
        let mut classified: HashSet<PeerId> = HashSet::new();
        for record in records {
            if !joined_set.contains(&record.id) || self.banned.contains(&record.id) {
                continue;
            }
            // A capture may list an id twice; only the first row is
            // classified
            if !classified.insert(record.id) {
                continue;
            }
            let verdict = classify(record);
            if verdict.is_channel {
                if let Some(rule) = verdict.rule {
                    detections.push(Detection {
                        id: record.id,
                        display_name: record.display_name(),
                        username: record.username.clone().filter(|u| !u.is_empty()),
                        rule,
                    });
                }
            }
        }

        self.roster = current;

        let mut joined: Vec<PeerId> = joined_set.into_iter().collect();
        joined.sort_by_key(|p| p.get());
        departed.sort_by_key(|p| p.get());

        CycleReport {
            cycle: self.cycles,
            joined,
            departed,
            detections,
        }
    }

    /// Record a confirmed ban.
    ///
    /// Returns `false` when the identity was already in the ledger, in
    /// which case the caller should skip the duplicate action.
    pub fn confirm_ban(&mut self, identity: PeerId) -> bool {
        self.banned.insert(identity)
    }

    pub fn is_banned(&self, identity: PeerId) -> bool {
        self.banned.contains(&identity)
    }

    /// Total confirmed bans this process lifetime.
    pub fn banned_total(&self) -> usize {
        self.banned.len()
    }

    /// Completed scan cycles.
    pub fn cycle(&self) -> u64 {
        self.cycles
    }

    /// Whether a periodic status line is due, every `every` cycles.
    pub fn status_due(&self, every: u64) -> bool {
        every > 0 && self.cycles > 0 && self.cycles % every == 0
    }

    /// Route a mute-style event to the burst detector.
    pub fn note_event(&mut self, identity: PeerId, at: DateTime<Utc>) -> BurstOutcome {
        self.bursts.record_and_check(identity, at)
    }

    pub fn burst_config(&self) -> &BurstConfig {
        self.bursts.config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn peer(id: i64) -> PeerId {
        PeerId::new(id).unwrap()
    }

    fn user(id: i64, name: &str) -> ParticipantRecord {
        ParticipantRecord {
            first_name: Some(name.to_string()),
            ..ParticipantRecord::new(peer(id))
        }
    }

    fn channel(id: i64, title: &str) -> ParticipantRecord {
        ParticipantRecord {
            channel_entity: true,
            title: Some(title.to_string()),
            ..ParticipantRecord::new(peer(id))
        }
    }

    fn monitor() -> Monitor {
        Monitor::new(BurstConfig::default_tuning()).unwrap()
    }

    #[test]
    fn test_first_cycle_everyone_joins() {
        let mut mon = monitor();
        let report = mon.begin_cycle(&[user(1, "Alice"), channel(-100, "Spam TV")]);

        assert_eq!(report.cycle, 1);
        assert_eq!(report.joined, vec![peer(-100), peer(1)]);
        assert!(report.departed.is_empty());
        assert_eq!(report.detections.len(), 1);
        assert_eq!(report.detections[0].id, peer(-100));
        assert_eq!(report.detections[0].display_name, "Spam TV");
        assert_eq!(report.detections[0].rule, Rule::ExplicitType);
    }

    #[test]
    fn test_unchanged_roster_produces_nothing() {
        let mut mon = monitor();
        let roster = [user(1, "Alice"), user(2, "Bob")];
        mon.begin_cycle(&roster);

        let report = mon.begin_cycle(&roster);
        assert_eq!(report.cycle, 2);
        assert!(report.joined.is_empty());
        assert!(report.departed.is_empty());
        assert!(report.detections.is_empty());
    }

    #[test]
    fn test_departures_tracked() {
        let mut mon = monitor();
        mon.begin_cycle(&[user(1, "Alice"), user(2, "Bob")]);
        let report = mon.begin_cycle(&[user(2, "Bob"), user(3, "Cara")]);

        assert_eq!(report.joined, vec![peer(3)]);
        assert_eq!(report.departed, vec![peer(1)]);
    }

    #[test]
    fn test_lingering_channel_not_redetected() {
        let mut mon = monitor();
        let first = mon.begin_cycle(&[channel(-100, "Spam TV")]);
        assert_eq!(first.detections.len(), 1);

        // Still present next cycle: not a joiner, so not re-detected
        let second = mon.begin_cycle(&[channel(-100, "Spam TV")]);
        assert!(second.detections.is_empty());
    }

    #[test]
    fn test_duplicate_rows_detect_once() {
        let mut mon = monitor();
        let report = mon.begin_cycle(&[
            channel(-100, "Spam TV"),
            user(1, "Alice"),
            channel(-100, "Spam TV"),
        ]);

        assert_eq!(report.joined, vec![peer(-100), peer(1)]);
        assert_eq!(report.detections.len(), 1);
        assert_eq!(report.detections[0].id, peer(-100));
    }

    #[test]
    fn test_banned_identity_skipped_on_rejoin() {
        let mut mon = monitor();
        let report = mon.begin_cycle(&[channel(-100, "Spam TV")]);
        assert_eq!(report.detections.len(), 1);
        assert!(mon.confirm_ban(peer(-100)));

        // Leaves, then rejoins: the ledger suppresses re-detection
        mon.begin_cycle(&[]);
        let rejoin = mon.begin_cycle(&[channel(-100, "Spam TV")]);
        assert_eq!(rejoin.joined, vec![peer(-100)]);
        assert!(rejoin.detections.is_empty());
    }

    #[test]
    fn test_unconfirmed_ban_allows_redetection() {
        let mut mon = monitor();
        assert_eq!(mon.begin_cycle(&[channel(-100, "Spam TV")]).detections.len(), 1);

        // Ban never confirmed (platform call failed); after leaving and
        // rejoining the channel is detected again
        mon.begin_cycle(&[]);
        let rejoin = mon.begin_cycle(&[channel(-100, "Spam TV")]);
        assert_eq!(rejoin.detections.len(), 1);
    }

    #[test]
    fn test_confirm_ban_deduplicates() {
        let mut mon = monitor();
        assert!(mon.confirm_ban(peer(-100)));
        assert!(!mon.confirm_ban(peer(-100)));
        assert_eq!(mon.banned_total(), 1);
        assert!(mon.is_banned(peer(-100)));
    }

    #[test]
    fn test_status_cadence() {
        let mut mon = monitor();
        assert!(!mon.status_due(10));

        for _ in 0..9 {
            mon.begin_cycle(&[]);
        }
        assert!(!mon.status_due(10));

        mon.begin_cycle(&[]);
        assert_eq!(mon.cycle(), 10);
        assert!(mon.status_due(10));

        mon.begin_cycle(&[]);
        assert!(!mon.status_due(10));
    }

    #[test]
    fn test_note_event_routes_to_burst_detector() {
        let mut mon = monitor();
        let id = peer(7);
        let base = Utc.timestamp_opt(1_700_000_000, 0).unwrap();

        assert!(!mon.note_event(id, base).alarmed);
        assert!(!mon.note_event(id, base + chrono::Duration::seconds(5)).alarmed);
        let third = mon.note_event(id, base + chrono::Duration::seconds(10));
        assert!(third.alarmed);
        assert_eq!(third.events_in_window, 3);
    }

    #[test]
    fn test_detection_username_empty_string_dropped() {
        let mut mon = monitor();
        let rec = ParticipantRecord {
            channel_entity: true,
            title: Some("Spam TV".to_string()),
            username: Some(String::new()),
            ..ParticipantRecord::new(peer(-100))
        };
        let report = mon.begin_cycle(&[rec]);
        assert_eq!(report.detections[0].username, None);
    }
}
