//! Identity types for peers, chats, and monitor sessions.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Error;

/// Platform identity of a voice-chat participant.
///
/// The platform assigns signed 64-bit identifiers; chat-shaped entities
/// are encoded negative, so negative values are valid. Zero is the
/// platform's "no identity" sentinel and is rejected at the boundary,
/// which keeps every downstream consumer total over valid records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct PeerId(i64);

impl PeerId {
    /// Wrap a raw platform identifier, rejecting the zero sentinel.
    pub fn new(raw: i64) -> Result<Self, Error> {
        if raw == 0 {
            return Err(Error::InvalidRecord {
                message: "participant id is missing (zero sentinel)".to_string(),
            });
        }
        Ok(PeerId(raw))
    }

    /// Raw platform value.
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for PeerId {
    type Error = Error;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        PeerId::new(raw)
    }
}

impl From<PeerId> for i64 {
    fn from(id: PeerId) -> i64 {
        id.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Chat identifier for the monitored group and the log group.
///
/// Unlike [`PeerId`] this is a plain wrapper; configuration validation
/// decides whether a chat id is acceptable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(pub i64);

impl ChatId {
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl From<i64> for ChatId {
    fn from(raw: i64) -> Self {
        ChatId(raw)
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monitor session identifier in the format: cw-YYYYMMDD-HHMMSS-XXXX
///
/// where XXXX is a 4-character base32 suffix for uniqueness.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonitorSessionId(String);

impl MonitorSessionId {
    /// Generate a new session ID based on current UTC time.
    pub fn new() -> Self {
        let now = chrono::Utc::now();
        let date = now.format("%Y%m%d");
        let time = now.format("%H%M%S");
        let suffix = generate_base32_suffix();
        MonitorSessionId(format!("cw-{}-{}-{}", date, time, suffix))
    }

    /// Parse a session ID, validating the expected format.
    pub fn parse(s: &str) -> Option<Self> {
        if s.len() != 23 || !s.starts_with("cw-") {
            return None;
        }
        let bytes = s.as_bytes();
        if bytes[11] != b'-' || bytes[18] != b'-' {
            return None;
        }
        if !bytes[3..11].iter().all(u8::is_ascii_digit) {
            return None;
        }
        if !bytes[12..18].iter().all(u8::is_ascii_digit) {
            return None;
        }
        let alphabet = b"abcdefghijklmnopqrstuvwxyz234567";
        if !bytes[19..23].iter().all(|b| alphabet.contains(b)) {
            return None;
        }
        Some(MonitorSessionId(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for MonitorSessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MonitorSessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Generate a 4-character base32 suffix from a fresh UUID.
fn generate_base32_suffix() -> String {
    let uuid = uuid::Uuid::new_v4();
    let bytes = uuid.as_bytes();

    // Fold the first three bytes into 20 bits, then emit four 5-bit
    // groups through the RFC 4648 lowercase alphabet.
    let mut value = ((bytes[0] as u32) << 16) | ((bytes[1] as u32) << 8) | (bytes[2] as u32);
    value &= 0x000F_FFFF;

    let alphabet = b"abcdefghijklmnopqrstuvwxyz234567";
    let mut suffix = String::with_capacity(4);
    for shift in [15_u32, 10, 5, 0] {
        let index = ((value >> shift) & 0x1F) as usize;
        suffix.push(alphabet[index] as char);
    }
    suffix
}
