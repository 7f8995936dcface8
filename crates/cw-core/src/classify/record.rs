//! Participant record types.

use serde::{Deserialize, Serialize};

use cw_common::PeerId;

/// Immutable snapshot of one voice-chat participant, captured at the
/// platform boundary once per scan cycle.
///
/// String fields distinguish absent (`None`) from present-but-empty
/// (`Some("")`); both count as empty for classification, matching the
/// platform's loose schema. Values are not trimmed: `" "` is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantRecord {
    /// Platform identity. Zero is rejected at deserialization.
    pub id: PeerId,

    /// The platform schema itself tags this entity as a channel,
    /// broadcast group, or megagroup.
    #[serde(default)]
    pub channel_entity: bool,

    /// Entity is a bot account.
    #[serde(default)]
    pub bot: bool,

    /// Entity carries the platform's verified badge.
    #[serde(default)]
    pub verified: bool,

    /// Public handle, without the leading `@`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    /// Channel-style display title; user accounts have none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Member count. Only channel-shaped entities expose this.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members_count: Option<u64>,
}

impl ParticipantRecord {
    /// Minimal record carrying only an identity.
    pub fn new(id: PeerId) -> Self {
        ParticipantRecord {
            id,
            channel_entity: false,
            bot: false,
            verified: false,
            username: None,
            first_name: None,
            last_name: None,
            title: None,
            members_count: None,
        }
    }

    /// Display name for notices and logs.
    ///
    /// Preference order: title, then first and last name, then first
    /// name alone, then a synthesized `Channel<id>` placeholder. A last
    /// name without a first name falls through to the placeholder.
    pub fn display_name(&self) -> String {
        if let Some(title) = non_empty(&self.title) {
            return title.to_string();
        }
        match (non_empty(&self.first_name), non_empty(&self.last_name)) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.to_string(),
            _ => format!("Channel{}", self.id),
        }
    }
}

/// Field presence test shared by the classification rules.
pub(super) fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}
