//! Ordered classification rules.
//!
//! Eight rules run strongest-first; the first match decides and is
//! reported for provenance. Bot exclusion is the one exception to the
//! numeric order: it screens before everything else, so a bot flagged
//! with the channel schema tag still comes out a non-channel.
//!
//! Keyword matching is plain lowercase substring search, no patterns.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::record::{non_empty, ParticipantRecord};

/// Username substrings that mark channel-styled accounts.
const USERNAME_KEYWORDS: [&str; 4] = ["channel", "chat", "group", "bot"];

/// Personal-name substrings that mark channel-styled accounts.
const NAME_KEYWORDS: [&str; 6] = ["channel", "chat", "group", "news", "broadcast", "telegram"];

/// The rule that decided a classification, in evaluation strength order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    /// The platform schema tags the entity as a channel.
    ExplicitType,
    /// Bots are never channels, whatever else they look like.
    BotExclusion,
    /// Entity exposes a positive member count.
    MemberCount,
    /// Entity carries a verified badge.
    Verified,
    /// Channel-style title with no personal name.
    TitleWithoutName,
    /// Username contains a channel keyword.
    UsernameKeyword,
    /// Personal name contains a channel keyword.
    NameKeyword,
    /// No personal name, but a username is set.
    UsernameWithoutName,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rule::ExplicitType => "explicit_type",
            Rule::BotExclusion => "bot_exclusion",
            Rule::MemberCount => "member_count",
            Rule::Verified => "verified",
            Rule::TitleWithoutName => "title_without_name",
            Rule::UsernameKeyword => "username_keyword",
            Rule::NameKeyword => "name_keyword",
            Rule::UsernameWithoutName => "username_without_name",
        };
        write!(f, "{}", name)
    }
}

/// Outcome of classifying one participant record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Whether the record is treated as a channel.
    pub is_channel: bool,
    /// Rule that fired; `None` when nothing matched and the default
    /// (not a channel) applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<Rule>,
}

impl Classification {
    fn channel(rule: Rule) -> Self {
        Classification {
            is_channel: true,
            rule: Some(rule),
        }
    }

    fn not_channel(rule: Option<Rule>) -> Self {
        Classification {
            is_channel: false,
            rule,
        }
    }
}

/// Classify one participant record.
///
/// Pure over the record: no I/O, no shared state, deterministic. A record
/// satisfying several rules reports the strongest one.
pub fn classify(record: &ParticipantRecord) -> Classification {
    if record.bot {
        return Classification::not_channel(Some(Rule::BotExclusion));
    }

    if record.channel_entity {
        return Classification::channel(Rule::ExplicitType);
    }

    if record.members_count.is_some_and(|count| count > 0) {
        return Classification::channel(Rule::MemberCount);
    }

    if record.verified {
        return Classification::channel(Rule::Verified);
    }

    let username = non_empty(&record.username);
    let first = non_empty(&record.first_name);
    let last = non_empty(&record.last_name);

    if non_empty(&record.title).is_some() && first.is_none() && last.is_none() {
        return Classification::channel(Rule::TitleWithoutName);
    }

    if let Some(handle) = username {
        let lowered = handle.to_lowercase();
        if USERNAME_KEYWORDS.iter().any(|kw| lowered.contains(kw)) {
            return Classification::channel(Rule::UsernameKeyword);
        }
    }

    let full_name = match (first, last) {
        (Some(first), Some(last)) => format!("{} {}", first, last),
        (Some(first), None) => first.to_string(),
        (None, Some(last)) => last.to_string(),
        (None, None) => String::new(),
    };
    let full_name = full_name.trim().to_lowercase();
    if !full_name.is_empty() && NAME_KEYWORDS.iter().any(|kw| full_name.contains(kw)) {
        return Classification::channel(Rule::NameKeyword);
    }

    if first.is_none() && last.is_none() && username.is_some() {
        return Classification::channel(Rule::UsernameWithoutName);
    }

    Classification::not_channel(None)
}
