pub mod client;
pub mod sample;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Domain types — the snapshot shape shared by the REST source and push channel
// ---------------------------------------------------------------------------

/// Provider identifier. Some feeds send numbers, others strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Number(i64),
    Text(String),
}

impl Default for Id {
    fn default() -> Self {
        Id::Number(0)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Number(n) => write!(f, "{n}"),
            Id::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: Id,
    pub kickoff: DateTime<Utc>,
    #[serde(default)]
    pub status: MatchStatus,
    #[serde(default)]
    pub league: League,
    pub home: TeamSide,
    pub away: TeamSide,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minute: Option<u16>,
    /// Stoppage annotation as sent by the provider, e.g. "+2".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
}

impl Match {
    pub fn is_live(&self) -> bool {
        self.status.is_live()
    }

    /// Both team names, home first.
    pub fn team_names(&self) -> [&str; 2] {
        [self.home.name.as_str(), self.away.name.as_str()]
    }

    /// "2 - 1" once the match has started, blank before. A missing side is
    /// shown as zero so a half-populated record still renders.
    pub fn score_line(&self) -> String {
        if self.status == MatchStatus::NotStarted
            || (self.home.score.is_none() && self.away.score.is_none())
        {
            return String::new();
        }
        format!(
            "{} - {}",
            self.home.score.unwrap_or_default(),
            self.away.score.unwrap_or_default()
        )
    }

    /// Clock text for running matches: "67'" or "45+2'".
    pub fn clock(&self) -> Option<String> {
        if !matches!(
            self.status,
            MatchStatus::Live | MatchStatus::ExtraTime | MatchStatus::Penalties
        ) {
            return None;
        }
        let minute = self.minute?;
        Some(match self.added_time.as_deref().map(str::trim) {
            Some(added) if !added.is_empty() => format!("{minute}{added}'"),
            _ => format!("{minute}'"),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct League {
    #[serde(default)]
    pub id: Id,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamSide {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
}

impl TeamSide {
    /// Short code if the provider sent one, otherwise the full name.
    pub fn label(&self, compact: bool) -> &str {
        match self.short.as_deref() {
            Some(short) if compact && !short.is_empty() => short,
            _ => &self.name,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchStatus {
    #[default]
    #[serde(rename = "NS")]
    NotStarted,
    #[serde(rename = "LIVE")]
    Live,
    #[serde(rename = "HT")]
    HalfTime,
    #[serde(rename = "FT")]
    FullTime,
    #[serde(rename = "ET")]
    ExtraTime,
    #[serde(rename = "PEN")]
    Penalties,
    #[serde(rename = "PST")]
    Postponed,
    #[serde(rename = "SUSP")]
    Suspended,
    #[serde(rename = "INT")]
    Interrupted,
    #[serde(rename = "ABD")]
    Abandoned,
    #[serde(rename = "CANC")]
    Cancelled,
    /// Any code this client does not know about.
    #[serde(other, rename = "UNKNOWN")]
    Unknown,
}

impl MatchStatus {
    /// Statuses the live-only filter keeps.
    pub fn is_live(&self) -> bool {
        matches!(self, MatchStatus::Live | MatchStatus::HalfTime)
    }

    pub fn code(&self) -> &'static str {
        match self {
            MatchStatus::NotStarted => "NS",
            MatchStatus::Live => "LIVE",
            MatchStatus::HalfTime => "HT",
            MatchStatus::FullTime => "FT",
            MatchStatus::ExtraTime => "ET",
            MatchStatus::Penalties => "PEN",
            MatchStatus::Postponed => "PST",
            MatchStatus::Suspended => "SUSP",
            MatchStatus::Interrupted => "INT",
            MatchStatus::Abandoned => "ABD",
            MatchStatus::Cancelled => "CANC",
            MatchStatus::Unknown => "?",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MatchStatus::NotStarted => "Not started",
            MatchStatus::Live => "Live",
            MatchStatus::HalfTime => "Half-time",
            MatchStatus::FullTime => "Full-time",
            MatchStatus::ExtraTime => "Extra time",
            MatchStatus::Penalties => "Penalties",
            MatchStatus::Postponed => "Postponed",
            MatchStatus::Suspended => "Suspended",
            MatchStatus::Interrupted => "Interrupted",
            MatchStatus::Abandoned => "Abandoned",
            MatchStatus::Cancelled => "Cancelled",
            MatchStatus::Unknown => "Unknown",
        }
    }
}
