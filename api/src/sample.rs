//! Built-in snapshot served when no source URL is configured, so the UI has
//! something to show without any network access.
use crate::{Id, League, Match, MatchStatus, TeamSide};
use chrono::{DateTime, Duration, Utc};
use std::sync::LazyLock;

/// Kickoffs are relative to the first time the set is requested and then
/// frozen, so every call hands back the same content.
static SAMPLE_MATCHES: LazyLock<Vec<Match>> = LazyLock::new(|| build(Utc::now()));

/// Independent copy of the sample set. Callers may mutate it freely.
pub fn sample_matches() -> Vec<Match> {
    SAMPLE_MATCHES.clone()
}

fn league(id: i64, name: &str, country: &str) -> League {
    League {
        id: Id::Number(id),
        name: name.to_owned(),
        country: Some(country.to_owned()),
        season: Some("2026/27".to_owned()),
    }
}

fn team(id: i64, name: &str, short: &str, score: Option<u32>) -> TeamSide {
    TeamSide {
        name: name.to_owned(),
        short: Some(short.to_owned()),
        id: Some(Id::Number(id)),
        score,
    }
}

fn build(anchor: DateTime<Utc>) -> Vec<Match> {
    let premier = league(39, "Premier League", "England");
    let la_liga = league(140, "La Liga", "Spain");
    let serie_a = league(135, "Serie A", "Italy");

    vec![
        Match {
            id: Id::Number(1001),
            kickoff: anchor - Duration::minutes(67),
            status: MatchStatus::Live,
            league: premier.clone(),
            home: team(11, "Arbor FC", "ARB", Some(2)),
            away: team(12, "Seaside United", "SEA", Some(1)),
            minute: Some(67),
            added_time: None,
            venue: Some("Arbor Park".to_owned()),
        },
        Match {
            id: Id::Number(1002),
            kickoff: anchor - Duration::minutes(50),
            status: MatchStatus::HalfTime,
            league: la_liga.clone(),
            home: team(21, "Valle Verde", "VAL", Some(0)),
            away: team(22, "Puerto Real CF", "PRC", Some(0)),
            minute: Some(45),
            added_time: Some("+3".to_owned()),
            venue: Some("Estadio del Valle".to_owned()),
        },
        Match {
            id: Id::Number(1003),
            kickoff: anchor + Duration::minutes(90),
            status: MatchStatus::NotStarted,
            league: premier,
            home: team(13, "Northgate Rovers", "NGR", None),
            away: team(14, "Kingsbridge Athletic", "KBA", None),
            minute: None,
            added_time: None,
            venue: Some("Northgate Lane".to_owned()),
        },
        Match {
            id: Id::Number(1004),
            kickoff: anchor + Duration::hours(26),
            status: MatchStatus::NotStarted,
            league: serie_a.clone(),
            home: team(31, "Monte Alto", "MAL", None),
            away: team(32, "Lago Azzurro", "LAZ", None),
            minute: None,
            added_time: None,
            venue: None,
        },
        Match {
            id: Id::Number(1005),
            kickoff: anchor - Duration::hours(20),
            status: MatchStatus::FullTime,
            league: serie_a,
            home: team(33, "Torre Bianca", "TBI", Some(3)),
            away: team(34, "Riva Nord", "RVN", Some(3)),
            minute: Some(90),
            added_time: None,
            venue: Some("Stadio della Torre".to_owned()),
        },
    ]
}
