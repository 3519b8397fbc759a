use crate::state::favorites::Favorites;
use chrono::{DateTime, TimeZone};
use scoreline_api::Match;
use std::collections::BTreeSet;

/// Group label for matches whose league has no name.
pub const FALLBACK_LEAGUE: &str = "Other";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LeagueFilter {
    #[default]
    All,
    Named(String),
}

impl LeagueFilter {
    fn admits(&self, league_name: &str) -> bool {
        match self {
            LeagueFilter::All => true,
            LeagueFilter::Named(name) => same_league(league_name, name),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            LeagueFilter::All => "All leagues",
            LeagueFilter::Named(name) => name,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateRange {
    #[default]
    Today,
    All,
}

impl DateRange {
    pub fn toggle(self) -> Self {
        match self {
            DateRange::Today => DateRange::All,
            DateRange::All => DateRange::Today,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DateRange::Today => "Today",
            DateRange::All => "All dates",
        }
    }
}

/// Everything the scoreboard is filtered by.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewQuery {
    pub live_only: bool,
    pub league: LeagueFilter,
    pub date: DateRange,
    pub search: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchRow<'a> {
    pub item: &'a Match,
    pub favorite: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeagueGroup<'a> {
    pub league: String,
    pub rows: Vec<MatchRow<'a>>,
}

/// Filter, sort and group `matches` for display.
///
/// Filters apply in order: live-only, league, date, search. Survivors are
/// sorted by kickoff (stable), then grouped by league name with groups in
/// order of first appearance. "Today" is the calendar day of `now` in
/// `now`'s own timezone.
pub fn derive_view<'a, Tz: TimeZone>(
    matches: &'a [Match],
    query: &ViewQuery,
    favorites: &Favorites,
    now: &DateTime<Tz>,
) -> Vec<LeagueGroup<'a>> {
    let needle = query.search.trim().to_lowercase();
    let today = now.date_naive();
    let tz = now.timezone();

    let mut kept: Vec<&Match> = matches
        .iter()
        .filter(|m| !query.live_only || m.is_live())
        .filter(|m| query.league.admits(&m.league.name))
        .filter(|m| match query.date {
            DateRange::All => true,
            DateRange::Today => m.kickoff.with_timezone(&tz).date_naive() == today,
        })
        .filter(|m| needle.is_empty() || matches_search(m, &needle))
        .collect();

    kept.sort_by_key(|m| m.kickoff);

    let mut groups: Vec<LeagueGroup<'a>> = Vec::new();
    for m in kept {
        let league = league_label(m);
        let row = MatchRow { item: m, favorite: favorites.is_favorite_match(m) };
        match groups.iter_mut().find(|g| g.league == league) {
            Some(group) => group.rows.push(row),
            None => groups.push(LeagueGroup { league: league.to_owned(), rows: vec![row] }),
        }
    }
    groups
}

/// Distinct league names in the unfiltered list, alphabetical.
pub fn league_options(matches: &[Match]) -> Vec<String> {
    matches
        .iter()
        .map(|m| m.league.name.trim())
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// League names compare trimmed and case-insensitively, the same way the
/// options and group labels are built.
pub fn same_league(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

fn league_label(m: &Match) -> &str {
    let name = m.league.name.trim();
    if name.is_empty() { FALLBACK_LEAGUE } else { name }
}

/// `needle` must already be trimmed and lower-cased.
fn matches_search(m: &Match, needle: &str) -> bool {
    [
        Some(m.home.name.as_str()),
        Some(m.away.name.as_str()),
        Some(m.league.name.as_str()),
        m.league.country.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset, Utc};
    use scoreline_api::{Id, League, MatchStatus, TeamSide};

    fn fixture(id: i64, home: &str, away: &str, league: &str, kickoff: DateTime<Utc>) -> Match {
        Match {
            id: Id::Number(id),
            kickoff,
            status: MatchStatus::NotStarted,
            league: League {
                id: Id::Number(1),
                name: league.into(),
                country: Some("England".into()),
                season: None,
            },
            home: TeamSide { name: home.into(), ..Default::default() },
            away: TeamSide { name: away.into(), ..Default::default() },
            minute: None,
            added_time: None,
            venue: None,
        }
    }

    fn all_dates() -> ViewQuery {
        ViewQuery { date: DateRange::All, ..ViewQuery::default() }
    }

    fn ids(groups: &[LeagueGroup<'_>]) -> Vec<String> {
        groups
            .iter()
            .flat_map(|g| g.rows.iter().map(|r| r.item.id.to_string()))
            .collect()
    }

    #[test]
    fn sorts_by_kickoff_ascending() {
        let now = Utc::now();
        let matches = vec![
            fixture(1, "A", "B", "Premier League", now + Duration::minutes(30)),
            fixture(2, "C", "D", "Premier League", now - Duration::minutes(10)),
            fixture(3, "E", "F", "Premier League", now + Duration::minutes(120)),
        ];
        let groups = derive_view(&matches, &all_dates(), &Favorites::default(), &now);
        assert_eq!(ids(&groups), vec!["2", "1", "3"]);
    }

    #[test]
    fn live_only_keeps_live_and_half_time() {
        let now = Utc::now();
        let statuses = [
            MatchStatus::NotStarted,
            MatchStatus::Live,
            MatchStatus::HalfTime,
            MatchStatus::FullTime,
            MatchStatus::ExtraTime,
            MatchStatus::Postponed,
        ];
        let matches: Vec<Match> = statuses
            .iter()
            .enumerate()
            .map(|(i, status)| Match {
                status: *status,
                ..fixture(i as i64, "A", "B", "L", now)
            })
            .collect();

        let query = ViewQuery { live_only: true, ..all_dates() };
        let groups = derive_view(&matches, &query, &Favorites::default(), &now);
        let kept: Vec<MatchStatus> =
            groups.iter().flat_map(|g| g.rows.iter().map(|r| r.item.status)).collect();
        assert_eq!(kept, vec![MatchStatus::Live, MatchStatus::HalfTime]);
    }

    #[test]
    fn search_matches_team_names_case_insensitively() {
        let now = Utc::now();
        let mut seaside = fixture(2, "Seaside United", "Northgate", "Premier League", now);
        seaside.league.country = None;
        let matches = vec![fixture(1, "Arbor FC", "Northgate", "Premier League", now), seaside];

        let query = ViewQuery { search: "  ARB ".into(), ..all_dates() };
        let groups = derive_view(&matches, &query, &Favorites::default(), &now);
        assert_eq!(ids(&groups), vec!["1"]);
    }

    #[test]
    fn search_covers_league_name_and_country() {
        let now = Utc::now();
        let mut spanish = fixture(1, "A", "B", "La Liga", now);
        spanish.league.country = Some("Spain".into());
        let english = fixture(2, "C", "D", "Premier League", now);
        let matches = vec![spanish, english];

        let by_country = ViewQuery { search: "spain".into(), ..all_dates() };
        assert_eq!(ids(&derive_view(&matches, &by_country, &Favorites::default(), &now)), vec!["1"]);

        let by_league = ViewQuery { search: "premier".into(), ..all_dates() };
        assert_eq!(ids(&derive_view(&matches, &by_league, &Favorites::default(), &now)), vec!["2"]);
    }

    #[test]
    fn league_filter_is_case_insensitive_and_all_passes_everything() {
        let now = Utc::now();
        let matches = vec![
            fixture(1, "A", "B", "Premier League", now),
            fixture(2, "C", "D", "Serie A", now),
        ];
        let query = ViewQuery {
            league: LeagueFilter::Named("premier league".into()),
            ..all_dates()
        };
        assert_eq!(ids(&derive_view(&matches, &query, &Favorites::default(), &now)), vec!["1"]);
        assert_eq!(ids(&derive_view(&matches, &all_dates(), &Favorites::default(), &now)).len(), 2);
    }

    #[test]
    fn today_uses_the_calendar_day_of_now_in_its_timezone() {
        // 23:30 in UTC+2 is 21:30 UTC on the same day.
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let now = tz.with_ymd_and_hms(2026, 10, 19, 23, 30, 0).unwrap();
        let at = |h: u32, mi: u32| Utc.with_ymd_and_hms(2026, 10, 19, h, mi, 0).unwrap();

        let matches = vec![
            // 23:45 local on the 19th.
            fixture(1, "A", "B", "L", at(21, 45)),
            // 00:15 local on the 20th.
            fixture(2, "C", "D", "L", at(22, 15)),
            // 01:00 local on the 19th, but 23:00 UTC on the 18th.
            fixture(3, "E", "F", "L", Utc.with_ymd_and_hms(2026, 10, 18, 23, 0, 0).unwrap()),
        ];
        let query = ViewQuery { date: DateRange::Today, ..ViewQuery::default() };
        let groups = derive_view(&matches, &query, &Favorites::default(), &now);
        assert_eq!(ids(&groups), vec!["3", "1"]);
    }

    #[test]
    fn groups_follow_first_appearance_after_sorting() {
        let now = Utc::now();
        let matches = vec![
            fixture(1, "A", "B", "Serie A", now + Duration::hours(2)),
            fixture(2, "C", "D", "Premier League", now + Duration::hours(1)),
            fixture(3, "E", "F", "", now + Duration::hours(3)),
            fixture(4, "G", "H", "Premier League", now + Duration::hours(4)),
        ];
        let groups = derive_view(&matches, &all_dates(), &Favorites::default(), &now);
        let leagues: Vec<&str> = groups.iter().map(|g| g.league.as_str()).collect();
        assert_eq!(leagues, vec!["Premier League", "Serie A", FALLBACK_LEAGUE]);
        assert_eq!(groups[0].rows.len(), 2);
        assert_eq!(groups[0].rows[1].item.id, Id::Number(4));
    }

    #[test]
    fn rows_carry_favorite_flag() {
        let now = Utc::now();
        let matches = vec![
            fixture(1, "Arbor FC", "Seaside United", "L", now),
            fixture(2, "Northgate", "Kingsbridge", "L", now + Duration::minutes(1)),
        ];
        let mut favorites = Favorites::default();
        favorites.toggle_match(&matches[0]);

        let groups = derive_view(&matches, &all_dates(), &favorites, &now);
        let flags: Vec<bool> = groups[0].rows.iter().map(|r| r.favorite).collect();
        assert_eq!(flags, vec![true, false]);
    }

    #[test]
    fn deriving_twice_gives_identical_output() {
        let now = Utc::now();
        let matches = scoreline_api::sample::sample_matches();
        let query = ViewQuery { search: "a".into(), ..all_dates() };
        let favorites = Favorites::default();
        assert_eq!(
            derive_view(&matches, &query, &favorites, &now),
            derive_view(&matches, &query, &favorites, &now)
        );
    }

    #[test]
    fn league_options_come_from_unfiltered_list() {
        let now = Utc::now();
        let matches = vec![
            fixture(1, "A", "B", "Serie A", now),
            fixture(2, "C", "D", "La Liga", now),
            fixture(3, "E", "F", "Serie A", now),
            fixture(4, "G", "H", "", now),
        ];
        assert_eq!(league_options(&matches), vec!["La Liga", "Serie A"]);
    }

    #[test]
    fn offered_league_option_selects_padded_league() {
        let now = Utc::now();
        let matches = vec![
            fixture(1, "A", "B", "Premier League ", now),
            fixture(2, "C", "D", "Premier League", now),
            fixture(3, "E", "F", "Serie A", now),
        ];
        let options = league_options(&matches);
        assert_eq!(options, vec!["Premier League", "Serie A"]);

        let query = ViewQuery { league: LeagueFilter::Named(options[0].clone()), ..all_dates() };
        let groups = derive_view(&matches, &query, &Favorites::default(), &now);
        assert_eq!(groups.len(), 1);
        assert_eq!(ids(&groups), vec!["1", "2"]);
    }

    #[test]
    fn same_league_ignores_padding_and_unicode_case() {
        assert!(same_league("  Süper Lig ", "SÜPER LIG"));
        assert!(!same_league("Süper Lig", "Serie A"));
    }
}
