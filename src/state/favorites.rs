use crate::state::storage::KeyValueStore;
use log::{error, warn};
use scoreline_api::Match;
use std::collections::BTreeSet;

pub const FAVORITES_KEY: &str = "favorites";

/// Favorited team names.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Favorites {
    teams: BTreeSet<String>,
}

impl Favorites {
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let Some(raw) = store.get(FAVORITES_KEY) else {
            return Self::default();
        };
        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(names) => Self { teams: names.into_iter().collect() },
            Err(e) => {
                warn!("stored favorites unreadable ({e}), starting empty");
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) {
        let names: Vec<&str> = self.teams.iter().map(String::as_str).collect();
        let payload = match serde_json::to_string(&names) {
            Ok(p) => p,
            Err(e) => {
                error!("serialize favorites failed: {e}");
                return;
            }
        };
        if let Err(e) = store.set(FAVORITES_KEY, &payload) {
            error!("write favorites failed: {e}");
        }
    }

    /// Flip each of the match's two team names on its own: a name that is
    /// present is removed, an absent one is added. Toggling a match where
    /// only one side is a favorite therefore swaps which side is.
    pub fn toggle_match(&mut self, m: &Match) {
        for name in m.team_names() {
            if !self.teams.remove(name) {
                self.teams.insert(name.to_owned());
            }
        }
    }

    /// A match counts as favorited when either side is.
    pub fn is_favorite_match(&self, m: &Match) -> bool {
        m.team_names().iter().any(|name| self.teams.contains(*name))
    }

    #[cfg(test)]
    pub fn contains(&self, team: &str) -> bool {
        self.teams.contains(team)
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::storage::MemoryStore;
    use scoreline_api::sample::sample_matches;

    fn arbor_v_seaside() -> Match {
        let m = sample_matches().remove(0);
        assert_eq!(m.team_names(), ["Arbor FC", "Seaside United"]);
        m
    }

    #[test]
    fn toggling_twice_adds_then_removes_both_teams() {
        let m = arbor_v_seaside();
        let mut favorites = Favorites::default();

        favorites.toggle_match(&m);
        assert!(favorites.contains("Arbor FC"));
        assert!(favorites.contains("Seaside United"));
        assert!(favorites.is_favorite_match(&m));

        favorites.toggle_match(&m);
        assert!(favorites.is_empty());
        assert!(!favorites.is_favorite_match(&m));
    }

    #[test]
    fn toggle_flips_each_side_independently() {
        let m = arbor_v_seaside();
        let mut favorites = Favorites::default();
        favorites.teams.insert("Arbor FC".into());

        favorites.toggle_match(&m);
        assert!(!favorites.contains("Arbor FC"));
        assert!(favorites.contains("Seaside United"));
        assert!(favorites.is_favorite_match(&m));
    }

    #[test]
    fn persists_as_json_array_of_names() {
        let mut store = MemoryStore::new();
        let mut favorites = Favorites::default();
        favorites.toggle_match(&arbor_v_seaside());
        favorites.save(&mut store);

        assert_eq!(
            store.get(FAVORITES_KEY).as_deref(),
            Some(r#"["Arbor FC","Seaside United"]"#)
        );
        assert_eq!(Favorites::load(&store), favorites);
    }

    #[test]
    fn corrupt_favorites_load_empty() {
        let store = MemoryStore::new().with(FAVORITES_KEY, r#"{"teams": 3}"#);
        assert!(Favorites::load(&store).is_empty());
    }
}
