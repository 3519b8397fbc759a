use chrono::{DateTime, Local};
use log::{debug, warn};
use scoreline_api::Match;

/// Everything that can write the current match list, in the order it was
/// received by the UI loop. Each event is tagged with the generation of the
/// source activation that produced it.
#[derive(Debug, Clone)]
pub enum FeedEvent {
    RefreshStarted {
        generation: u64,
    },
    RefreshSucceeded {
        generation: u64,
        matches: Vec<Match>,
        completed_at: DateTime<Local>,
    },
    RefreshFailed {
        generation: u64,
        message: String,
    },
    LiveConnected {
        generation: u64,
    },
    LiveSnapshot {
        generation: u64,
        matches: Vec<Match>,
    },
    LiveWarning {
        generation: u64,
        message: String,
    },
}

impl FeedEvent {
    pub fn generation(&self) -> u64 {
        match self {
            FeedEvent::RefreshStarted { generation }
            | FeedEvent::RefreshSucceeded { generation, .. }
            | FeedEvent::RefreshFailed { generation, .. }
            | FeedEvent::LiveConnected { generation }
            | FeedEvent::LiveSnapshot { generation, .. }
            | FeedEvent::LiveWarning { generation, .. } => *generation,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PushStatus {
    #[default]
    Disabled,
    Connecting,
    Connected,
    /// Transport trouble. Shown as an indicator only, never as the feed error.
    Degraded(String),
}

/// The current match list and the status around it.
#[derive(Debug, Default)]
pub struct FeedState {
    pub matches: Vec<Match>,
    pub loading: bool,
    /// Last transport error from a refresh. Cleared by the next success.
    pub error: Option<String>,
    pub last_updated: Option<DateTime<Local>>,
    pub push: PushStatus,
    generation: u64,
    active: bool,
}

impl FeedState {
    /// Start a new source activation. Results from any earlier activation
    /// are ignored from here on.
    pub fn activate(&mut self, push_enabled: bool) -> u64 {
        self.generation += 1;
        self.active = true;
        self.loading = false;
        self.push = if push_enabled { PushStatus::Connecting } else { PushStatus::Disabled };
        self.generation
    }

    /// Stop accepting results. Existing data is kept.
    pub fn deactivate(&mut self) {
        self.generation += 1;
        self.active = false;
        self.loading = false;
        self.push = PushStatus::Disabled;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Apply one event. Returns false when the event was stale and dropped.
    pub fn apply(&mut self, event: FeedEvent) -> bool {
        if !self.active || event.generation() != self.generation {
            debug!(
                "discarding stale feed event (gen {} vs current {})",
                event.generation(),
                self.generation
            );
            return false;
        }

        match event {
            FeedEvent::RefreshStarted { .. } => self.loading = true,
            FeedEvent::RefreshSucceeded { matches, completed_at, .. } => {
                self.matches = matches;
                self.error = None;
                self.last_updated = Some(completed_at);
                self.loading = false;
            }
            FeedEvent::RefreshFailed { message, .. } => {
                self.error = Some(message);
                self.loading = false;
            }
            FeedEvent::LiveConnected { .. } => self.push = PushStatus::Connected,
            FeedEvent::LiveSnapshot { matches, .. } => {
                self.matches = matches;
                self.push = PushStatus::Connected;
            }
            FeedEvent::LiveWarning { message, .. } => {
                warn!("push channel: {message}");
                self.push = PushStatus::Degraded(message);
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scoreline_api::sample::sample_matches;

    fn succeeded(generation: u64, matches: Vec<Match>) -> FeedEvent {
        FeedEvent::RefreshSucceeded { generation, matches, completed_at: Local::now() }
    }

    #[test]
    fn success_replaces_list_and_clears_loading() {
        let mut feed = FeedState::default();
        let g = feed.activate(false);

        assert!(feed.apply(FeedEvent::RefreshStarted { generation: g }));
        assert!(feed.loading);

        assert!(feed.apply(succeeded(g, sample_matches())));
        assert!(!feed.loading);
        assert_eq!(feed.matches.len(), 5);
        assert!(feed.error.is_none());
        assert!(feed.last_updated.is_some());
    }

    #[test]
    fn failure_keeps_previous_list_then_next_success_clears_error() {
        let mut feed = FeedState::default();
        let g = feed.activate(false);
        feed.apply(succeeded(g, sample_matches()));
        let first_update = feed.last_updated;

        feed.apply(FeedEvent::RefreshStarted { generation: g });
        feed.apply(FeedEvent::RefreshFailed { generation: g, message: "HTTP 503".into() });
        assert_eq!(feed.matches, sample_matches());
        assert_eq!(feed.error.as_deref(), Some("HTTP 503"));
        assert!(!feed.loading);
        assert_eq!(feed.last_updated, first_update);

        let mut next = sample_matches();
        next.truncate(2);
        feed.apply(FeedEvent::RefreshStarted { generation: g });
        feed.apply(succeeded(g, next));
        assert!(feed.error.is_none());
        assert_eq!(feed.matches.len(), 2);
    }

    #[test]
    fn result_arriving_after_deactivation_is_discarded() {
        let mut feed = FeedState::default();
        let g = feed.activate(false);
        feed.apply(FeedEvent::RefreshStarted { generation: g });

        feed.deactivate();
        assert!(!feed.loading);

        assert!(!feed.apply(succeeded(g, sample_matches())));
        assert!(feed.matches.is_empty());
        assert!(feed.last_updated.is_none());
        assert!(!feed.apply(FeedEvent::RefreshFailed { generation: g, message: "late".into() }));
        assert!(feed.error.is_none());
    }

    #[test]
    fn result_from_previous_activation_is_discarded() {
        let mut feed = FeedState::default();
        let old = feed.activate(false);
        let new = feed.activate(true);
        assert_ne!(old, new);

        assert!(!feed.apply(FeedEvent::LiveSnapshot { generation: old, matches: sample_matches() }));
        assert!(feed.matches.is_empty());
        assert!(feed.apply(FeedEvent::LiveSnapshot { generation: new, matches: sample_matches() }));
        assert_eq!(feed.matches.len(), 5);
    }

    #[test]
    fn last_writer_wins_between_refresh_and_push() {
        let mut feed = FeedState::default();
        let g = feed.activate(true);
        let mut pushed = sample_matches();
        pushed.truncate(1);

        feed.apply(succeeded(g, sample_matches()));
        feed.apply(FeedEvent::LiveSnapshot { generation: g, matches: pushed.clone() });
        assert_eq!(feed.matches, pushed);

        feed.apply(succeeded(g, sample_matches()));
        assert_eq!(feed.matches.len(), 5);
    }

    #[test]
    fn push_warning_never_touches_data_or_error() {
        let mut feed = FeedState::default();
        let g = feed.activate(true);
        assert_eq!(feed.push, PushStatus::Connecting);
        feed.apply(succeeded(g, sample_matches()));

        feed.apply(FeedEvent::LiveWarning { generation: g, message: "connection refused".into() });
        assert_eq!(feed.matches.len(), 5);
        assert!(feed.error.is_none());
        assert_eq!(feed.push, PushStatus::Degraded("connection refused".into()));

        feed.apply(FeedEvent::LiveConnected { generation: g });
        assert_eq!(feed.push, PushStatus::Connected);
    }
}
