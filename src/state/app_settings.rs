use crate::state::storage::KeyValueStore;
use log::{LevelFilter, error, warn};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const SETTINGS_KEY: &str = "settings";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

/// Per-session display options that are never persisted.
#[derive(Debug, Default, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
}

impl AppSettings {
    pub fn load() -> Self {
        let log_level = std::env::var("SCORELINE_LOG")
            .ok()
            .and_then(|v| v.trim().parse::<LevelFilter>().ok());
        Self { full_screen: false, log_level }
    }
}

/// User configuration, persisted on every change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Empty means "use the built-in sample data".
    pub source_url: String,
    pub api_key: String,
    pub push_url: String,
    /// Zero disables periodic polling.
    pub poll_interval_secs: u64,
    pub show_only_live: bool,
    pub compact: bool,
    /// Informational only; kickoffs are always shown in local time.
    pub timezone: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source_url: String::new(),
            api_key: String::new(),
            push_url: String::new(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            show_only_live: false,
            compact: false,
            timezone: "Local".to_owned(),
        }
    }
}

/// The part of [`Settings`] that drives the refresh loop and push channel.
/// Any change here restarts both.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceConfig {
    pub source_url: String,
    pub api_key: String,
    pub push_url: String,
    pub poll_interval: Duration,
}

impl SourceConfig {
    pub fn push_enabled(&self) -> bool {
        !self.push_url.trim().is_empty()
    }
}

impl Settings {
    /// Read settings from the store. Missing or corrupt data yields defaults.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let Some(raw) = store.get(SETTINGS_KEY) else {
            return Self::default();
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("stored settings unreadable ({e}), using defaults");
            Self::default()
        })
    }

    /// Persist settings. Failure is logged, never fatal.
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        let payload = match serde_json::to_string_pretty(self) {
            Ok(p) => p,
            Err(e) => {
                error!("serialize settings failed: {e}");
                return;
            }
        };
        if let Err(e) = store.set(SETTINGS_KEY, &payload) {
            error!("write settings failed: {e}");
        }
    }

    /// Layer `SCORELINE_*` environment values over the stored settings.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("SCORELINE_SOURCE_URL") {
            self.source_url = url;
        }
        if let Some(key) = lookup("SCORELINE_API_KEY") {
            self.api_key = key;
        }
        if let Some(url) = lookup("SCORELINE_PUSH_URL") {
            self.push_url = url;
        }
        if let Some(secs) = lookup("SCORELINE_POLL_SECS").and_then(|s| s.trim().parse().ok()) {
            self.poll_interval_secs = secs;
        }
    }

    pub fn source(&self) -> SourceConfig {
        SourceConfig {
            source_url: self.source_url.trim().to_owned(),
            api_key: self.api_key.trim().to_owned(),
            push_url: self.push_url.trim().to_owned(),
            poll_interval: Duration::from_secs(self.poll_interval_secs),
        }
    }
}

// ---------------------------------------------------------------------------
// Editable fields on the Settings tab
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    SourceUrl,
    ApiKey,
    PushUrl,
    PollInterval,
}

impl SettingsField {
    pub const ALL: [SettingsField; 4] = [
        SettingsField::SourceUrl,
        SettingsField::ApiKey,
        SettingsField::PushUrl,
        SettingsField::PollInterval,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SettingsField::SourceUrl => "Source URL",
            SettingsField::ApiKey => "API key",
            SettingsField::PushUrl => "Push URL",
            SettingsField::PollInterval => "Poll interval (s)",
        }
    }

    pub fn value(&self, settings: &Settings) -> String {
        match self {
            SettingsField::SourceUrl => settings.source_url.clone(),
            SettingsField::ApiKey => settings.api_key.clone(),
            SettingsField::PushUrl => settings.push_url.clone(),
            SettingsField::PollInterval => settings.poll_interval_secs.to_string(),
        }
    }

    /// Write `input` into the field. Only the interval can be rejected.
    pub fn apply(&self, settings: &mut Settings, input: &str) -> Result<(), String> {
        let input = input.trim();
        match self {
            SettingsField::SourceUrl => settings.source_url = input.to_owned(),
            SettingsField::ApiKey => settings.api_key = input.to_owned(),
            SettingsField::PushUrl => settings.push_url = input.to_owned(),
            SettingsField::PollInterval => {
                settings.poll_interval_secs = input
                    .parse()
                    .map_err(|_| format!("poll interval must be whole seconds, got {input:?}"))?;
            }
        }
        Ok(())
    }
}
