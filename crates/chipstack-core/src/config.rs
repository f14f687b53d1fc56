//! TOML-based application configuration.
//!
//! Stores:
//! - Timer tick interval
//! - Session preset lengths and the break length
//! - Chip formula constants
//! - An optional custom rank table
//! - Notification preferences
//!
//! Configuration is stored at `~/.config/chipstack/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{ConfigError, ScoringError};
use crate::scoring::{ChipPolicy, Rank, RankTable};
use crate::session_type::SessionType;

/// Returns the data directory, creating it if needed.
///
/// `CHIPSTACK_HOME` wins when set. Otherwise `~/.config/chipstack`, or
/// `~/.config/chipstack-dev` with `CHIPSTACK_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("CHIPSTACK_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("CHIPSTACK_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("chipstack-dev")
            } else {
                base_dir.join("chipstack")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

/// Timer engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Progress report period. Accuracy does not depend on it.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

/// Session preset lengths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionsConfig {
    #[serde(default = "default_quick_hand")]
    pub quick_hand: u32,
    #[serde(default = "default_standard")]
    pub standard: u32,
    #[serde(default = "default_deep_stack")]
    pub deep_stack: u32,
    #[serde(default = "default_test_hand_seconds")]
    pub test_hand_seconds: u32,
    #[serde(default = "default_break_minutes")]
    pub break_minutes: u32,
}

/// Notification configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Ring the terminal bell when a countdown completes.
    #[serde(default = "default_true")]
    pub alarm: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/chipstack/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub sessions: SessionsConfig,
    #[serde(default)]
    pub scoring: ChipPolicy,
    /// Custom rank table; the standard twelve ranks when absent.
    #[serde(default)]
    pub ranks: Option<Vec<Rank>>,
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

// Default functions
fn default_tick_interval_ms() -> u64 {
    100
}
fn default_quick_hand() -> u32 {
    15
}
fn default_standard() -> u32 {
    25
}
fn default_deep_stack() -> u32 {
    50
}
fn default_test_hand_seconds() -> u32 {
    10
}
fn default_break_minutes() -> u32 {
    5
}
fn default_true() -> bool {
    true
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            quick_hand: default_quick_hand(),
            standard: default_standard(),
            deep_stack: default_deep_stack(),
            test_hand_seconds: default_test_hand_seconds(),
            break_minutes: default_break_minutes(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self { alarm: true }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timer: TimerConfig::default(),
            sessions: SessionsConfig::default(),
            scoring: ChipPolicy::standard(),
            ranks: None,
            notifications: NotificationsConfig::default(),
        }
    }
}

impl TimerConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl SessionsConfig {
    /// Length of `session_type` in seconds, honoring overrides.
    pub fn duration_secs(&self, session_type: SessionType) -> u64 {
        match session_type {
            SessionType::QuickHand => u64::from(self.quick_hand) * 60,
            SessionType::Standard => u64::from(self.standard) * 60,
            SessionType::DeepStack => u64::from(self.deep_stack) * 60,
            SessionType::TestHand => u64::from(self.test_hand_seconds),
        }
    }

    pub fn break_secs(&self) -> u64 {
        u64::from(self.break_minutes) * 60
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(ConfigError::UnknownKey(key.to_string()));
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as a whole number")))?;
                        serde_json::Value::Number(n.into())
                    }
                    serde_json::Value::Null
                    | serde_json::Value::Object(_)
                    | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    serde_json::Value::String(_) => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        }

        Err(ConfigError::UnknownKey(key.to_string()))
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing defaults the first time.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or
    /// parsed, fails validation, or if the default config cannot be written.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content)?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Check the scoring section and rank table.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scoring
            .validate()
            .map_err(|e| ConfigError::InvalidValue {
                key: "scoring".into(),
                message: e.to_string(),
            })?;
        self.rank_table().map_err(|e| ConfigError::InvalidValue {
            key: "ranks".into(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// The configured rank table, or the standard one.
    pub fn rank_table(&self) -> Result<RankTable, ScoringError> {
        match &self.ranks {
            Some(ranks) => RankTable::new(ranks.clone()),
            None => Ok(RankTable::standard().clone()),
        }
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key and save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed or
    /// fails validation, or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let updated = self.with_value(key, value)?;
        updated.save()?;
        *self = updated;
        Ok(())
    }

    fn with_value(&self, key: &str, value: &str) -> Result<Self, ConfigError> {
        let mut json =
            serde_json::to_value(self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn empty_file_yields_defaults() {
        let parsed: Config = toml::from_str("").unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn partial_sections_fill_defaults() {
        let parsed: Config = toml::from_str(
            r#"
            [sessions]
            standard = 30

            [scoring]
            minimum_minutes = 0
            "#,
        )
        .unwrap();
        assert_eq!(parsed.sessions.standard, 30);
        assert_eq!(parsed.sessions.quick_hand, 15);
        assert_eq!(parsed.scoring.minimum_minutes, 0);
        assert_eq!(parsed.scoring.bonus_per_star, 20);
    }

    #[test]
    fn custom_rank_table_from_toml() {
        let parsed: Config = toml::from_str(
            r#"
            [[ranks]]
            name = "Bronze"
            min_chips = 0

            [[ranks]]
            name = "Silver"
            min_chips = 1000
            "#,
        )
        .unwrap();
        let table = parsed.rank_table().unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rank_for(1_500).name, "Silver");
    }

    #[test]
    fn invalid_rank_table_fails_validation() {
        let cfg = Config {
            ranks: Some(vec![Rank::new("Late", 50, "", "")]),
            ..Config::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidValue { ref key, .. }) if key == "ranks"
        ));
    }

    #[test]
    fn session_durations_honor_overrides() {
        let mut sessions = SessionsConfig::default();
        assert_eq!(sessions.duration_secs(SessionType::Standard), 1_500);
        assert_eq!(sessions.duration_secs(SessionType::TestHand), 10);
        sessions.deep_stack = 90;
        assert_eq!(sessions.duration_secs(SessionType::DeepStack), 5_400);
        assert_eq!(sessions.break_secs(), 300);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("timer.tick_interval_ms").as_deref(), Some("100"));
        assert_eq!(cfg.get("notifications.alarm").as_deref(), Some("true"));
        assert_eq!(cfg.get("scoring.bonus_per_star").as_deref(), Some("20"));
        assert!(cfg.get("sessions.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn with_value_updates_nested_number() {
        let cfg = Config::default();
        let updated = cfg.with_value("sessions.standard", "30").unwrap();
        assert_eq!(updated.sessions.standard, 30);
    }

    #[test]
    fn with_value_updates_nested_bool() {
        let updated = Config::default()
            .with_value("notifications.alarm", "false")
            .unwrap();
        assert!(!updated.notifications.alarm);
    }

    #[test]
    fn with_value_rejects_unknown_key() {
        let result = Config::default().with_value("sessions.nonexistent", "1");
        assert!(matches!(result, Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn with_value_rejects_invalid_type() {
        let result = Config::default().with_value("notifications.alarm", "loud");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
        let result = Config::default().with_value("sessions.standard", "-5");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn with_value_rejects_invalid_policy() {
        let result = Config::default().with_value("scoring.reference_minutes", "0");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn with_value_sets_rank_table_from_json() {
        let updated = Config::default()
            .with_value(
                "ranks",
                r#"[{"name":"Rookie","min_chips":0},{"name":"Veteran","min_chips":10}]"#,
            )
            .unwrap();
        assert_eq!(updated.rank_table().unwrap().max_rank().name, "Veteran");
    }

    #[test]
    fn tick_interval_as_duration() {
        assert_eq!(TimerConfig::default().tick_interval(), Duration::from_millis(100));
    }
}
