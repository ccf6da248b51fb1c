use serde::{Deserialize, Serialize};

use crate::{MeditationError, Result};

/// Hard duration floor; no config can go below it.
pub const MIN_DURATION_SECS: u32 = 5 * 60;
/// Hard duration ceiling; no config can go above it.
pub const MAX_DURATION_SECS: u32 = 2 * 60 * 60;
pub const RECENT_LIMIT: usize = 10;
pub const WEEK_DAYS: u32 = 7;
pub const MONTH_DAYS: u32 = 30;

/// Top-level timer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeditationConfig {
    pub timer: TimerConfig,
    pub stats: StatsConfig,
    pub storage: StorageConfig,
}

impl MeditationConfig {
    /// Parse a stored config and reject anything outside the fixed limits.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: MeditationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.timer.validate()?;
        self.stats.validate()
    }
}

impl Default for MeditationConfig {
    fn default() -> Self {
        Self {
            timer: TimerConfig::default(),
            stats: StatsConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    pub default_duration_secs: u32,
    pub min_duration_secs: u32,
    pub max_duration_secs: u32,
    /// Increment used by the duration buttons
    pub step_secs: u32,
    /// Chime at the exact midpoint of a session
    pub interval_bell: bool,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            default_duration_secs: 30 * 60,
            min_duration_secs: MIN_DURATION_SECS,
            max_duration_secs: MAX_DURATION_SECS,
            step_secs: 5 * 60,
            interval_bell: false,
        }
    }
}

impl TimerConfig {
    /// Lower bound in effect, never below [`MIN_DURATION_SECS`].
    pub fn floor_secs(&self) -> u32 {
        self.min_duration_secs.clamp(MIN_DURATION_SECS, MAX_DURATION_SECS)
    }

    /// Upper bound in effect, never above [`MAX_DURATION_SECS`].
    pub fn ceiling_secs(&self) -> u32 {
        self.max_duration_secs.clamp(MIN_DURATION_SECS, MAX_DURATION_SECS)
    }

    pub fn accepts(&self, duration_secs: i64) -> bool {
        duration_secs >= self.floor_secs() as i64 && duration_secs <= self.ceiling_secs() as i64
    }

    /// The default duration, or the floor when the default is out of bounds.
    pub fn initial_duration(&self) -> u32 {
        if self.accepts(self.default_duration_secs as i64) {
            self.default_duration_secs
        } else {
            self.floor_secs()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_duration_secs < MIN_DURATION_SECS || self.max_duration_secs > MAX_DURATION_SECS {
            return Err(MeditationError::Config(format!(
                "duration bounds {}..{} outside {}..{}",
                self.min_duration_secs, self.max_duration_secs, MIN_DURATION_SECS, MAX_DURATION_SECS
            )));
        }
        if self.min_duration_secs > self.max_duration_secs {
            return Err(MeditationError::Config("min duration above max".to_string()));
        }
        if !self.accepts(self.default_duration_secs as i64) {
            return Err(MeditationError::Config(format!(
                "default duration {} out of bounds",
                self.default_duration_secs
            )));
        }
        if self.step_secs == 0 {
            return Err(MeditationError::Config("step must be positive".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Length of the displayed history
    pub recent_limit: usize,
    pub week_days: u32,
    pub month_days: u32,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            recent_limit: RECENT_LIMIT,
            week_days: WEEK_DAYS,
            month_days: MONTH_DAYS,
        }
    }
}

impl StatsConfig {
    /// Displayed history length in effect, capped at [`RECENT_LIMIT`].
    pub fn recent_cap(&self) -> usize {
        self.recent_limit.clamp(1, RECENT_LIMIT)
    }

    pub fn validate(&self) -> Result<()> {
        if self.recent_limit == 0 || self.recent_limit > RECENT_LIMIT {
            return Err(MeditationError::Config(format!(
                "recent limit {} outside 1..={}",
                self.recent_limit, RECENT_LIMIT
            )));
        }
        if self.week_days != WEEK_DAYS || self.month_days != MONTH_DAYS {
            return Err(MeditationError::Config(format!(
                "rolling windows are fixed at {} and {} days",
                WEEK_DAYS, MONTH_DAYS
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackendType,
    pub sessions_key: String,
    pub stats_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackendType::Auto,
            sessions_key: SESSIONS_KEY.to_string(),
            stats_key: STATS_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageBackendType {
    /// Auto-detect best available backend
    Auto,
    Memory,
    LocalStorage,
}

pub const SESSIONS_KEY: &str = "meditationSessions";
pub const STATS_KEY: &str = "meditationStats";
pub const CONFIG_KEY: &str = "meditationConfig";
