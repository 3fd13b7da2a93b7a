use crate::{
    agents::{self, AgentStats},
    auth::Role,
    error::{KpiError, KpiResult},
    types::Day,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Service level target (percent) used by the "vs target" delta.
pub const DEFAULT_SERVICE_LEVEL_TARGET: f64 = 90.0;

/// Half-open `[min, max)` range for a continuous metric.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FloatRange {
    pub min: f64,
    pub max: f64,
}

impl FloatRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

/// Half-open `[min, max)` range for a count metric.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct IntRange {
    pub min: u32,
    pub max: u32,
}

impl IntRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }
}

/// What to do when a drawn `calls_handled` exceeds `calls_total`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CallsHandledPolicy {
    /// Keep the independent draw, even if it exceeds the total.
    #[default]
    Permissive,
    /// Cap handled calls at the day's total.
    ClampToTotal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratorConfig {
    pub period_start: Day,
    pub period_end: Day,
    pub service_level: FloatRange,
    pub calls_total: IntRange,
    pub calls_handled: IntRange,
    pub avg_handle_time: FloatRange,
    pub avg_wait_time: FloatRange,
    pub policies_sold: IntRange,
    pub quotes_issued: IntRange,
    #[serde(default)]
    pub calls_handled_policy: CallsHandledPolicy,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            period_start: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid calendar date"),
            period_end: NaiveDate::from_ymd_opt(2024, 12, 31).expect("valid calendar date"),
            service_level: FloatRange::new(85.0, 98.0),
            calls_total: IntRange::new(100, 500),
            calls_handled: IntRange::new(90, 480),
            avg_handle_time: FloatRange::new(3.0, 8.0),
            avg_wait_time: FloatRange::new(1.0, 3.0),
            policies_sold: IntRange::new(5, 50),
            quotes_issued: IntRange::new(20, 100),
            calls_handled_policy: CallsHandledPolicy::Permissive,
        }
    }
}

impl GeneratorConfig {
    /// Reject parameters the generator cannot draw from.
    pub fn validate(&self) -> KpiResult<()> {
        if self.period_start > self.period_end {
            return Err(KpiError::InvalidConfig(format!(
                "period start {} is after period end {}",
                self.period_start, self.period_end
            )));
        }
        let floats = [
            ("service_level", self.service_level),
            ("avg_handle_time", self.avg_handle_time),
            ("avg_wait_time", self.avg_wait_time),
        ];
        for (name, r) in floats {
            if !(r.min.is_finite() && r.max.is_finite() && r.min < r.max) {
                return Err(KpiError::InvalidConfig(format!(
                    "{name} range [{}, {}) is empty or not finite",
                    r.min, r.max
                )));
            }
        }
        let ints = [
            ("calls_total", self.calls_total),
            ("calls_handled", self.calls_handled),
            ("policies_sold", self.policies_sold),
            ("quotes_issued", self.quotes_issued),
        ];
        for (name, r) in ints {
            if r.min >= r.max {
                return Err(KpiError::InvalidConfig(format!(
                    "{name} range [{}, {}) is empty",
                    r.min, r.max
                )));
            }
        }
        Ok(())
    }

    /// Number of calendar days in the closed period.
    pub fn day_count(&self) -> usize {
        let days = (self.period_end - self.period_start).num_days();
        if days < 0 { 0 } else { days as usize + 1 }
    }
}

/// A stored account: the password is only ever kept as a PHC hash string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserConfig {
    pub username: String,
    pub role: Role,
    pub password_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardConfig {
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default = "default_service_level_target")]
    pub service_level_target: f64,
    #[serde(default)]
    pub users: Vec<UserConfig>,
    #[serde(default = "agents::default_roster")]
    pub agents: Vec<AgentStats>,
}

fn default_service_level_target() -> f64 {
    DEFAULT_SERVICE_LEVEL_TARGET
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig::default(),
            service_level_target: DEFAULT_SERVICE_LEVEL_TARGET,
            users: Vec::new(),
            agents: agents::default_roster(),
        }
    }
}

impl DashboardConfig {
    /// Load from a JSON file. Missing sections fall back to defaults.
    /// In tests, use DashboardConfig::default().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: DashboardConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config
            .generator
            .validate()
            .map_err(|e| anyhow::anyhow!("{path}: {e}"))?;
        log::debug!(
            "Loaded config from {path}: period {}..={}, {} user(s)",
            config.generator.period_start,
            config.generator.period_end,
            config.users.len()
        );
        Ok(config)
    }
}
