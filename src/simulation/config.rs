/*!
 * Simulation Configuration
 * Defaults, JSON file loading and environment overrides
 */

use crate::core::errors::SimError;
use crate::core::limits::{DEFAULT_QUANTUM, DEFAULT_TICK_INTERVAL_MS, MAX_TICK_INTERVAL_MS};
use crate::core::types::{SimResult, Ticks};
use crate::scheduler::Algorithm;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

pub const ENV_CONFIG: &str = "OSVIZ_CONFIG";
pub const ENV_ALGORITHM: &str = "OSVIZ_ALGORITHM";
pub const ENV_QUANTUM: &str = "OSVIZ_QUANTUM";
pub const ENV_STRATEGY: &str = "OSVIZ_STRATEGY";
pub const ENV_TICK_MS: &str = "OSVIZ_TICK_MS";

/// Verdict applied at the end of a staged deadlock scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Run the wait-for cycle detector
    #[default]
    Detection,
    /// Run the Banker's safety check
    Avoidance,
}

impl Strategy {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Detection => "detection",
            Self::Avoidance => "avoidance",
        }
    }
}

impl FromStr for Strategy {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "detection" | "detect" => Ok(Self::Detection),
            "avoidance" | "avoid" | "banker" => Ok(Self::Avoidance),
            other => Err(SimError::Configuration(format!(
                "unknown strategy '{other}' (expected detection or avoidance)"
            ))),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host-facing simulation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SimulationConfig {
    pub algorithm: Algorithm,
    pub quantum: Ticks,
    pub strategy: Strategy,
    /// Delay between ticks when a host replays a run
    pub tick_interval_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Fcfs,
            quantum: DEFAULT_QUANTUM,
            strategy: Strategy::Detection,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
        }
    }
}

impl SimulationConfig {
    /// Defaults with environment overrides applied
    pub fn from_env() -> SimResult<Self> {
        Self::default().with_env_overrides()
    }

    /// Read a JSON config file; missing fields take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;

        debug!(path = %path.display(), "configuration file loaded");
        Ok(config)
    }

    /// Load `OSVIZ_CONFIG` when set, then apply the remaining `OSVIZ_*`
    /// overrides
    pub fn load() -> SimResult<Self> {
        let base = match std::env::var(ENV_CONFIG) {
            Ok(path) if !path.is_empty() => Self::from_json_file(path)?,
            _ => Self::default(),
        };
        let config = base.with_env_overrides()?;

        info!(
            algorithm = %config.algorithm,
            quantum = config.quantum,
            strategy = %config.strategy,
            tick_interval_ms = config.tick_interval_ms,
            "configuration loaded"
        );
        Ok(config)
    }

    pub fn with_env_overrides(mut self) -> SimResult<Self> {
        if let Some(value) = env_value(ENV_ALGORITHM) {
            self.algorithm = value
                .parse()
                .map_err(|e| SimError::Configuration(format!("{ENV_ALGORITHM}: {e}")))?;
        }
        if let Some(value) = env_value(ENV_QUANTUM) {
            self.quantum = parse_number(ENV_QUANTUM, &value)?;
        }
        if let Some(value) = env_value(ENV_STRATEGY) {
            self.strategy = value.parse()?;
        }
        if let Some(value) = env_value(ENV_TICK_MS) {
            self.tick_interval_ms = parse_number(ENV_TICK_MS, &value)?;
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.quantum == 0 {
            return Err(SimError::Configuration(
                "quantum must be at least 1 time unit".to_string(),
            ));
        }
        if self.tick_interval_ms == 0 || self.tick_interval_ms > MAX_TICK_INTERVAL_MS {
            return Err(SimError::Configuration(format!(
                "tick_interval_ms must be within 1..={MAX_TICK_INTERVAL_MS} (got {})",
                self.tick_interval_ms
            )));
        }
        Ok(())
    }

    #[inline]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_number(key: &str, value: &str) -> SimResult<u64> {
    value
        .trim()
        .parse()
        .map_err(|e| SimError::Configuration(format!("{key}: invalid number '{value}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SimulationConfig::default();
        assert_eq!(config.algorithm, Algorithm::Fcfs);
        assert_eq!(config.quantum, 4);
        assert_eq!(config.strategy, Strategy::Detection);
        assert_eq!(config.tick_interval(), Duration::from_millis(500));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SimulationConfig = serde_json::from_str(r#"{"algorithm":"rr","quantum":2}"#).unwrap();
        assert_eq!(config.algorithm, Algorithm::RoundRobin);
        assert_eq!(config.quantum, 2);
        assert_eq!(config.tick_interval_ms, 500);
    }

    #[test]
    fn test_validation() {
        let config = SimulationConfig {
            quantum: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(SimError::Configuration(_))));

        let config = SimulationConfig {
            tick_interval_ms: MAX_TICK_INTERVAL_MS + 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("AVOIDANCE".parse::<Strategy>().unwrap(), Strategy::Avoidance);
        assert_eq!("detect".parse::<Strategy>().unwrap(), Strategy::Detection);
        assert!("prevention".parse::<Strategy>().is_err());
    }
}
