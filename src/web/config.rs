use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer};
use std::collections::HashSet;
use std::path::PathBuf;
use thiserror::Error;

use crate::sim::{validate_window, ReferenceFrame};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Tracked satellites; list order fixes the render slot order.
    pub satellites: Vec<SatelliteConfig>,
    #[serde(default)]
    pub simulation: SimulationConfig,
    pub elements: ElementsConfig,
    #[serde(default)]
    pub web: WebConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SatelliteConfig {
    pub name: String,
    /// NORAD catalog number.
    pub catnr: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    /// Window start; defaults to today 00:00 UTC when omitted.
    pub start: Option<DateTime<Utc>>,
    #[serde(default = "default_duration_days")]
    pub duration_days: i64,
    #[serde(default = "default_step_minutes")]
    pub step_minutes: i64,
    /// Trail duration, e.g. "6h".
    #[serde(default = "default_trail", deserialize_with = "deserialize_duration")]
    pub trail: Duration,
    #[serde(default = "default_frame")]
    pub frame: ReferenceFrame,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            start: None,
            duration_days: default_duration_days(),
            step_minutes: default_step_minutes(),
            trail: default_trail(),
            frame: default_frame(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ElementsConfig {
    pub tle_dir: PathBuf,
    /// Staleness limit for cached element sets, e.g. "24h".
    #[serde(default = "default_max_age", deserialize_with = "deserialize_duration")]
    pub max_age: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_duration_days() -> i64 {
    30
}

fn default_step_minutes() -> i64 {
    30
}

fn default_trail() -> Duration {
    Duration::hours(6)
}

fn default_frame() -> ReferenceFrame {
    ReferenceFrame::Eci
}

fn default_max_age() -> Duration {
    Duration::hours(24)
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    let parsed = humantime::parse_duration(s.trim()).map_err(serde::de::Error::custom)?;
    Duration::from_std(parsed).map_err(serde::de::Error::custom)
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.satellites.is_empty() {
            return Err(ConfigError::Invalid(
                "satellite list must not be empty".to_string(),
            ));
        }

        let mut names = HashSet::new();
        let mut catnrs = HashSet::new();
        for sat in &self.satellites {
            if !names.insert(sat.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate satellite name: {}",
                    sat.name
                )));
            }
            if !catnrs.insert(sat.catnr) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate catalog number: {}",
                    sat.catnr
                )));
            }
        }

        validate_window(self.simulation.duration_days, self.simulation.step_minutes)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        Ok(())
    }
}
