//! ---
//! hems_section: "01-core-functionality"
//! hems_subsection: "module"
//! hems_type: "source"
//! hems_scope: "code"
//! hems_description: "Shared primitives and utilities for the monitoring runtime."
//! hems_version: "v0.0.0-prealpha"
//! hems_owner: "tbd"
//! ---
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationSeconds};
use tracing::debug;

use crate::logging::LogFormat;

fn default_cost_per_unit() -> f64 {
    0.65
}

fn default_currency_symbol() -> String {
    "R$".to_owned()
}

fn default_phantom_threshold_w() -> f64 {
    20.0
}

fn default_recompute_phantom() -> bool {
    true
}

fn default_anomaly_ratio() -> f64 {
    1.3
}

fn default_anomaly_probability() -> f64 {
    0.2
}

fn default_variation() -> f64 {
    0.1
}

fn default_notification_capacity() -> usize {
    5
}

fn default_notification_ttl() -> Duration {
    Duration::from_secs(5)
}

fn default_logging_directory() -> PathBuf {
    PathBuf::from("target/logs")
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

fn default_write_file() -> bool {
    true
}

/// Primary configuration object for the HEMS runtime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub detection: DetectionConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Metadata describing where an [`AppConfig`] was loaded from.
///
/// `source` is `None` when no file was found and built-in defaults apply.
#[derive(Debug, Clone)]
pub struct LoadedAppConfig {
    pub config: AppConfig,
    pub source: Option<PathBuf>,
}

impl AppConfig {
    pub const ENV_CONFIG_PATH: &'static str = "HEMS_CONFIG";

    /// Load configuration respecting the `HEMS_CONFIG` override, then the first
    /// existing candidate, falling back to defaults.
    pub fn load_with_source<P: AsRef<Path>>(candidates: &[P]) -> Result<LoadedAppConfig> {
        if let Ok(env_path) = std::env::var(Self::ENV_CONFIG_PATH) {
            if !env_path.trim().is_empty() {
                let path = PathBuf::from(env_path);
                let config = Self::from_path(&path)?;
                return Ok(LoadedAppConfig {
                    config,
                    source: Some(path),
                });
            }
        }

        for candidate in candidates {
            let path = candidate.as_ref();
            if path.exists() {
                let config = Self::from_path(path)?;
                return Ok(LoadedAppConfig {
                    config,
                    source: Some(path.to_path_buf()),
                });
            }
        }

        debug!("no configuration file found, using defaults");
        Ok(LoadedAppConfig {
            config: AppConfig::default(),
            source: None,
        })
    }

    /// Load and validate a configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(config_path = %path.display(), "loading configuration");
        let contents = fs::read_to_string(path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        contents
            .parse::<AppConfig>()
            .with_context(|| format!("failed to load config file {}", path.display()))
    }

    /// Validate structural invariants.
    pub fn validate(&self) -> Result<()> {
        self.pricing.validate()?;
        self.detection.validate()?;
        self.simulation.validate()?;
        if self.notifications.capacity == 0 {
            return Err(anyhow!("notifications.capacity must be at least 1"));
        }
        Ok(())
    }
}

impl std::str::FromStr for AppConfig {
    type Err = anyhow::Error;

    fn from_str(content: &str) -> std::result::Result<Self, Self::Err> {
        let config: AppConfig =
            toml::from_str(content).with_context(|| "failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }
}

/// Tariff applied to every consumption figure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Currency units per kWh.
    #[serde(default = "default_cost_per_unit")]
    pub cost_per_unit: f64,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            cost_per_unit: default_cost_per_unit(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

impl PricingConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.cost_per_unit.is_finite() || self.cost_per_unit < 0.0 {
            return Err(anyhow!(
                "pricing.cost_per_unit must be a non-negative number, got {}",
                self.cost_per_unit
            ));
        }
        Ok(())
    }
}

/// Rule used to flag a device as anomalous during a refresh.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "policy", rename_all = "lowercase")]
pub enum AnomalyPolicy {
    /// Flag when `current_power > average_power * ratio`; re-evaluated every refresh.
    Threshold {
        #[serde(default = "default_anomaly_ratio")]
        ratio: f64,
    },
    /// Flag with the given probability per refresh. Never clears a flag.
    Random {
        #[serde(default = "default_anomaly_probability")]
        probability: f64,
    },
}

impl Default for AnomalyPolicy {
    fn default() -> Self {
        AnomalyPolicy::Threshold {
            ratio: default_anomaly_ratio(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    #[serde(default)]
    pub anomaly: AnomalyPolicy,
    /// Upper bound (exclusive) of standby draw counted as phantom load.
    /// Held by the device fleet, which applies it on adds and refreshes.
    #[serde(default = "default_phantom_threshold_w")]
    pub phantom_threshold_w: f64,
    #[serde(default = "default_recompute_phantom")]
    pub recompute_phantom_on_refresh: bool,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            anomaly: AnomalyPolicy::default(),
            phantom_threshold_w: default_phantom_threshold_w(),
            recompute_phantom_on_refresh: default_recompute_phantom(),
        }
    }
}

impl DetectionConfig {
    pub fn validate(&self) -> Result<()> {
        match self.anomaly {
            AnomalyPolicy::Threshold { ratio } if !(ratio.is_finite() && ratio > 0.0) => {
                return Err(anyhow!(
                    "detection.anomaly.ratio must be positive, got {}",
                    ratio
                ));
            }
            AnomalyPolicy::Random { probability } if !(0.0..=1.0).contains(&probability) => {
                return Err(anyhow!(
                    "detection.anomaly.probability must lie in [0, 1], got {}",
                    probability
                ));
            }
            _ => {}
        }
        if !self.phantom_threshold_w.is_finite() || self.phantom_threshold_w <= 0.0 {
            return Err(anyhow!(
                "detection.phantom_threshold_w must be positive, got {}",
                self.phantom_threshold_w
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Fixed RNG seed; entropy-seeded when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Maximum relative perturbation applied to `current_power` per refresh.
    #[serde(default = "default_variation")]
    pub variation: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            variation: default_variation(),
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.variation) {
            return Err(anyhow!(
                "simulation.variation must lie in [0, 1), got {}",
                self.variation
            ));
        }
        Ok(())
    }
}

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "default_notification_capacity")]
    pub capacity: usize,
    #[serde(default = "default_notification_ttl")]
    #[serde_as(as = "DurationSeconds<u64>")]
    pub ttl: Duration,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            capacity: default_notification_capacity(),
            ttl: default_notification_ttl(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_directory")]
    pub directory: PathBuf,
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
    #[serde(default)]
    pub file_prefix: Option<String>,
    /// Also write a daily rolling JSON log under `directory`.
    #[serde(default = "default_write_file")]
    pub write_file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: default_logging_directory(),
            format: default_log_format(),
            file_prefix: None,
            write_file: default_write_file(),
        }
    }
}
