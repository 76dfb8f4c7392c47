use hvac_domain::domain::Tariff;
use serde::Deserialize;
use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::scenarios::ScenarioSettings;

#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TariffConfig {
    pub rate_per_kwh: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Default for TariffConfig {
    fn default() -> Self {
        Self {
            rate_per_kwh: 0.80,
            currency: default_currency(),
        }
    }
}

fn default_currency() -> String {
    "BRL".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioConfig {
    #[serde(default = "default_early_shutoff_minutes")]
    pub early_shutoff_minutes: u32,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            early_shutoff_minutes: default_early_shutoff_minutes(),
        }
    }
}

fn default_early_shutoff_minutes() -> u32 {
    60
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: String,
    #[serde(default = "default_scatter_max_points")]
    pub scatter_max_points: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            scatter_max_points: default_scatter_max_points(),
        }
    }
}

fn default_scatter_max_points() -> usize {
    5000
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    pub bind_addr: String,
}

const DEFAULT_CONFIG_PATH: &str = "hvac-config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Only the server needs it; the report CLI takes the CSV path as argument.
    pub dataset: Option<DatasetConfig>,
    #[serde(default)]
    pub tariff: TariffConfig,
    #[serde(default)]
    pub scenarios: ScenarioConfig,
    #[serde(default)]
    pub server: ServerConfig,
    pub metrics: Option<MetricsConfig>,
}

impl AppConfig {
    /// Reads the file named by `HVAC_CONFIG` (default `hvac-config.toml`).
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("HVAC_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_optional(Path::new(&path))?
            .ok_or_else(|| anyhow::anyhow!("config file {path} not found"))
    }

    /// Like [`AppConfig::load`], but falls back to defaults when `HVAC_CONFIG`
    /// is unset and the default file does not exist.
    pub fn load_or_default() -> anyhow::Result<Self> {
        match std::env::var("HVAC_CONFIG") {
            Ok(_) => Self::load(),
            Err(_) => Ok(Self::load_optional(Path::new(DEFAULT_CONFIG_PATH))?.unwrap_or_default()),
        }
    }

    /// `Ok(None)` if `path` does not exist.
    pub fn load_optional(path: &Path) -> anyhow::Result<Option<Self>> {
        match fs::read_to_string(path) {
            Ok(contents) => Self::from_toml_str(&contents).map(Some),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(anyhow::anyhow!("failed to read config {}: {e}", path.display())),
        }
    }

    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        let cfg: AppConfig = toml::from_str(contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> anyhow::Result<()> {
        let rate = self.tariff.rate_per_kwh;
        if !rate.is_finite() || rate < 0.0 {
            anyhow::bail!("tariff.rate_per_kwh must be a non-negative number, got {rate}");
        }
        if self.scenarios.early_shutoff_minutes == 0 {
            anyhow::bail!("scenarios.early_shutoff_minutes must be greater than zero");
        }
        Ok(())
    }

    pub fn dataset_path(&self) -> anyhow::Result<&Path> {
        self.dataset
            .as_ref()
            .map(|d| d.path.as_path())
            .ok_or_else(|| anyhow::anyhow!("[dataset] path is required to serve the dashboard"))
    }

    pub fn tariff(&self) -> Tariff {
        Tariff::new(self.tariff.rate_per_kwh, self.tariff.currency.clone())
    }

    pub fn scenario_settings(&self) -> ScenarioSettings {
        ScenarioSettings {
            early_shutoff_window: time::Duration::minutes(i64::from(self.scenarios.early_shutoff_minutes)),
        }
    }
}
