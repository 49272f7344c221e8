use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::histogram::DEFAULT_BINS;

/// Optional config file looked up in the working directory.
pub const CONFIG_FILE: &str = "estate-lens.json";

/// Overrides `data_path` when set.
pub const DATA_PATH_ENV: &str = "ESTATE_LENS_DATA";

const DEFAULT_DATA_PATH: &str = "../data/processed/cleaned_house_prices.csv";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Listings file loaded at startup.
    pub data_path: PathBuf,
    /// Bin count of the price distribution chart.
    pub histogram_bins: usize,
    /// Step of the price sliders, in currency units.
    pub price_step: f64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            histogram_bins: DEFAULT_BINS,
            price_step: 10_000.0,
        }
    }
}

impl DashboardConfig {
    /// Defaults, then [`CONFIG_FILE`] if present, then [`DATA_PATH_ENV`].
    ///
    /// A config file that fails to parse is logged and ignored.
    pub fn resolve() -> Self {
        let mut config = match Self::from_file(Path::new(CONFIG_FILE)) {
            Ok(Some(config)) => {
                log::info!("Using configuration from {CONFIG_FILE}");
                config
            }
            Ok(None) => Self::default(),
            Err(e) => {
                log::error!("Ignoring {CONFIG_FILE}: {e:#}");
                Self::default()
            }
        };
        config.apply_env_override(std::env::var_os(DATA_PATH_ENV).map(PathBuf::from));
        config
    }

    /// Read a JSON config file; `Ok(None)` when it does not exist.
    pub fn from_file(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(Some(config))
    }

    fn apply_env_override(&mut self, data_path: Option<PathBuf>) {
        if let Some(path) = data_path.filter(|p| !p.as_os_str().is_empty()) {
            log::info!("{DATA_PATH_ENV} overrides data path: {}", path.display());
            self.data_path = path;
        }
    }
}
