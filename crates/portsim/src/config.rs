//! YAML run configuration
//!
//! ```yaml
//! forecast:
//!   iterations: 5000
//!   percentiles: [50, 90, 99]
//! optimizer:
//!   population_size: 200
//!   generations: 500
//!   model:
//!     BlockBootstrap:
//!       expected_regime_months: 18
//!   seed: 7
//! ```
//!
//! Every field is optional; command line flags override file values.

use std::path::{Path, PathBuf};

use portsim_core::analysis::ForecastConfig;
use portsim_core::optimization::OptimizerConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_saphyr::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub forecast: ForecastConfig,

    #[serde(default)]
    pub optimizer: OptimizerConfig,
}

impl RunConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_saphyr::Error> {
        serde_saphyr::from_str(yaml)
    }

    /// Load from `path`, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&yaml).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }
}
