//! Engine configuration
//!
//! Config is loaded with a two-layer resolution:
//! 1. An explicit path, or the override in the data dir
//!    (~/.local/share/smartdash/engine.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Override files may be partial; keys they omit keep their default value.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::correlation::{IMPACT_SHIFT_PCT, MIN_CORRELATION};
use crate::error::{Error, Result};
use crate::insights::{SLOPE_THRESHOLD, SURGE_THRESHOLD_PCT};
use crate::trend::{PREDICT_HORIZON, SIMULATE_HORIZON};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/engine.toml");

/// File name looked up in the data directory
const CONFIG_FILE_NAME: &str = "engine.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub predict_horizon: usize,
    pub simulate_horizon: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            predict_horizon: PREDICT_HORIZON,
            simulate_horizon: SIMULATE_HORIZON,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendConfig {
    pub slope_threshold: f64,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            slope_threshold: SLOPE_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightConfig {
    pub surge_threshold_pct: f64,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            surge_threshold_pct: SURGE_THRESHOLD_PCT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrelationConfig {
    pub min_correlation: f64,
    pub impact_shift_pct: f64,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            min_correlation: MIN_CORRELATION,
            impact_shift_pct: IMPACT_SHIFT_PCT,
        }
    }
}

/// Tunable analysis parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub forecast: ForecastConfig,
    pub trend: TrendConfig,
    pub insights: InsightConfig,
    pub correlation: CorrelationConfig,
}

impl EngineConfig {
    /// Parse and validate config from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// The defaults compiled into the binary
    pub fn embedded() -> Result<Self> {
        Self::from_toml(DEFAULT_CONFIG)
    }

    /// Default override location in the platform data directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("smartdash").join(CONFIG_FILE_NAME))
    }

    /// Resolve config: an explicit path must exist; the default override is
    /// optional and falls back to the embedded defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            let text = fs::read_to_string(path).map_err(|e| {
                Error::Config(format!("cannot read {}: {}", path.display(), e))
            })?;
            tracing::debug!(path = %path.display(), "Loaded engine config");
            return Self::from_toml(&text);
        }

        if let Some(path) = Self::default_path() {
            if path.exists() {
                let text = fs::read_to_string(&path)?;
                tracing::debug!(path = %path.display(), "Loaded engine config override");
                return Self::from_toml(&text);
            }
        }

        Self::embedded()
    }

    /// Reject values that would make the engines meaningless
    pub fn validate(&self) -> Result<()> {
        if self.forecast.predict_horizon == 0 || self.forecast.simulate_horizon == 0 {
            return Err(Error::Config("forecast horizons must be at least 1".into()));
        }
        if self.trend.slope_threshold.is_nan() || self.trend.slope_threshold < 0.0 {
            return Err(Error::Config("trend.slope_threshold must be >= 0".into()));
        }
        let surge = self.insights.surge_threshold_pct;
        if surge.is_nan() || surge < 0.0 {
            return Err(Error::Config(
                "insights.surge_threshold_pct must be >= 0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.correlation.min_correlation) {
            return Err(Error::Config(
                "correlation.min_correlation must be within [0, 1]".into(),
            ));
        }
        if !self.correlation.impact_shift_pct.is_finite() {
            return Err(Error::Config(
                "correlation.impact_shift_pct must be finite".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedded_matches_defaults() {
        let embedded = EngineConfig::embedded().unwrap();
        assert_eq!(embedded, EngineConfig::default());
        assert_eq!(embedded.forecast.predict_horizon, 3);
        assert_eq!(embedded.forecast.simulate_horizon, 6);
    }

    #[test]
    fn test_partial_override_keeps_other_defaults() {
        let config = EngineConfig::from_toml("[forecast]\nsimulate_horizon = 3\n").unwrap();
        assert_eq!(config.forecast.simulate_horizon, 3);
        assert_eq!(config.forecast.predict_horizon, 3);
        assert_eq!(config.trend.slope_threshold, 0.5);
        assert_eq!(config.correlation.min_correlation, 0.3);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(EngineConfig::from_toml("[forecast]\npredict_horizon = 0\n").is_err());
        assert!(EngineConfig::from_toml("[correlation]\nmin_correlation = 1.5\n").is_err());
        assert!(EngineConfig::from_toml("[trend]\nslope_threshold = -1.0\n").is_err());
        assert!(EngineConfig::from_toml("not toml [").is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[insights]\nsurge_threshold_pct = 25.0").unwrap();

        let config = EngineConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.insights.surge_threshold_pct, 25.0);
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = EngineConfig::load(Some(&dir.path().join("missing.toml"))).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
