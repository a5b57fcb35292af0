use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid {key}: {value}")]
    Invalid { key: &'static str, value: String },

    #[error("Inconsistent configuration: {0}")]
    Inconsistent(String),
}

/// Engine policy values
/// Loads overrides from environment variables, falling back to marketplace defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Days of storage the marketplace does not bill for
    pub free_storage_days: u32,
    /// Logistics multiplier for items heavier than 25 kg
    pub overweight_multiplier: f64,
    /// Gap above this percentage is healthy
    pub gap_healthy_pct: f64,
    /// Gap below this percentage is a loss risk
    pub gap_tight_pct: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            free_storage_days: 60,
            overweight_multiplier: 1.5,
            gap_healthy_pct: 20.0,
            gap_tight_pct: 10.0,
        }
    }
}

fn read_var<T: FromStr>(key: &'static str, target: &mut T) -> Result<(), ConfigError> {
    if let Ok(val) = env::var(key) {
        *target = val
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: val.clone() })?;
    }
    Ok(())
}

impl PricingConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        read_var("PRICING_FREE_STORAGE_DAYS", &mut config.free_storage_days)?;
        read_var("PRICING_OVERWEIGHT_MULTIPLIER", &mut config.overweight_multiplier)?;
        read_var("PRICING_GAP_HEALTHY_PCT", &mut config.gap_healthy_pct)?;
        read_var("PRICING_GAP_TIGHT_PCT", &mut config.gap_tight_pct)?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.overweight_multiplier.is_finite() || self.overweight_multiplier < 1.0 {
            return Err(ConfigError::Inconsistent(format!(
                "overweight multiplier must be at least 1.0, got {}",
                self.overweight_multiplier
            )));
        }

        if !self.gap_tight_pct.is_finite() || !self.gap_healthy_pct.is_finite() {
            return Err(ConfigError::Inconsistent("gap thresholds must be finite".to_string()));
        }

        if self.gap_tight_pct > self.gap_healthy_pct {
            return Err(ConfigError::Inconsistent(format!(
                "tight gap threshold {} exceeds healthy threshold {}",
                self.gap_tight_pct, self.gap_healthy_pct
            )));
        }

        Ok(())
    }
}
