use crate::config::PricingConfig;
use super::types::GapSeverity;

pub trait GapPolicy: Send + Sync {
    /// Classify the buffer between recommended and minimum price
    fn classify(&self, gap_pct: f64) -> GapSeverity;
}

pub struct ThresholdGapPolicy {
    pub healthy_above_pct: f64, // e.g. 20.0
    pub tight_below_pct: f64,   // e.g. 10.0
}

impl Default for ThresholdGapPolicy {
    fn default() -> Self {
        Self {
            healthy_above_pct: 20.0,
            tight_below_pct: 10.0,
        }
    }
}

impl ThresholdGapPolicy {
    pub fn from_config(config: &PricingConfig) -> Self {
        Self {
            healthy_above_pct: config.gap_healthy_pct,
            tight_below_pct: config.gap_tight_pct,
        }
    }
}

impl GapPolicy for ThresholdGapPolicy {
    fn classify(&self, gap_pct: f64) -> GapSeverity {
        if gap_pct > self.healthy_above_pct {
            GapSeverity::Healthy
        } else if gap_pct >= self.tight_below_pct {
            GapSeverity::Normal
        } else {
            GapSeverity::Tight
        }
    }
}
