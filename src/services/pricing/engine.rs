use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, PricingConfig};
use crate::services::metrics::PricingMetrics;
use super::aggregator::{self, RateAccumulator};
use super::breakdown::CostBreakdown;
use super::solver;
use super::strategy::{GapPolicy, ThresholdGapPolicy};
use super::tariff::{self, ResolvedTariffs};
use super::types::{
    Margin, PricingError, ProductPricingInput, TwoLevelPricingFormData, TwoLevelPricingResult,
};
use super::validation;

/// One product of a batch calculation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingRequest {
    pub id: String,
    pub form: TwoLevelPricingFormData,
    pub commission_pct: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    pub id: String,
    pub outcome: Result<TwoLevelPricingResult, PricingError>,
}

/// Result of the full pipeline, keeping the resolved tariffs for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPricing {
    pub tariffs: ResolvedTariffs,
    pub form: TwoLevelPricingFormData,
    pub result: TwoLevelPricingResult,
}

impl ProductPricing {
    pub fn breakdown(&self) -> CostBreakdown {
        let storage = self
            .form
            .fulfillment_type
            .includes_warehouse_costs()
            .then_some(&self.tariffs.storage);
        CostBreakdown::from_result(&self.result, storage)
    }
}

/// Two-level price calculator.
/// Holds only policy; every calculation is a pure function of its inputs.
pub struct PricingEngine {
    config: PricingConfig,
    gap_policy: Box<dyn GapPolicy>,
    metrics: Option<Arc<PricingMetrics>>,
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PricingEngine {
    pub fn new() -> Self {
        Self::build(PricingConfig::default())
    }

    /// Rejects configs that `PricingConfig::from_env` would also reject
    pub fn with_config(config: PricingConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: PricingConfig) -> Self {
        Self {
            gap_policy: Box::new(ThresholdGapPolicy::from_config(&config)),
            config,
            metrics: None,
        }
    }

    pub fn with_gap_policy(mut self, policy: impl GapPolicy + 'static) -> Self {
        self.gap_policy = Box::new(policy);
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<PricingMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Solve minimum and recommended price for a resolved form snapshot
    pub fn calculate_two_level_pricing(
        &self,
        form: &TwoLevelPricingFormData,
        commission_pct: f64,
    ) -> Result<TwoLevelPricingResult, PricingError> {
        let outcome = self.compute(form, commission_pct);
        self.record(form, &outcome);
        outcome
    }

    fn compute(
        &self,
        form: &TwoLevelPricingFormData,
        commission_pct: f64,
    ) -> Result<TwoLevelPricingResult, PricingError> {
        validation::validate_form(form, commission_pct)?;

        let fixed_costs = aggregator::fixed_costs(form);
        let rates = RateAccumulator::from_form(form, commission_pct);
        let base_rate_pct = rates.base_rate_pct();

        let prices = solver::solve(
            &fixed_costs,
            base_rate_pct,
            form.drr_pct,
            form.target_margin_pct,
            form.spp_pct,
        )
        .map_err(|e| {
            tracing::warn!("Price calculation failed: {}", e);
            e
        })?;

        let price = prices.recommended_price;
        let result = TwoLevelPricingResult {
            minimum_price: prices.minimum_price,
            recommended_price: price,
            customer_price: prices.customer_price,
            price_gap: prices.price_gap,
            gap_severity: self.gap_policy.classify(prices.price_gap.pct),
            fixed_costs,
            percentage_costs: rates.percentage_costs(price),
            variable_costs: aggregator::variable_costs(form.drr_pct, price),
            margin: Margin::new(form.target_margin_pct, price, &rates.tax),
        };

        tracing::debug!(
            fulfillment = %form.fulfillment_type,
            tax_type = %form.tax_type,
            fixed_total = result.fixed_costs.total,
            base_rate_pct,
            minimum_price = result.minimum_price,
            recommended_price = result.recommended_price,
            gap_pct = result.price_gap.pct,
            "Solved two-level price"
        );

        Ok(result)
    }

    fn record(&self, form: &TwoLevelPricingFormData, outcome: &Result<TwoLevelPricingResult, PricingError>) {
        let Some(metrics) = &self.metrics else {
            return;
        };
        match outcome {
            Ok(result) => metrics.record_success(
                form.fulfillment_type.as_str(),
                form.tax_type.as_str(),
                result.price_gap.pct,
            ),
            Err(e) => metrics.record_failure(e.kind()),
        }
    }

    /// Full pipeline: validate raw inputs, resolve tariffs, pick the commission
    /// for the fulfillment mode, then solve.
    pub fn calculate_for_product(&self, input: &ProductPricingInput) -> Result<ProductPricing, PricingError> {
        if let Err(e) = validation::validate_product(input) {
            if let Some(metrics) = &self.metrics {
                metrics.record_failure(e.kind());
            }
            return Err(e);
        }

        let tariffs = tariff::resolve_tariffs(input, &self.config);
        let form = aggregator::form_from_product(input, &tariffs);
        let commission_pct = input.commission.for_fulfillment(input.fulfillment_type);

        let result = self.calculate_two_level_pricing(&form, commission_pct)?;

        Ok(ProductPricing {
            tariffs,
            form,
            result,
        })
    }

    /// Each request is calculated in isolation; one failure does not affect the others
    pub fn calculate_batch(&self, requests: &[PricingRequest]) -> Vec<BatchOutcome> {
        let outcomes: Vec<BatchOutcome> = requests
            .iter()
            .map(|req| BatchOutcome {
                id: req.id.clone(),
                outcome: self.calculate_two_level_pricing(&req.form, req.commission_pct),
            })
            .collect();

        let failed = outcomes.iter().filter(|o| o.outcome.is_err()).count();
        tracing::debug!(total = outcomes.len(), failed, "Batch pricing finished");

        outcomes
    }
}

/// Calculate with the default engine policy
pub fn calculate_two_level_pricing(
    form: &TwoLevelPricingFormData,
    commission_pct: f64,
) -> Result<TwoLevelPricingResult, PricingError> {
    PricingEngine::new().calculate_two_level_pricing(form, commission_pct)
}
