//! Cost aggregators.
//!
//! Percentage-of-price costs are summed into a single rate before solving.
//! They are never subtracted one after another from a running total.

use super::tariff::ResolvedTariffs;
use super::types::{
    FixedCosts, PercentageCost, PercentageCosts, ProductPricingInput, TaxRegime,
    TwoLevelPricingFormData, VariableCosts,
};

/// Fixed costs of a form snapshot. Storage and acceptance are dropped for FBS.
pub fn fixed_costs(form: &TwoLevelPricingFormData) -> FixedCosts {
    let (storage, acceptance) = if form.fulfillment_type.includes_warehouse_costs() {
        (form.storage_rub, form.acceptance_cost)
    } else {
        (0.0, 0.0)
    };

    FixedCosts::new(
        form.cogs_rub,
        form.logistics_forward_rub,
        form.logistics_reverse_rub,
        storage,
        acceptance,
    )
}

/// Rates that are a share of the unknown selling price
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateAccumulator {
    pub commission_pct: f64,
    pub acquiring_pct: f64,
    pub tax: TaxRegime,
    pub vat_pct: Option<f64>,
}

impl RateAccumulator {
    pub fn from_form(form: &TwoLevelPricingFormData, commission_pct: f64) -> Self {
        Self {
            commission_pct,
            acquiring_pct: form.acquiring_pct,
            tax: form.tax_regime(),
            vat_pct: form.vat_rate_pct(),
        }
    }

    /// commission + acquiring + income tax (if any) + VAT (if any)
    pub fn base_rate_pct(&self) -> f64 {
        self.commission_pct
            + self.acquiring_pct
            + self.tax.price_rate_pct()
            + self.vat_pct.unwrap_or(0.0)
    }

    pub fn percentage_costs(&self, price: f64) -> PercentageCosts {
        let commission_wb = PercentageCost::of_price(self.commission_pct, price);
        let acquiring = PercentageCost::of_price(self.acquiring_pct, price);
        let tax_income = match self.tax {
            TaxRegime::Income { rate_pct } => Some(PercentageCost::of_price(rate_pct, price)),
            TaxRegime::Profit { .. } => None,
        };
        let vat = self.vat_pct.map(|pct| PercentageCost::of_price(pct, price));

        let members = [Some(commission_wb), Some(acquiring), tax_income, vat];
        let total = members.iter().flatten().fold(
            PercentageCost { pct: 0.0, rub: 0.0 },
            |acc, cost| PercentageCost {
                pct: acc.pct + cost.pct,
                rub: acc.rub + cost.rub,
            },
        );

        PercentageCosts {
            commission_wb,
            acquiring,
            tax_income,
            vat,
            total,
        }
    }
}

pub fn variable_costs(drr_pct: f64, price: f64) -> VariableCosts {
    let drr = PercentageCost::of_price(drr_pct, price);
    VariableCosts { drr, total: drr }
}

/// Build the form snapshot for a product from its resolved tariffs
pub fn form_from_product(input: &ProductPricingInput, tariffs: &ResolvedTariffs) -> TwoLevelPricingFormData {
    TwoLevelPricingFormData {
        fulfillment_type: input.fulfillment_type,
        tax_type: input.tax_type,
        tax_rate_pct: input.tax_rate_pct,
        is_vat_payer: input.is_vat_payer,
        vat_pct: input.vat_pct,
        cogs_rub: input.cogs_rub,
        logistics_forward_rub: tariffs.logistics_forward,
        logistics_reverse_rub: tariffs.logistics_reverse_effective,
        storage_rub: tariffs.storage.amount,
        acceptance_cost: tariffs.acceptance,
        acquiring_pct: input.acquiring_pct,
        drr_pct: input.drr_pct,
        target_margin_pct: input.target_margin_pct,
        spp_pct: input.spp_pct,
    }
}
