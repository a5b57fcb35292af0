//! Closed-form price solver.
//!
//! Commission, acquiring, income tax, VAT, advertising and margin are all
//! shares of the price being solved for, so the price is
//! `fixed / (1 - rates / 100)` rather than a sum of costs.

use super::types::{FixedCosts, PriceGap, PriceLevel, PricingError};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolvedPrices {
    pub minimum_price: f64,
    pub recommended_price: f64,
    pub customer_price: f64,
    pub price_gap: PriceGap,
}

/// Rates within this distance of 100% are treated as 100%
const RATE_EPSILON_PCT: f64 = 1e-9;

fn price_for_rate(fixed_total: f64, rate_pct: f64, level: PriceLevel) -> Result<f64, PricingError> {
    // Written so that NaN fails too
    if !(rate_pct < 100.0 - RATE_EPSILON_PCT) {
        return Err(PricingError::PriceUnsolvable {
            level,
            total_rate_pct: rate_pct,
        });
    }
    Ok(fixed_total / (1.0 - rate_pct / 100.0))
}

pub fn solve(
    fixed_costs: &FixedCosts,
    base_rate_pct: f64,
    drr_pct: f64,
    target_margin_pct: f64,
    spp_pct: f64,
) -> Result<SolvedPrices, PricingError> {
    let fixed_total = fixed_costs.total;
    if !fixed_total.is_finite() || fixed_total < 0.0 {
        return Err(PricingError::InvalidFixedCosts(fixed_total));
    }

    // Minimum: fixed + percentage costs, no margin, no advertising
    let minimum_price = price_for_rate(fixed_total, base_rate_pct, PriceLevel::Minimum)?;

    let recommended_rate_pct = base_rate_pct + drr_pct + target_margin_pct;
    let recommended_price = price_for_rate(fixed_total, recommended_rate_pct, PriceLevel::Recommended)?;

    // SPP is funded by the marketplace out of the seller's price
    let customer_price = recommended_price * (1.0 - spp_pct / 100.0);

    let gap_rub = recommended_price - minimum_price;
    let gap_pct = if minimum_price > 0.0 {
        gap_rub / minimum_price * 100.0
    } else {
        0.0
    };

    Ok(SolvedPrices {
        minimum_price,
        recommended_price,
        customer_price,
        price_gap: PriceGap {
            rub: gap_rub,
            pct: gap_pct,
        },
    })
}
