//! Tariff resolvers: turn raw warehouse tariffs into per-unit absolute costs.

use serde::{Deserialize, Serialize};

use crate::config::PricingConfig;
use super::types::{BoxType, ProductPricingInput, WarehouseTariff};

/// Storage cost over the turnover period
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageCost {
    pub amount: f64,
    pub billable_days: u32,
    /// The whole turnover period fits in the free grace period
    pub free_period: bool,
}

/// Tariff-derived costs for one unit, before fulfillment-mode rules apply
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedTariffs {
    pub acceptance: f64,
    pub storage: StorageCost,
    pub logistics_forward: f64,
    pub logistics_reverse_effective: f64,
}

/// Acceptance cost per unit.
/// Boxes are billed per liter, pallets per pallet; both are split across the package.
pub fn acceptance_cost(
    box_type: BoxType,
    tariff: &WarehouseTariff,
    volume_liters: f64,
    units_per_package: u32,
) -> f64 {
    let package_cost = match box_type {
        BoxType::Box => tariff.box_rate_per_liter * volume_liters,
        BoxType::Supersafe => tariff.supersafe_rate_per_liter * volume_liters,
        BoxType::Pallet => tariff.pallet_rate,
    };
    // Callers validate units_per_package >= 1
    debug_assert!(units_per_package >= 1, "units_per_package must be at least 1");
    package_cost / f64::from(units_per_package.max(1))
}

pub fn storage_cost(daily_storage_cost: f64, turnover_days: u32, free_days: u32) -> StorageCost {
    let billable_days = turnover_days.saturating_sub(free_days);
    StorageCost {
        amount: daily_storage_cost * f64::from(billable_days),
        billable_days,
        free_period: billable_days == 0,
    }
}

/// Effective logistics rate: base × localization index, with the overweight
/// surcharge applied before localization.
pub fn logistics_cost(
    base_rate: f64,
    localization_index: f64,
    overweight: bool,
    overweight_multiplier: f64,
) -> f64 {
    let weighted = if overweight {
        base_rate * overweight_multiplier
    } else {
        base_rate
    };
    weighted * localization_index
}

/// Expected reverse logistics per sale. The adjustment factor is supplied by the caller.
pub fn reverse_logistics_effective(reverse_rate: f64, buyback_adjustment_factor: f64) -> f64 {
    reverse_rate * buyback_adjustment_factor
}

pub fn resolve_tariffs(input: &ProductPricingInput, config: &PricingConfig) -> ResolvedTariffs {
    let tariff = &input.warehouse;

    let logistics_forward = logistics_cost(
        tariff.logistics_forward_base,
        input.localization_index,
        input.weight_exceeds_25kg,
        config.overweight_multiplier,
    );
    let reverse_rate = logistics_cost(
        tariff.logistics_reverse_base,
        input.localization_index,
        input.weight_exceeds_25kg,
        config.overweight_multiplier,
    );

    let resolved = ResolvedTariffs {
        acceptance: acceptance_cost(
            input.box_type,
            tariff,
            input.volume_liters,
            input.units_per_package,
        ),
        storage: storage_cost(
            tariff.daily_storage_cost,
            input.turnover_days,
            config.free_storage_days,
        ),
        logistics_forward,
        logistics_reverse_effective: reverse_logistics_effective(
            reverse_rate,
            input.buyback_adjustment_factor,
        ),
    };

    tracing::debug!(
        acceptance = resolved.acceptance,
        storage = resolved.storage.amount,
        billable_days = resolved.storage.billable_days,
        logistics_forward = resolved.logistics_forward,
        logistics_reverse = resolved.logistics_reverse_effective,
        "Resolved tariffs"
    );

    resolved
}
