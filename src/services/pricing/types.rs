use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Where the seller's stock lives while waiting for an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FulfillmentType {
    /// Stock held at the marketplace warehouse
    Fbo,
    /// Seller ships directly
    Fbs,
}

impl FulfillmentType {
    /// Storage and acceptance are only charged when the marketplace holds the stock
    pub fn includes_warehouse_costs(&self) -> bool {
        matches!(self, Self::Fbo)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fbo => "FBO",
            Self::Fbs => "FBS",
        }
    }
}

impl std::fmt::Display for FulfillmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxType {
    /// Tax on revenue, part of the price equation
    Income,
    /// Tax on margin, applied after solving
    Profit,
}

impl TaxType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Profit => "profit",
        }
    }
}

impl std::fmt::Display for TaxType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tax regime with its rate. Exactly one of `taxIncome` / `afterTax` is ever
/// populated in a result, and both are derived from this value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TaxRegime {
    Income { rate_pct: f64 },
    Profit { rate_pct: f64 },
}

impl TaxRegime {
    pub fn new(tax_type: TaxType, rate_pct: f64) -> Self {
        match tax_type {
            TaxType::Income => Self::Income { rate_pct },
            TaxType::Profit => Self::Profit { rate_pct },
        }
    }

    pub fn tax_type(&self) -> TaxType {
        match self {
            Self::Income { .. } => TaxType::Income,
            Self::Profit { .. } => TaxType::Profit,
        }
    }

    pub fn rate_pct(&self) -> f64 {
        match self {
            Self::Income { rate_pct } | Self::Profit { rate_pct } => *rate_pct,
        }
    }

    /// Share of the selling price the tax takes (zero for profit tax)
    pub fn price_rate_pct(&self) -> f64 {
        match self {
            Self::Income { rate_pct } => *rate_pct,
            Self::Profit { .. } => 0.0,
        }
    }
}

/// Packaging used for warehouse acceptance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoxType {
    Box,
    Supersafe,
    Pallet,
}

// =============================================================================
// INPUTS
// =============================================================================

pub(crate) fn finite(value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::new("finite"))
    }
}

/// Form snapshot consumed by `calculate_two_level_pricing`.
/// All absolute costs are already resolved per unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct TwoLevelPricingFormData {
    pub fulfillment_type: FulfillmentType,
    pub tax_type: TaxType,
    #[validate(range(min = 0.0, max = 100.0), custom(function = "finite"))]
    pub tax_rate_pct: f64,
    pub is_vat_payer: bool,
    #[validate(range(min = 0.0, max = 100.0), custom(function = "finite"))]
    pub vat_pct: f64,
    #[validate(range(min = 0.0), custom(function = "finite"))]
    pub cogs_rub: f64,
    #[validate(range(min = 0.0), custom(function = "finite"))]
    pub logistics_forward_rub: f64,
    #[validate(range(min = 0.0), custom(function = "finite"))]
    pub logistics_reverse_rub: f64,
    #[validate(range(min = 0.0), custom(function = "finite"))]
    pub storage_rub: f64,
    #[validate(range(min = 0.0), custom(function = "finite"))]
    pub acceptance_cost: f64,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 100.0), custom(function = "finite"))]
    pub acquiring_pct: f64,
    #[validate(range(min = 0.0, max = 100.0), custom(function = "finite"))]
    pub drr_pct: f64,
    #[validate(range(min = 0.0, max = 100.0), custom(function = "finite"))]
    pub target_margin_pct: f64,
    #[validate(range(min = 0.0, max = 100.0), custom(function = "finite"))]
    pub spp_pct: f64,
}

impl TwoLevelPricingFormData {
    pub fn tax_regime(&self) -> TaxRegime {
        TaxRegime::new(self.tax_type, self.tax_rate_pct)
    }

    /// VAT rate, present only for VAT payers
    pub fn vat_rate_pct(&self) -> Option<f64> {
        self.is_vat_payer.then_some(self.vat_pct)
    }
}

/// Warehouse tariff values for one warehouse, as resolved by the tariff source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct WarehouseTariff {
    #[validate(range(min = 0.0), custom(function = "finite"))]
    pub box_rate_per_liter: f64,
    #[validate(range(min = 0.0), custom(function = "finite"))]
    pub supersafe_rate_per_liter: f64,
    #[validate(range(min = 0.0), custom(function = "finite"))]
    pub pallet_rate: f64,
    #[validate(range(min = 0.0), custom(function = "finite"))]
    pub daily_storage_cost: f64,
    #[validate(range(min = 0.0), custom(function = "finite"))]
    pub logistics_forward_base: f64,
    #[validate(range(min = 0.0), custom(function = "finite"))]
    pub logistics_reverse_base: f64,
}

/// Commission rates of one category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct CategoryCommission {
    #[validate(range(min = 0.0, max = 100.0), custom(function = "finite"))]
    pub fbo_pct: f64,
    #[validate(range(min = 0.0, max = 100.0), custom(function = "finite"))]
    pub fbs_pct: f64,
}

impl CategoryCommission {
    pub fn for_fulfillment(&self, fulfillment: FulfillmentType) -> f64 {
        match fulfillment {
            FulfillmentType::Fbo => self.fbo_pct,
            FulfillmentType::Fbs => self.fbs_pct,
        }
    }
}

/// Raw product inputs before tariff resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ProductPricingInput {
    pub fulfillment_type: FulfillmentType,
    pub box_type: BoxType,
    /// Volume of one package in liters
    #[validate(range(min = 0.0), custom(function = "finite"))]
    pub volume_liters: f64,
    #[validate(range(min = 1, max = 1000))]
    pub units_per_package: u32,
    pub weight_exceeds_25kg: bool,
    pub turnover_days: u32,
    #[validate(range(min = 0.5, max = 3.0), custom(function = "finite"))]
    pub localization_index: f64,
    /// Expected share of the reverse logistics rate actually paid per sale
    #[validate(range(min = 0.0), custom(function = "finite"))]
    pub buyback_adjustment_factor: f64,
    pub warehouse: WarehouseTariff,
    pub commission: CategoryCommission,

    #[validate(range(min = 0.0), custom(function = "finite"))]
    pub cogs_rub: f64,
    pub tax_type: TaxType,
    #[validate(range(min = 0.0, max = 100.0), custom(function = "finite"))]
    pub tax_rate_pct: f64,
    pub is_vat_payer: bool,
    #[validate(range(min = 0.0, max = 100.0), custom(function = "finite"))]
    pub vat_pct: f64,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 100.0), custom(function = "finite"))]
    pub acquiring_pct: f64,
    #[validate(range(min = 0.0, max = 100.0), custom(function = "finite"))]
    pub drr_pct: f64,
    #[validate(range(min = 0.0, max = 100.0), custom(function = "finite"))]
    pub target_margin_pct: f64,
    #[validate(range(min = 0.0, max = 100.0), custom(function = "finite"))]
    pub spp_pct: f64,
}

// =============================================================================
// RESULT
// =============================================================================

/// Price-independent costs per unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedCosts {
    pub cogs: f64,
    pub logistics_forward: f64,
    pub logistics_reverse_effective: f64,
    pub storage: f64,
    pub acceptance: f64,
    pub total: f64,
}

impl FixedCosts {
    pub fn new(
        cogs: f64,
        logistics_forward: f64,
        logistics_reverse_effective: f64,
        storage: f64,
        acceptance: f64,
    ) -> Self {
        Self {
            cogs,
            logistics_forward,
            logistics_reverse_effective,
            storage,
            acceptance,
            total: cogs + logistics_forward + logistics_reverse_effective + storage + acceptance,
        }
    }
}

/// A cost defined as a share of the selling price
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentageCost {
    pub pct: f64,
    pub rub: f64,
}

impl PercentageCost {
    pub fn of_price(pct: f64, price: f64) -> Self {
        Self {
            pct,
            rub: price * pct / 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PercentageCosts {
    pub commission_wb: PercentageCost,
    pub acquiring: PercentageCost,
    pub tax_income: Option<PercentageCost>,
    pub vat: Option<PercentageCost>,
    pub total: PercentageCost,
}

/// Campaign-dependent costs, excluded from the minimum price
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VariableCosts {
    pub drr: PercentageCost,
    pub total: PercentageCost,
}

impl VariableCosts {
    /// Zero advertising means there is nothing to show, not a zero row
    pub fn is_applicable(&self) -> bool {
        self.drr.pct > 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Margin {
    pub pct: f64,
    pub rub: f64,
    /// Only set under profit tax
    pub after_tax: Option<f64>,
}

impl Margin {
    pub fn new(pct: f64, recommended_price: f64, tax: &TaxRegime) -> Self {
        let rub = recommended_price * pct / 100.0;
        let after_tax = match tax {
            TaxRegime::Income { .. } => None,
            TaxRegime::Profit { rate_pct } => Some(rub * (1.0 - rate_pct / 100.0)),
        };
        Self { pct, rub, after_tax }
    }
}

/// Buffer between recommended and minimum price
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceGap {
    pub rub: f64,
    pub pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GapSeverity {
    Healthy,
    Normal,
    Tight,
}

impl GapSeverity {
    pub fn is_loss_risk(&self) -> bool {
        matches!(self, Self::Tight)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwoLevelPricingResult {
    pub minimum_price: f64,
    pub recommended_price: f64,
    pub customer_price: f64,
    pub price_gap: PriceGap,
    pub gap_severity: GapSeverity,
    pub fixed_costs: FixedCosts,
    pub percentage_costs: PercentageCosts,
    pub variable_costs: VariableCosts,
    pub margin: Margin,
}

// =============================================================================
// ERRORS
// =============================================================================

/// Which of the two price equations failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceLevel {
    Minimum,
    Recommended,
}

impl std::fmt::Display for PriceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Minimum => write!(f, "minimum"),
            Self::Recommended => write!(f, "recommended"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub code: String,
    pub message: String,
}

/// Every rejected field of one calculation request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub violations: Vec<FieldViolation>,
}

impl ValidationReport {
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }

    pub fn fields(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.field.as_str()).collect()
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .violations
            .iter()
            .map(|v| format!("{}: {}", v.field, v.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PricingError {
    #[error("Invalid input: {0}")]
    Validation(ValidationReport),

    #[error("Costs exceed 100% of price, cannot compute {level} price (combined rate {total_rate_pct}%)")]
    PriceUnsolvable { level: PriceLevel, total_rate_pct: f64 },

    #[error("Fixed costs must be a non-negative amount, got {0}")]
    InvalidFixedCosts(f64),
}

impl PricingError {
    /// Short label used for metrics and logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::PriceUnsolvable { level: PriceLevel::Minimum, .. } => "unsolvable_minimum",
            Self::PriceUnsolvable { level: PriceLevel::Recommended, .. } => "unsolvable_recommended",
            Self::InvalidFixedCosts(_) => "invalid_fixed_costs",
        }
    }
}
