pub mod aggregator;
pub mod breakdown;
pub mod engine;
pub mod solver;
pub mod strategy;
pub mod tariff;
pub mod types;
pub mod validation;

pub use breakdown::{CostBreakdown, SectionKind};
pub use engine::{calculate_two_level_pricing, BatchOutcome, PricingEngine, PricingRequest, ProductPricing};
pub use strategy::*;
pub use tariff::{ResolvedTariffs, StorageCost};
pub use types::*;
