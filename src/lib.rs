//! Two-level price calculation for marketplace sellers.
//!
//! Given a product's cost structure and a target margin, computes the
//! break-even minimum price and the recommended price, where commission,
//! acquiring, income tax, VAT, advertising and margin are all shares of the
//! price being solved for.

pub mod config;
pub mod services;

pub use config::{ConfigError, PricingConfig};
pub use services::metrics::PricingMetrics;
pub use services::pricing::{
    calculate_two_level_pricing, PricingEngine, PricingError, ProductPricingInput,
    TwoLevelPricingFormData, TwoLevelPricingResult,
};
