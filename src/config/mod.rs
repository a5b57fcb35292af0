pub mod environment;

pub use environment::{ConfigError, PricingConfig};
