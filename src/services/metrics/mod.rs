pub mod registry;

pub use registry::{MetricsError, PricingMetrics};
