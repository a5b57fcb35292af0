pub mod metrics;
pub mod pricing;
