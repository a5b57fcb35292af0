use prometheus::{CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("Prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),

    #[error("Metrics output is not UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Outcome metrics for price calculations
pub struct PricingMetrics {
    registry: Registry,

    pub calculations_total: CounterVec,
    pub failures_total: CounterVec,
    pub price_gap_pct: HistogramVec,
}

impl PricingMetrics {
    pub fn new() -> Result<Arc<Self>, MetricsError> {
        let registry = Registry::new();

        let calculations_total = CounterVec::new(
            Opts::new("calculations_total", "Successful price calculations")
                .namespace("pricing"),
            &["fulfillment", "tax_type"],
        )?;
        registry.register(Box::new(calculations_total.clone()))?;

        let failures_total = CounterVec::new(
            Opts::new("failures_total", "Rejected price calculations")
                .namespace("pricing"),
            &["reason"],
        )?;
        registry.register(Box::new(failures_total.clone()))?;

        let price_gap_pct = HistogramVec::new(
            HistogramOpts::new("price_gap_pct", "Gap between recommended and minimum price, percent")
                .namespace("pricing")
                .buckets(vec![5.0, 10.0, 15.0, 20.0, 30.0, 50.0, 75.0, 100.0, 200.0]),
            &["fulfillment"],
        )?;
        registry.register(Box::new(price_gap_pct.clone()))?;

        Ok(Arc::new(Self {
            registry,
            calculations_total,
            failures_total,
            price_gap_pct,
        }))
    }

    pub fn record_success(&self, fulfillment: &str, tax_type: &str, gap_pct: f64) {
        self.calculations_total
            .with_label_values(&[fulfillment, tax_type])
            .inc();

        self.price_gap_pct
            .with_label_values(&[fulfillment])
            .observe(gap_pct);
    }

    pub fn record_failure(&self, reason: &str) {
        self.failures_total.with_label_values(&[reason]).inc();
    }

    /// Export metrics in Prometheus text format
    pub fn export(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}
