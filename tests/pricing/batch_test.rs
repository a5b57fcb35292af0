use std::sync::Arc;

use seller_pricing::services::pricing::{PricingEngine, PricingError, PricingRequest};
use seller_pricing::PricingMetrics;

use crate::common::{reference_form, REFERENCE_COMMISSION_PCT};

fn requests() -> Vec<PricingRequest> {
    let mut broken = reference_form();
    broken.spp_pct = 140.0;

    vec![
        PricingRequest {
            id: "sku-1".to_string(),
            form: reference_form(),
            commission_pct: REFERENCE_COMMISSION_PCT,
        },
        PricingRequest {
            id: "sku-2".to_string(),
            form: reference_form(),
            commission_pct: 95.0,
        },
        PricingRequest {
            id: "sku-3".to_string(),
            form: broken,
            commission_pct: REFERENCE_COMMISSION_PCT,
        },
    ]
}

#[test]
fn test_batch_failures_are_isolated() {
    let outcomes = PricingEngine::new().calculate_batch(&requests());

    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes[0].id, "sku-1");
    assert!(outcomes[0].outcome.is_ok());
    assert!(matches!(
        outcomes[1].outcome,
        Err(PricingError::PriceUnsolvable { .. })
    ));
    assert!(matches!(outcomes[2].outcome, Err(PricingError::Validation(_))));
}

#[test]
fn test_batch_item_matches_single_calculation() {
    let engine = PricingEngine::new();
    let single = engine
        .calculate_two_level_pricing(&reference_form(), REFERENCE_COMMISSION_PCT)
        .unwrap();

    let outcomes = engine.calculate_batch(&requests());
    assert_eq!(outcomes[0].outcome.as_ref().unwrap(), &single);
}

#[test]
fn test_batch_records_metrics_per_item() {
    let metrics = PricingMetrics::new().unwrap();
    let engine = PricingEngine::new().with_metrics(metrics.clone());

    engine.calculate_batch(&requests());

    let output = metrics.export().unwrap();
    assert!(output.contains("pricing_calculations_total"));
    assert!(output.contains("reason=\"validation\""));
    assert!(output.contains("reason=\"unsolvable_minimum\""));
}

#[tokio::test]
async fn test_concurrent_calculations_need_no_coordination() {
    let engine = Arc::new(PricingEngine::new());
    let expected = engine
        .calculate_two_level_pricing(&reference_form(), REFERENCE_COMMISSION_PCT)
        .unwrap();

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let engine = engine.clone();
            tokio::task::spawn_blocking(move || {
                engine.calculate_two_level_pricing(&reference_form(), REFERENCE_COMMISSION_PCT)
            })
        })
        .collect();

    for handle in handles {
        let result = handle.await.unwrap().unwrap();
        assert_eq!(result, expected);
    }
}
