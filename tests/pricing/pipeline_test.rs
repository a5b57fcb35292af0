use serial_test::serial;

use seller_pricing::services::pricing::{
    BoxType, FulfillmentType, PricingEngine, PricingError, SectionKind,
};
use seller_pricing::PricingConfig;

use crate::common::{assert_close, init_tracing, product_input};

#[test]
fn test_fbo_product_resolves_all_tariffs() {
    init_tracing();

    let pricing = PricingEngine::new().calculate_for_product(&product_input()).unwrap();

    // 2.0/L * 30 L split over 4 units
    assert_close(pricing.tariffs.acceptance, 15.0, 1e-9);
    // 90 days turnover, 60 free, 0.5 per day
    assert_close(pricing.tariffs.storage.amount, 15.0, 1e-9);
    assert_eq!(pricing.tariffs.storage.billable_days, 30);
    assert_close(pricing.tariffs.logistics_forward, 60.0, 1e-9);
    assert_close(pricing.tariffs.logistics_reverse_effective, 15.0, 1e-9);

    assert_close(pricing.result.fixed_costs.total, 1605.0, 1e-9);
    assert_eq!(pricing.result.percentage_costs.commission_wb.pct, 25.0);
    assert_close(pricing.result.minimum_price, 1605.0 / 0.67, 1e-6);
}

#[test]
fn test_fbs_product_uses_fbs_commission_and_skips_warehouse() {
    let mut input = product_input();
    input.fulfillment_type = FulfillmentType::Fbs;

    let pricing = PricingEngine::new().calculate_for_product(&input).unwrap();

    assert_eq!(pricing.result.percentage_costs.commission_wb.pct, 28.0);
    assert_eq!(pricing.result.fixed_costs.storage, 0.0);
    assert_eq!(pricing.result.fixed_costs.acceptance, 0.0);
    assert_close(pricing.result.fixed_costs.total, 1575.0, 1e-9);
    assert_close(pricing.result.minimum_price, 1575.0 / 0.64, 1e-6);

    let breakdown = pricing.breakdown();
    let fixed = breakdown.section(SectionKind::Fixed).unwrap();
    assert!(fixed.lines.iter().all(|l| l.label != "Storage" && l.label != "Acceptance"));
}

#[test]
fn test_overweight_surcharge_applies_to_logistics_only() {
    let mut input = product_input();
    input.weight_exceeds_25kg = true;

    let pricing = PricingEngine::new().calculate_for_product(&input).unwrap();

    assert_close(pricing.tariffs.logistics_forward, 90.0, 1e-9);
    assert_close(pricing.tariffs.logistics_reverse_effective, 22.5, 1e-9);
    assert_close(pricing.tariffs.acceptance, 15.0, 1e-9);
}

#[test]
fn test_pallet_acceptance_split_across_units() {
    let mut input = product_input();
    input.box_type = BoxType::Pallet;
    input.units_per_package = 100;

    let pricing = PricingEngine::new().calculate_for_product(&input).unwrap();
    assert_close(pricing.tariffs.acceptance, 5.0, 1e-9);
}

#[test]
fn test_out_of_range_tariff_inputs_are_reported_per_field() {
    let mut input = product_input();
    input.localization_index = 4.0;
    input.units_per_package = 0;
    input.warehouse.pallet_rate = -1.0;

    let err = PricingEngine::new().calculate_for_product(&input).unwrap_err();
    match err {
        PricingError::Validation(report) => {
            assert_eq!(
                report.fields(),
                vec!["localization_index", "units_per_package", "warehouse.pallet_rate"]
            );
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[test]
fn test_units_per_package_upper_bound() {
    let mut input = product_input();
    input.units_per_package = 1001;

    let err = PricingEngine::new().calculate_for_product(&input).unwrap_err();
    assert!(matches!(err, PricingError::Validation(ref r) if r.has_field("units_per_package")));
}

#[test]
fn test_short_turnover_shows_free_storage_period() {
    let mut input = product_input();
    input.turnover_days = 45;

    let pricing = PricingEngine::new().calculate_for_product(&input).unwrap();
    assert!(pricing.tariffs.storage.free_period);
    assert_eq!(pricing.result.fixed_costs.storage, 0.0);

    let breakdown = pricing.breakdown();
    let fixed = breakdown.section(SectionKind::Fixed).unwrap();
    let storage = fixed.lines.iter().find(|l| l.label == "Storage").unwrap();
    assert_eq!(storage.note, Some("free period"));
}

#[test]
#[serial]
fn test_engine_follows_environment_config() {
    std::env::set_var("PRICING_FREE_STORAGE_DAYS", "100");
    std::env::set_var("PRICING_OVERWEIGHT_MULTIPLIER", "2.0");

    let config = PricingConfig::from_env().unwrap();

    std::env::remove_var("PRICING_FREE_STORAGE_DAYS");
    std::env::remove_var("PRICING_OVERWEIGHT_MULTIPLIER");

    let engine = PricingEngine::with_config(config).unwrap();
    let mut input = product_input();
    input.weight_exceeds_25kg = true;

    let pricing = engine.calculate_for_product(&input).unwrap();
    assert!(pricing.tariffs.storage.free_period);
    assert_close(pricing.tariffs.logistics_forward, 120.0, 1e-9);
}
