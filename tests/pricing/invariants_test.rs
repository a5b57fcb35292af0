use seller_pricing::services::pricing::{
    aggregator::RateAccumulator, calculate_two_level_pricing, solver, tariff, FixedCosts, TaxType,
};

use crate::common::{reference_form, REFERENCE_COMMISSION_PCT};

// (fixed total, base rate, drr, margin)
const CASES: [(f64, f64, f64, f64); 6] = [
    (1753.0, 33.0, 5.0, 20.0),
    (100.0, 0.0, 0.0, 0.0),
    (250.5, 12.5, 0.0, 30.0),
    (10_000.0, 45.0, 15.0, 10.0),
    (0.01, 60.0, 10.0, 29.0),
    (4321.0, 99.0, 0.0, 0.5),
];

#[test]
fn test_minimum_price_reconstructs_fixed_total() {
    for (total, base, drr, margin) in CASES {
        let fixed = FixedCosts::new(total, 0.0, 0.0, 0.0, 0.0);
        let prices = solver::solve(&fixed, base, drr, margin, 0.0).unwrap();

        let reconstructed = prices.minimum_price * (1.0 - base / 100.0);
        let relative = (reconstructed - total).abs() / total;
        assert!(relative < 1e-6, "case {:?}: relative error {}", (total, base), relative);
    }
}

#[test]
fn test_recommended_never_below_minimum() {
    for (total, base, drr, margin) in CASES {
        let fixed = FixedCosts::new(total, 0.0, 0.0, 0.0, 0.0);
        let prices = solver::solve(&fixed, base, drr, margin, 0.0).unwrap();
        assert!(prices.recommended_price >= prices.minimum_price);
        assert!(prices.price_gap.rub >= 0.0);
    }
}

#[test]
fn test_recommended_price_grows_with_margin() {
    let mut previous_price = 0.0;
    let mut previous_gap = -1.0;

    for margin in [0.0, 5.0, 10.0, 20.0, 40.0, 60.0] {
        let mut form = reference_form();
        form.target_margin_pct = margin;

        let result = calculate_two_level_pricing(&form, REFERENCE_COMMISSION_PCT).unwrap();
        assert!(result.recommended_price > previous_price, "margin {}", margin);
        assert!(result.price_gap.rub > previous_gap, "margin {}", margin);

        previous_price = result.recommended_price;
        previous_gap = result.price_gap.rub;
    }
}

#[test]
fn test_tax_regimes_are_exclusive() {
    for tax_type in [TaxType::Income, TaxType::Profit] {
        let mut form = reference_form();
        form.tax_type = tax_type;

        let result = calculate_two_level_pricing(&form, REFERENCE_COMMISSION_PCT).unwrap();
        match tax_type {
            TaxType::Income => {
                assert!(result.percentage_costs.tax_income.is_some());
                assert!(result.margin.after_tax.is_none());
            }
            TaxType::Profit => {
                assert!(result.percentage_costs.tax_income.is_none());
                assert!(result.margin.after_tax.is_some());
            }
        }
    }
}

#[test]
fn test_repeat_calculation_is_bit_identical() {
    let first = calculate_two_level_pricing(&reference_form(), REFERENCE_COMMISSION_PCT).unwrap();
    let second = calculate_two_level_pricing(&reference_form(), REFERENCE_COMMISSION_PCT).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.recommended_price.to_bits(), second.recommended_price.to_bits());
    assert_eq!(first.customer_price.to_bits(), second.customer_price.to_bits());

    // Errors repeat as well
    let failed_first = calculate_two_level_pricing(&reference_form(), 90.0).unwrap_err();
    let failed_second = calculate_two_level_pricing(&reference_form(), 90.0).unwrap_err();
    assert_eq!(failed_first, failed_second);
}

#[test]
fn test_rates_are_summed_before_solving() {
    let form = reference_form();
    let rates = RateAccumulator::from_form(&form, REFERENCE_COMMISSION_PCT);

    // Subtracting each share from a running total gives a different, wrong answer
    let fixed_total = 1753.0;
    let summed = fixed_total / (1.0 - rates.base_rate_pct() / 100.0);
    let sequential = [25.0, 2.0, 6.0]
        .iter()
        .fold(fixed_total, |price, pct| price / (1.0 - pct / 100.0));

    let result = calculate_two_level_pricing(&form, REFERENCE_COMMISSION_PCT).unwrap();
    assert!((result.minimum_price - summed).abs() < 1e-9);
    assert!((result.minimum_price - sequential).abs() > 1.0);
}

#[test]
fn test_storage_free_period_boundary() {
    let at_limit = tariff::storage_cost(0.5, 60, 60);
    let past_limit = tariff::storage_cost(0.5, 61, 60);

    assert_eq!(at_limit.amount, 0.0);
    assert_eq!(past_limit.amount, 0.5);
}
