use validator::{Validate, ValidationErrors};

use super::types::{FieldViolation, PricingError, ProductPricingInput, TwoLevelPricingFormData, ValidationReport};

fn collect(errors: &ValidationErrors, prefix: Option<&str>, report: &mut ValidationReport) {
    for (field, field_errors) in errors.field_errors() {
        let field = match prefix {
            Some(prefix) => format!("{}.{}", prefix, field),
            None => field.to_string(),
        };
        for err in field_errors.iter() {
            let message = err
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| describe(&err.code, err.params.get("min"), err.params.get("max")));
            report.violations.push(FieldViolation {
                field: field.clone(),
                code: err.code.to_string(),
                message,
            });
        }
    }
}

fn describe(code: &str, min: Option<&serde_json::Value>, max: Option<&serde_json::Value>) -> String {
    match (code, min, max) {
        ("range", Some(min), Some(max)) => format!("must be between {} and {}", min, max),
        ("range", Some(min), None) => format!("must be at least {}", min),
        ("range", None, Some(max)) => format!("must be at most {}", max),
        ("finite", _, _) => "must be a finite number".to_string(),
        _ => format!("failed {} check", code),
    }
}

fn check(result: Result<(), ValidationErrors>, prefix: Option<&str>, report: &mut ValidationReport) {
    if let Err(errors) = result {
        collect(&errors, prefix, report);
    }
}

fn check_commission(commission_pct: f64, report: &mut ValidationReport) {
    if !commission_pct.is_finite() || !(0.0..=100.0).contains(&commission_pct) {
        report.violations.push(FieldViolation {
            field: "commission_pct".to_string(),
            code: "range".to_string(),
            message: "must be between 0 and 100".to_string(),
        });
    }
}

fn finish(mut report: ValidationReport) -> Result<(), PricingError> {
    if report.is_empty() {
        return Ok(());
    }
    report
        .violations
        .sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.code.cmp(&b.code)));
    tracing::warn!(fields = ?report.fields(), "Rejected pricing input");
    Err(PricingError::Validation(report))
}

/// Validate a form snapshot and the resolved commission rate together
pub fn validate_form(form: &TwoLevelPricingFormData, commission_pct: f64) -> Result<(), PricingError> {
    let mut report = ValidationReport::default();
    check(form.validate(), None, &mut report);
    check_commission(commission_pct, &mut report);
    finish(report)
}

/// Validate raw product inputs, including the nested tariff and commission tables
pub fn validate_product(input: &ProductPricingInput) -> Result<(), PricingError> {
    let mut report = ValidationReport::default();
    check(input.validate(), None, &mut report);
    check(input.warehouse.validate(), Some("warehouse"), &mut report);
    check(input.commission.validate(), Some("commission"), &mut report);
    finish(report)
}
