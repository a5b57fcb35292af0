//! Display-ready cost breakdown of a pricing result.

use serde::Serialize;

use super::tariff::StorageCost;
use super::types::{PercentageCost, TwoLevelPricingResult};

/// Round to kopecks
pub fn round_money(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Fixed,
    Percentage,
    Variable,
    Margin,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownLine {
    pub label: &'static str,
    pub rub: f64,
    pub pct: Option<f64>,
    pub note: Option<&'static str>,
}

impl BreakdownLine {
    fn amount(label: &'static str, rub: f64) -> Self {
        Self {
            label,
            rub: round_money(rub),
            pct: None,
            note: None,
        }
    }

    fn share(label: &'static str, cost: &PercentageCost) -> Self {
        Self {
            label,
            rub: round_money(cost.rub),
            pct: Some(cost.pct),
            note: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownSection {
    pub kind: SectionKind,
    pub lines: Vec<BreakdownLine>,
    pub total_rub: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub sections: Vec<BreakdownSection>,
}

impl CostBreakdown {
    /// `storage` is the resolved storage cost for FBO, so a free grace period
    /// can be told apart from a missing tariff.
    pub fn from_result(result: &TwoLevelPricingResult, storage: Option<&StorageCost>) -> Self {
        let fixed = &result.fixed_costs;
        let mut fixed_lines = vec![
            BreakdownLine::amount("COGS", fixed.cogs),
            BreakdownLine::amount("Logistics to customer", fixed.logistics_forward),
            BreakdownLine::amount("Return logistics", fixed.logistics_reverse_effective),
        ];
        match storage {
            Some(s) if s.free_period => fixed_lines.push(BreakdownLine {
                note: Some("free period"),
                ..BreakdownLine::amount("Storage", 0.0)
            }),
            _ if fixed.storage > 0.0 => fixed_lines.push(BreakdownLine::amount("Storage", fixed.storage)),
            _ => {}
        }
        if fixed.acceptance > 0.0 {
            fixed_lines.push(BreakdownLine::amount("Acceptance", fixed.acceptance));
        }

        let pct = &result.percentage_costs;
        let mut percentage_lines = vec![
            BreakdownLine::share("Marketplace commission", &pct.commission_wb),
            BreakdownLine::share("Acquiring", &pct.acquiring),
        ];
        if let Some(tax) = &pct.tax_income {
            percentage_lines.push(BreakdownLine::share("Income tax", tax));
        }
        if let Some(vat) = &pct.vat {
            percentage_lines.push(BreakdownLine::share("VAT", vat));
        }

        let mut sections = vec![
            BreakdownSection {
                kind: SectionKind::Fixed,
                lines: fixed_lines,
                total_rub: round_money(fixed.total),
            },
            BreakdownSection {
                kind: SectionKind::Percentage,
                lines: percentage_lines,
                total_rub: round_money(pct.total.rub),
            },
        ];

        if result.variable_costs.is_applicable() {
            sections.push(BreakdownSection {
                kind: SectionKind::Variable,
                lines: vec![BreakdownLine::share("Advertising (DRR)", &result.variable_costs.drr)],
                total_rub: round_money(result.variable_costs.total.rub),
            });
        }

        let margin = &result.margin;
        let mut margin_lines = vec![BreakdownLine::share(
            "Margin",
            &PercentageCost { pct: margin.pct, rub: margin.rub },
        )];
        if let Some(after_tax) = margin.after_tax {
            margin_lines.push(BreakdownLine::amount("Margin after profit tax", after_tax));
        }
        sections.push(BreakdownSection {
            kind: SectionKind::Margin,
            lines: margin_lines,
            total_rub: round_money(margin.rub),
        });

        Self { sections }
    }

    pub fn section(&self, kind: SectionKind) -> Option<&BreakdownSection> {
        self.sections.iter().find(|s| s.kind == kind)
    }
}
