//! Error-type analysis: income reporting vs. deduction calculation.
//!
//! Compares income sources, deductions and the gross → net → benefit flow
//! across status cohorts, then cuts error rates by income complexity and
//! by the presence of wages, medical and shelter deductions.

use crate::{
    analysis::CohortAnalysis,
    cohort::{partition_by_status, split_by_indicator, Cohort},
    config::AnalysisConfig,
    dataset::Dataset,
    error::QcResult,
    income::{complexity_tiers, risk_profiles},
    report::{IndicatorComparison, RateRow},
    schema::{AnalysisKind, Column, DEDUCTIONS, INCOME_SOURCES},
    stats,
};
use serde::Serialize;

/// Allowed gap between `gross - deductions` and reported net income.
pub const NET_INCOME_TOLERANCE: f64 = 5.0;

/// Share of discrepant rows above which the calculation flow is flagged.
pub const DISCREPANCY_WARNING_FRACTION: f64 = 0.1;

/// Indicators tested for an error-rate gap.
pub const PATTERN_COLUMNS: [Column; 3] = [
    Column::Wages,
    Column::MedicalDeduction,
    Column::ShelterDeduction,
];

/// How often a cohort carries a positive amount in one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresenceRow {
    pub cohort: String,
    pub cases_with: usize,
    pub pct: Option<f64>,
    pub mean_positive: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmountBreakdown {
    pub column: Column,
    pub label: String,
    pub rows: Vec<PresenceRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncomeProfile {
    pub cohort: String,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub zero_count: usize,
    pub zero_pct: Option<f64>,
}

/// Mean of each step in the benefit calculation for one cohort.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowRow {
    pub cohort: String,
    pub gross: Option<f64>,
    pub deductions: Option<f64>,
    pub net: Option<f64>,
    pub benefit: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskSummary {
    pub deduction_median: Option<f64>,
    pub complex: RateRow,
    pub simple: RateRow,
    pub difference_pp: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorTypesReport {
    pub state: String,
    pub sample_size: usize,
    pub income_sources: Vec<AmountBreakdown>,
    pub deductions: Vec<AmountBreakdown>,
    pub gross_income: Vec<IncomeProfile>,
    pub net_income: Vec<IncomeProfile>,
    pub flow: Vec<FlowRow>,
    pub net_income_discrepancies: usize,
    pub complexity: Vec<RateRow>,
    pub patterns: Vec<IndicatorComparison>,
    pub risk: RiskSummary,
    pub warnings: Vec<String>,
}

pub struct ErrorTypesAnalysis;

impl CohortAnalysis for ErrorTypesAnalysis {
    type Report = ErrorTypesReport;

    fn kind(&self) -> AnalysisKind {
        AnalysisKind::ErrorTypes
    }

    fn analyze(&self, dataset: &Dataset, _config: &AnalysisConfig) -> QcResult<ErrorTypesReport> {
        let all = dataset.cohort();
        let mut warnings = dataset.warnings.clone();

        let partition = partition_by_status(&all)?;
        let cohorts: Vec<&Cohort<'_>> = partition.iter().map(|(_, c)| c).collect();

        let breakdowns = |columns: &[Column]| -> Vec<AmountBreakdown> {
            columns
                .iter()
                .filter(|&&c| dataset.has_column(c))
                .map(|&c| AmountBreakdown {
                    column: c,
                    label: c.label().to_string(),
                    rows: cohorts.iter().map(|cohort| presence(cohort, c)).collect(),
                })
                .collect()
        };
        let income_sources = breakdowns(&INCOME_SOURCES[..]);
        let deductions = breakdowns(&DEDUCTIONS[..]);

        let gross_income = cohorts
            .iter()
            .map(|c| income_profile(c, Column::GrossIncome))
            .collect();
        let net_income = cohorts
            .iter()
            .map(|c| income_profile(c, Column::NetIncome))
            .collect();

        let flow = cohorts
            .iter()
            .map(|c| FlowRow {
                cohort: c.label.clone(),
                gross: c.mean(Column::GrossIncome),
                deductions: c.mean(Column::TotalDeductions),
                net: c.mean(Column::NetIncome),
                benefit: c.mean(Column::Benefit),
            })
            .collect();

        let net_income_discrepancies = all.count_where(|r| {
            match (
                r.value(Column::GrossIncome),
                r.value(Column::TotalDeductions),
                r.value(Column::NetIncome),
            ) {
                (Some(gross), Some(ded), Some(net)) => {
                    ((gross - ded) - net).abs() > NET_INCOME_TOLERANCE
                }
                _ => false,
            }
        });
        if net_income_discrepancies as f64 > all.len() as f64 * DISCREPANCY_WARNING_FRACTION {
            let msg = format!(
                "{net_income_discrepancies} cases have large net income discrepancies; \
                 this suggests data quality issues or complex deduction rules"
            );
            log::warn!("{msg}");
            warnings.push(msg);
        }

        let complexity = complexity_tiers(&all)
            .iter()
            .map(|(_, c)| RateRow::of(c))
            .collect();

        let patterns = PATTERN_COLUMNS
            .into_iter()
            .filter(|&c| dataset.has_column(c))
            .map(|c| IndicatorComparison::of(&split_by_indicator(&all, c)))
            .collect();

        let profiles = risk_profiles(&all);
        let complex = RateRow::of(&profiles.complex);
        let simple = RateRow::of(&profiles.simple);
        let risk = RiskSummary {
            deduction_median: profiles.deduction_median,
            difference_pp: stats::point_difference(complex.error_rate_pct, simple.error_rate_pct),
            complex,
            simple,
        };

        Ok(ErrorTypesReport {
            state: dataset.state.clone(),
            sample_size: all.len(),
            income_sources,
            deductions,
            gross_income,
            net_income,
            flow,
            net_income_discrepancies,
            complexity,
            patterns,
            risk,
            warnings,
        })
    }
}

fn presence(cohort: &Cohort<'_>, column: Column) -> PresenceRow {
    let positive = cohort.filter(cohort.label.clone(), |r| r.is_positive(column));
    PresenceRow {
        cohort: cohort.label.clone(),
        cases_with: positive.len(),
        pct: positive.share_of(cohort.len()),
        mean_positive: positive.mean(column),
    }
}

fn income_profile(cohort: &Cohort<'_>, column: Column) -> IncomeProfile {
    let summary = cohort.summary(column);
    let zero_count = cohort.count_where(|r| r.value(column) == Some(0.0));
    IncomeProfile {
        cohort: cohort.label.clone(),
        mean: summary.map(|s| s.mean),
        median: summary.map(|s| s.median),
        zero_count,
        zero_pct: stats::percentage(zero_count, cohort.len()),
    }
}
