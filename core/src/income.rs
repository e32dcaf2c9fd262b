//! Income-complexity deriver.
//!
//! Counts positive income sources per household and uses that count,
//! together with total deductions, to carve out high- and low-risk profiles.

use crate::{
    cohort::{group_by, Cohort},
    dataset::QcRecord,
    schema::Column,
    stats,
};

/// Households with at least this many sources are "complex".
pub const COMPLEX_INCOME_SOURCES: usize = 2;

/// Number of `sources` with a strictly positive amount. Always in `[0, sources.len()]`.
pub fn income_source_count(record: &QcRecord, sources: &[Column]) -> usize {
    sources.iter().filter(|&&c| record.is_positive(c)).count()
}

/// Fill the derived `income_sources` attribute on every record.
pub fn annotate_income_sources(records: &mut [QcRecord], sources: &[Column]) {
    for record in records.iter_mut() {
        record.income_sources = Some(income_source_count(record, sources));
    }
}

/// One cohort per distinct source count, ascending.
pub fn complexity_tiers<'a>(all: &Cohort<'a>) -> Vec<(usize, Cohort<'a>)> {
    group_by(all, |r| r.income_sources, |n| format!("{n} income source(s)"))
}

#[derive(Debug, Clone)]
pub struct RiskProfiles<'a> {
    /// Median of total deductions across the reference population.
    pub deduction_median: Option<f64>,
    /// Two or more sources and above-median deductions.
    pub complex: Cohort<'a>,
    /// At most one source and deductions at or below the median.
    pub simple: Cohort<'a>,
}

pub fn risk_profiles<'a>(all: &Cohort<'a>) -> RiskProfiles<'a> {
    let mut deductions: Vec<f64> = all.values(Column::TotalDeductions).collect();
    let deduction_median = stats::median(&mut deductions);

    let high_deduction = |r: &QcRecord| match (r.value(Column::TotalDeductions), deduction_median) {
        (Some(v), Some(m)) => v > m,
        _ => false,
    };
    let complex_income =
        |r: &QcRecord| r.income_sources.is_some_and(|n| n >= COMPLEX_INCOME_SOURCES);

    RiskProfiles {
        deduction_median,
        complex: all.filter("Complex cases", |r| complex_income(r) && high_deduction(r)),
        simple: all.filter("Simple cases", |r| !complex_income(r) && !high_deduction(r)),
    }
}
