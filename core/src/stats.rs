//! Aggregator: summaries, percentages, benefit deltas and projections.
//!
//! An empty population never produces a number. Every function here returns
//! `None` when its denominator is zero, and callers render that as
//! "undefined" instead of zero.

use crate::cohort::Cohort;
use crate::schema::Column;
use serde::Serialize;

/// Months per year, for annualising monthly benefit impact.
pub const MONTHS_PER_YEAR: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub sum: f64,
}

impl FieldSummary {
    /// `None` for an empty input.
    pub fn compute(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut values: Vec<f64> = values.into_iter().collect();
        let median = median(&mut values)?;

        let count = values.len();
        let sum: f64 = values.iter().sum();
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(FieldSummary {
            count,
            mean: sum / count as f64,
            median,
            min,
            max,
            sum,
        })
    }
}

/// Median with the even-length midpoint convention. Sorts in place.
pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

/// `100 × part ÷ whole`, undefined for an empty reference population.
pub fn percentage(part: usize, whole: usize) -> Option<f64> {
    if whole == 0 {
        return None;
    }
    Some(100.0 * part as f64 / whole as f64)
}

/// Difference in percentage points; undefined if either side is.
pub fn point_difference(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    Some(a? - b?)
}

/// Mean benefit of a cohort against the correct-case mean, scaled by
/// cohort size. Linear extrapolation only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenefitDelta {
    pub cohort: String,
    pub cases: usize,
    pub cohort_mean: Option<f64>,
    pub reference_mean: Option<f64>,
    pub per_case: Option<f64>,
    pub aggregate: Option<f64>,
}

impl BenefitDelta {
    pub fn compute(cohort: &Cohort<'_>, reference: &Cohort<'_>) -> Self {
        let cohort_mean = cohort.mean(Column::Benefit);
        let reference_mean = reference.mean(Column::Benefit);
        let per_case = point_difference(cohort_mean, reference_mean);
        BenefitDelta {
            cohort: cohort.label.clone(),
            cases: cohort.len(),
            cohort_mean,
            reference_mean,
            per_case,
            aggregate: per_case.map(|d| d * cohort.len() as f64),
        }
    }
}

/// Case-weighted mean of per-case deltas. Cohorts with no cases carry no
/// weight and are skipped; an undefined delta on a non-empty cohort makes
/// the whole result undefined.
pub fn weighted_impact(deltas: &[BenefitDelta]) -> Option<f64> {
    let cases: usize = deltas.iter().map(|d| d.cases).sum();
    if cases == 0 {
        return None;
    }
    let mut total = 0.0;
    for delta in deltas.iter().filter(|d| d.cases > 0) {
        total += delta.aggregate?;
    }
    Some(total / cases as f64)
}

/// Sum of aggregate impact across non-empty cohorts.
pub fn total_impact(deltas: &[BenefitDelta]) -> Option<f64> {
    let mut total = 0.0;
    let mut any = false;
    for delta in deltas.iter().filter(|d| d.cases > 0) {
        total += delta.aggregate?;
        any = true;
    }
    any.then_some(total)
}

/// Point estimate of statewide impact. No error bars.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Projection {
    pub households: u64,
    /// Fraction in `[0, 1]`.
    pub sample_error_rate: f64,
    pub avg_impact_per_case: f64,
    pub projected_error_cases: f64,
    pub monthly_impact: f64,
    pub annual_impact: f64,
}

impl Projection {
    pub fn project(sample_error_rate: f64, avg_impact_per_case: f64, households: u64) -> Self {
        let projected_error_cases = sample_error_rate * households as f64;
        let monthly_impact = projected_error_cases * avg_impact_per_case;
        Projection {
            households,
            sample_error_rate,
            avg_impact_per_case,
            projected_error_cases,
            monthly_impact,
            annual_impact: monthly_impact * MONTHS_PER_YEAR,
        }
    }
}
