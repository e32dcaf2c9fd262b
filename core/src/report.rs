//! Structured report rows shared by the analyses.
//!
//! These are pure data. Rendering lives with the caller.

use crate::cohort::{Cohort, IndicatorSplit};
use crate::schema::Column;
use crate::stats::{self, FieldSummary};
use serde::Serialize;

/// A labelled count and its share of some reference population.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Share {
    pub label: String,
    pub count: usize,
    pub pct: Option<f64>,
}

impl Share {
    pub fn of(cohort: &Cohort<'_>, reference: usize) -> Self {
        Share {
            label: cohort.label.clone(),
            count: cohort.len(),
            pct: cohort.share_of(reference),
        }
    }
}

/// Error rate within one cohort.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateRow {
    pub label: String,
    pub errors: usize,
    pub cases: usize,
    pub error_rate_pct: Option<f64>,
}

impl RateRow {
    pub fn of(cohort: &Cohort<'_>) -> Self {
        RateRow {
            label: cohort.label.clone(),
            errors: cohort.error_count(),
            cases: cohort.len(),
            error_rate_pct: cohort.error_rate_pct(),
        }
    }
}

/// Error rate with vs. without a binary indicator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorComparison {
    pub column: Column,
    pub label: String,
    pub with: RateRow,
    pub without: RateRow,
    pub difference_pp: Option<f64>,
}

impl IndicatorComparison {
    pub fn of(split: &IndicatorSplit<'_>) -> Self {
        let with = RateRow::of(&split.present);
        let without = RateRow::of(&split.absent);
        IndicatorComparison {
            column: split.column,
            label: split.column.label().to_string(),
            difference_pp: stats::point_difference(with.error_rate_pct, without.error_rate_pct),
            with,
            without,
        }
    }
}

/// Summary of one numeric field for one cohort.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortSummary {
    pub cohort: String,
    pub cases: usize,
    pub summary: Option<FieldSummary>,
}

impl CohortSummary {
    pub fn of(cohort: &Cohort<'_>, column: Column) -> Self {
        CohortSummary {
            cohort: cohort.label.clone(),
            cases: cohort.len(),
            summary: cohort.summary(column),
        }
    }
}

/// Bucket counts within one cohort, as shares of that cohort.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    pub cohort: String,
    pub buckets: Vec<Share>,
}
