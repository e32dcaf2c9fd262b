//! Cohort partitioner.
//!
//! A cohort borrows records from the dataset; nothing is copied or mutated.
//! Three split shapes are supported:
//!   1. By status code: an exact three-way partition, checked.
//!   2. By a binary indicator: present (> 0) vs absent, exhaustive by construction.
//!   3. By half-open buckets: disjoint, but rows outside every bucket are dropped.

use crate::{
    dataset::QcRecord,
    error::{QcError, QcResult},
    schema::Column,
    stats::{self, FieldSummary},
    types::{Bucket, CaseStatus},
};
use std::collections::BTreeMap;

/// Share sums may drift this far from 100 before the partition is rejected.
pub const PERCENT_TOLERANCE: f64 = 0.1;

#[derive(Debug, Clone)]
pub struct Cohort<'a> {
    pub label: String,
    pub records: Vec<&'a QcRecord>,
}

impl<'a> Cohort<'a> {
    pub fn new(label: impl Into<String>, records: impl IntoIterator<Item = &'a QcRecord>) -> Self {
        Self {
            label: label.into(),
            records: records.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sub-cohort of the records matching `pred`.
    pub fn filter(&self, label: impl Into<String>, pred: impl Fn(&QcRecord) -> bool) -> Cohort<'a> {
        Cohort::new(label, self.records.iter().copied().filter(|&r| pred(r)))
    }

    /// Defined values of `column`; records without a value are skipped.
    pub fn values(&self, column: Column) -> impl Iterator<Item = f64> + '_ {
        self.records.iter().filter_map(move |r| r.value(column))
    }

    pub fn summary(&self, column: Column) -> Option<FieldSummary> {
        FieldSummary::compute(self.values(column))
    }

    pub fn mean(&self, column: Column) -> Option<f64> {
        self.summary(column).map(|s| s.mean)
    }

    pub fn count_where(&self, pred: impl Fn(&QcRecord) -> bool) -> usize {
        self.records.iter().filter(|&&r| pred(r)).count()
    }

    pub fn error_count(&self) -> usize {
        self.count_where(|r| r.status.is_error())
    }

    /// Percentage of this cohort flagged as payment error or error case.
    pub fn error_rate_pct(&self) -> Option<f64> {
        stats::percentage(self.error_count(), self.len())
    }

    /// Percentage of `reference` that this cohort represents.
    pub fn share_of(&self, reference: usize) -> Option<f64> {
        stats::percentage(self.len(), reference)
    }
}

/// Correct / payment-error / error-case partition of a cohort.
#[derive(Debug, Clone)]
pub struct StatusPartition<'a> {
    pub correct: Cohort<'a>,
    pub payment_error: Cohort<'a>,
    pub error_case: Cohort<'a>,
}

impl<'a> StatusPartition<'a> {
    pub fn get(&self, status: CaseStatus) -> &Cohort<'a> {
        match status {
            CaseStatus::Correct => &self.correct,
            CaseStatus::PaymentError => &self.payment_error,
            CaseStatus::ErrorCase => &self.error_case,
        }
    }

    /// Cohorts in status-code order.
    pub fn iter(&self) -> impl Iterator<Item = (CaseStatus, &Cohort<'a>)> {
        CaseStatus::ALL.into_iter().map(move |s| (s, self.get(s)))
    }

    pub fn total(&self) -> usize {
        self.correct.len() + self.payment_error.len() + self.error_case.len()
    }
}

pub fn partition_by_status<'a>(all: &Cohort<'a>) -> QcResult<StatusPartition<'a>> {
    let by = |status: CaseStatus| all.filter(status.cohort_name(), move |r| r.status == status);
    let partition = StatusPartition {
        correct: by(CaseStatus::Correct),
        payment_error: by(CaseStatus::PaymentError),
        error_case: by(CaseStatus::ErrorCase),
    };

    let total = partition.total();
    if total != all.len() {
        return Err(QcError::InvariantViolation(format!(
            "case counts don't match total: {total} != {}",
            all.len()
        )));
    }
    if !all.is_empty() {
        let pct: f64 = partition
            .iter()
            .filter_map(|(_, c)| c.share_of(all.len()))
            .sum();
        check_percent_total("status", pct)?;
    }

    log::debug!(
        "status partition: correct={} payment_error={} error_case={}",
        partition.correct.len(),
        partition.payment_error.len(),
        partition.error_case.len()
    );
    Ok(partition)
}

/// Fails when shares of a true partition stray from 100%.
pub fn check_percent_total(what: &str, pct: f64) -> QcResult<()> {
    if (pct - 100.0).abs() >= PERCENT_TOLERANCE {
        return Err(QcError::InvariantViolation(format!(
            "{what} percentages don't sum to 100%: {pct:.1}%"
        )));
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct IndicatorSplit<'a> {
    pub column: Column,
    pub present: Cohort<'a>,
    pub absent: Cohort<'a>,
}

/// Present means a strictly positive value; everything else is absent.
pub fn split_by_indicator<'a>(all: &Cohort<'a>, column: Column) -> IndicatorSplit<'a> {
    let (present, absent): (Vec<&QcRecord>, Vec<&QcRecord>) =
        all.records.iter().copied().partition(|r| r.is_positive(column));
    IndicatorSplit {
        column,
        present: Cohort::new(format!("With {}", column.label()), present),
        absent: Cohort::new(format!("Without {}", column.label()), absent),
    }
}

#[derive(Debug, Clone)]
pub struct BucketedSplit<'a> {
    pub cohorts: Vec<(Bucket, Cohort<'a>)>,
    /// Rows with no value or a value outside every bucket.
    pub uncovered: usize,
    pub population: usize,
}

impl BucketedSplit<'_> {
    pub fn covered(&self) -> usize {
        self.population - self.uncovered
    }

    pub fn coverage_pct(&self) -> Option<f64> {
        stats::percentage(self.covered(), self.population)
    }
}

/// Buckets must be non-overlapping; each record lands in at most one.
pub fn bucketize<'a>(all: &Cohort<'a>, column: Column, buckets: &[Bucket]) -> BucketedSplit<'a> {
    let cohorts: Vec<(Bucket, Cohort<'a>)> = buckets
        .iter()
        .map(|&b| {
            let cohort = all.filter(b.label, |r| r.value(column).is_some_and(|v| b.contains(v)));
            (b, cohort)
        })
        .collect();
    let covered: usize = cohorts.iter().map(|(_, c)| c.len()).sum();
    BucketedSplit {
        cohorts,
        uncovered: all.len() - covered,
        population: all.len(),
    }
}

/// Group by a derived key, in ascending key order. Records with no key are skipped.
pub fn group_by<'a, K: Ord>(
    all: &Cohort<'a>,
    key: impl Fn(&QcRecord) -> Option<K>,
    label: impl Fn(&K) -> String,
) -> Vec<(K, Cohort<'a>)> {
    let mut groups: BTreeMap<K, Vec<&'a QcRecord>> = BTreeMap::new();
    for &record in &all.records {
        if let Some(k) = key(record) {
            groups.entry(k).or_default().push(record);
        }
    }
    groups
        .into_iter()
        .map(|(k, records)| {
            let cohort = Cohort::new(label(&k), records);
            (k, cohort)
        })
        .collect()
}
