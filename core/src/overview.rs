//! Overview analysis: who is in the sample and how often cases are wrong.
//!
//! Household size, poverty bands, benefit levels, status mix and
//! composition flags for the filtered state.

use crate::{
    analysis::CohortAnalysis,
    cohort::{bucketize, group_by, partition_by_status, split_by_indicator},
    config::AnalysisConfig,
    dataset::Dataset,
    error::QcResult,
    report::Share,
    schema::{AnalysisKind, Column, COMPOSITION_FLAGS, POVERTY_BUCKETS},
    stats::{self, FieldSummary},
};
use serde::Serialize;

/// SNAP gross income eligibility line, as a percentage of FPL.
pub const ELIGIBILITY_LINE_PCT: f64 = 130.0;

#[derive(Debug, Clone, Serialize)]
pub struct OverviewReport {
    pub state: String,
    pub sample_size: usize,
    pub mean_household_size: Option<f64>,
    pub total_persons: f64,
    pub poverty: Vec<Share>,
    pub poverty_coverage_pct: Option<f64>,
    pub benefit: Option<FieldSummary>,
    pub household_sizes: Vec<Share>,
    pub statuses: Vec<Share>,
    pub error_rate_pct: Option<f64>,
    pub demographics: Vec<Share>,
    pub at_or_below_eligibility_pct: Option<f64>,
    pub warnings: Vec<String>,
}

pub struct OverviewAnalysis;

impl CohortAnalysis for OverviewAnalysis {
    type Report = OverviewReport;

    fn kind(&self) -> AnalysisKind {
        AnalysisKind::Overview
    }

    fn analyze(&self, dataset: &Dataset, _config: &AnalysisConfig) -> QcResult<OverviewReport> {
        let all = dataset.cohort();
        let n = all.len();
        let mut warnings = dataset.warnings.clone();

        let household = all.summary(Column::HouseholdSize);

        let poverty_split = bucketize(&all, Column::PovertyRatio, &POVERTY_BUCKETS);
        let poverty = poverty_split
            .cohorts
            .iter()
            .map(|(_, c)| Share::of(c, n))
            .collect();
        if poverty_split.uncovered > 0 {
            let msg = format!(
                "{} cases fall outside the poverty bands ({:.1}% covered)",
                poverty_split.uncovered,
                poverty_split.coverage_pct().unwrap_or(0.0)
            );
            log::warn!("{msg}");
            warnings.push(msg);
        }

        let household_sizes = group_by(
            &all,
            |r| r.household_size(),
            |size| format!("{size} person(s)"),
        )
        .iter()
        .map(|(_, c)| Share::of(c, n))
        .collect();

        let partition = partition_by_status(&all)?;
        let statuses = partition
            .iter()
            .filter(|(_, c)| !c.is_empty())
            .map(|(status, c)| Share {
                label: status.label().to_string(),
                count: c.len(),
                pct: c.share_of(n),
            })
            .collect();

        let demographics = COMPOSITION_FLAGS
            .into_iter()
            .filter(|&c| dataset.has_column(c))
            .map(|c| {
                let split = split_by_indicator(&all, c);
                Share {
                    label: format!("Households {}", c.label().to_lowercase()),
                    count: split.present.len(),
                    pct: split.present.share_of(n),
                }
            })
            .collect();

        let eligible = all.count_where(|r| {
            r.value(Column::PovertyRatio)
                .is_some_and(|v| v <= ELIGIBILITY_LINE_PCT)
        });

        Ok(OverviewReport {
            state: dataset.state.clone(),
            sample_size: n,
            mean_household_size: household.map(|s| s.mean),
            total_persons: household.map_or(0.0, |s| s.sum),
            poverty,
            poverty_coverage_pct: poverty_split.coverage_pct(),
            benefit: all.summary(Column::Benefit),
            household_sizes,
            statuses,
            error_rate_pct: all.error_rate_pct(),
            demographics,
            at_or_below_eligibility_pct: stats::percentage(eligible, n),
            warnings,
        })
    }
}
