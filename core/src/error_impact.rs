//! Error-impact analysis: how much money the errors move.
//!
//! Benefit levels per status cohort, the delta against correct cases,
//! error rates by household characteristics and a statewide projection.

use crate::{
    analysis::CohortAnalysis,
    cohort::{bucketize, group_by, partition_by_status, split_by_indicator},
    config::AnalysisConfig,
    dataset::Dataset,
    error::QcResult,
    report::{CohortSummary, Distribution, IndicatorComparison, RateRow, Share},
    schema::{AnalysisKind, Column, BENEFIT_BUCKETS, COMPOSITION_FLAGS, POVERTY_BUCKETS},
    stats::{self, BenefitDelta, Projection},
};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ErrorImpactReport {
    pub state: String,
    pub sample_size: usize,
    pub statuses: Vec<Share>,
    pub benefits: Vec<CohortSummary>,
    /// Payment errors and error cases against the correct-case mean.
    pub deltas: Vec<BenefitDelta>,
    pub total_sample_impact: Option<f64>,
    pub by_household_size: Vec<RateRow>,
    pub by_poverty: Vec<RateRow>,
    pub by_composition: Vec<IndicatorComparison>,
    /// Undefined when the sample has no errors or no correct cases.
    pub projection: Option<Projection>,
    pub benefit_distribution: Vec<Distribution>,
    pub warnings: Vec<String>,
}

pub struct ErrorImpactAnalysis;

impl CohortAnalysis for ErrorImpactAnalysis {
    type Report = ErrorImpactReport;

    fn kind(&self) -> AnalysisKind {
        AnalysisKind::ErrorImpact
    }

    fn analyze(&self, dataset: &Dataset, config: &AnalysisConfig) -> QcResult<ErrorImpactReport> {
        let all = dataset.cohort();
        let n = all.len();

        let partition = partition_by_status(&all)?;
        let statuses = partition.iter().map(|(_, c)| Share::of(c, n)).collect();
        let benefits = partition
            .iter()
            .map(|(_, c)| CohortSummary::of(c, Column::Benefit))
            .collect();

        let deltas = vec![
            BenefitDelta::compute(&partition.payment_error, &partition.correct),
            BenefitDelta::compute(&partition.error_case, &partition.correct),
        ];
        let total_sample_impact = stats::total_impact(&deltas);

        let by_household_size = group_by(
            &all,
            |r| r.household_size(),
            |size| format!("{size} person(s)"),
        )
        .iter()
        .map(|(_, c)| RateRow::of(c))
        .collect();

        let by_poverty = bucketize(&all, Column::PovertyRatio, &POVERTY_BUCKETS)
            .cohorts
            .iter()
            .filter(|(_, c)| !c.is_empty())
            .map(|(_, c)| RateRow::of(c))
            .collect();

        let by_composition = COMPOSITION_FLAGS
            .into_iter()
            .map(|c| IndicatorComparison::of(&split_by_indicator(&all, c)))
            .collect();

        // Dataset loading guarantees n > 0.
        let projection = stats::weighted_impact(&deltas).map(|impact| {
            let rate = all.error_count() as f64 / n as f64;
            Projection::project(rate, impact, config.statewide_households)
        });
        if let Some(p) = &projection {
            log::info!(
                "Projected {:.0} error cases statewide, ${:.0}/month",
                p.projected_error_cases,
                p.monthly_impact
            );
        }

        let benefit_distribution = partition
            .iter()
            .map(|(_, c)| {
                let split = bucketize(c, Column::Benefit, &BENEFIT_BUCKETS);
                Distribution {
                    cohort: c.label.clone(),
                    buckets: split
                        .cohorts
                        .iter()
                        .map(|(_, b)| Share::of(b, c.len()))
                        .collect(),
                }
            })
            .collect();

        Ok(ErrorImpactReport {
            state: dataset.state.clone(),
            sample_size: n,
            statuses,
            benefits,
            deltas,
            total_sample_impact,
            by_household_size,
            by_poverty,
            by_composition,
            projection,
            benefit_distribution,
            warnings: dataset.warnings.clone(),
        })
    }
}
