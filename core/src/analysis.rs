//! Analysis trait and the shared pipeline driver.
//!
//! RULE: every report is produced by the same sequence:
//!   1. Load and validate the columns the analysis declares
//!   2. Filter to the configured state
//!   3. Range-check and derive the income-source count
//!   4. Hand the dataset to the analysis for pure computation
//!
//! Nothing here prints. Rendering consumes the returned report.

use crate::{
    config::AnalysisConfig,
    dataset::Dataset,
    error::QcResult,
    error_impact::{ErrorImpactAnalysis, ErrorImpactReport},
    error_types::{ErrorTypesAnalysis, ErrorTypesReport},
    overview::{OverviewAnalysis, OverviewReport},
    schema::{AnalysisKind, Column},
};
use serde::Serialize;
use std::path::Path;

/// The contract every analysis fulfils.
pub trait CohortAnalysis {
    type Report;

    fn kind(&self) -> AnalysisKind;

    fn required_columns(&self) -> &'static [Column] {
        self.kind().required_columns()
    }

    /// Pure computation over an already validated dataset.
    fn analyze(&self, dataset: &Dataset, config: &AnalysisConfig) -> QcResult<Self::Report>;
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Report {
    Overview(OverviewReport),
    ErrorTypes(ErrorTypesReport),
    ErrorImpact(ErrorImpactReport),
}

impl Report {
    pub fn kind(&self) -> AnalysisKind {
        match self {
            Report::Overview(_) => AnalysisKind::Overview,
            Report::ErrorTypes(_) => AnalysisKind::ErrorTypes,
            Report::ErrorImpact(_) => AnalysisKind::ErrorImpact,
        }
    }
}

pub struct CohortAnalyzer {
    pub config: AnalysisConfig,
}

impl CohortAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Load `path` with the columns `analysis` needs and run it.
    pub fn run<A: CohortAnalysis>(&self, path: &Path, analysis: &A) -> QcResult<A::Report> {
        let dataset = Dataset::load(path, analysis.required_columns(), &self.config)?;
        self.analyze(&dataset, analysis)
    }

    pub fn analyze<A: CohortAnalysis>(&self, dataset: &Dataset, analysis: &A) -> QcResult<A::Report> {
        log::info!(
            "Running {:?} over {} {} cases",
            analysis.kind(),
            dataset.len(),
            dataset.state
        );
        analysis.analyze(dataset, &self.config)
    }

    pub fn run_kind(&self, path: &Path, kind: AnalysisKind) -> QcResult<Report> {
        Ok(match kind {
            AnalysisKind::Overview => Report::Overview(self.run(path, &OverviewAnalysis)?),
            AnalysisKind::ErrorTypes => Report::ErrorTypes(self.run(path, &ErrorTypesAnalysis)?),
            AnalysisKind::ErrorImpact => Report::ErrorImpact(self.run(path, &ErrorImpactAnalysis)?),
        })
    }
}
