//! Cohort comparison engine for SNAP Quality Control microdata.
//!
//! Loads one state's QC cases, validates them, partitions them into
//! cohorts and returns structured summary reports. Rendering is left to
//! the caller.

pub mod analysis;
pub mod cohort;
pub mod config;
pub mod dataset;
pub mod error;
pub mod error_impact;
pub mod error_types;
pub mod income;
pub mod overview;
pub mod report;
pub mod schema;
pub mod stats;
pub mod types;

pub use analysis::{CohortAnalysis, CohortAnalyzer, Report};
pub use config::AnalysisConfig;
pub use dataset::{Dataset, QcRecord};
pub use error::{QcError, QcResult};
pub use schema::{AnalysisKind, Column};
pub use types::CaseStatus;
