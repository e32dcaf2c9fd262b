//! qc-report: text reports over a SNAP QC public-use extract.
//!
//! Usage:
//!   qc-report overview --input data/qc_pub_fy2023.csv
//!   qc-report error-impact --state Mississippi --households 369000
//!   qc-report all --config qc.json

mod render;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use snapqc_core::{AnalysisConfig, AnalysisKind, CohortAnalyzer};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "qc-report")]
#[command(version)]
#[command(about = "Cohort comparison reports over SNAP Quality Control microdata", long_about = None)]
struct Cli {
    /// Which report to produce
    #[arg(value_enum)]
    report: ReportArg,

    /// Path to the QC CSV extract
    #[arg(short, long, default_value = "data/qc_pub_fy2023.csv")]
    input: PathBuf,

    /// JSON config file (target state, statewide households, row threshold)
    #[arg(short, long)]
    config: Option<String>,

    /// Override the target state
    #[arg(long)]
    state: Option<String>,

    /// Override the statewide household estimate used for projections
    #[arg(long)]
    households: Option<u64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ReportArg {
    Overview,
    ErrorTypes,
    ErrorImpact,
    All,
}

impl ReportArg {
    fn kinds(self) -> Vec<AnalysisKind> {
        match self {
            ReportArg::Overview => vec![AnalysisKind::Overview],
            ReportArg::ErrorTypes => vec![AnalysisKind::ErrorTypes],
            ReportArg::ErrorImpact => vec![AnalysisKind::ErrorImpact],
            ReportArg::All => AnalysisKind::ALL.to_vec(),
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::load(path)?,
        None => AnalysisConfig::default(),
    };
    if let Some(state) = cli.state {
        config = config.with_state(state);
    }
    if let Some(households) = cli.households {
        config = config.with_statewide_households(households);
    }
    log::debug!("config: {config:?}");

    let analyzer = CohortAnalyzer::new(config);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for kind in cli.report.kinds() {
        let report = analyzer.run_kind(&cli.input, kind)?;
        render::render(&mut out, &report)?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}
