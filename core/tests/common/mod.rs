//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;
use snapqc_core::{AnalysisConfig, CaseStatus, Column, Dataset, QcRecord};
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

pub const STATE: &str = "Mississippi";

/// Every catalog header, in catalog order.
pub fn full_header() -> String {
    Column::ALL
        .iter()
        .map(|c| c.header())
        .collect::<Vec<_>>()
        .join(",")
}

/// Config that keeps the synthetic fixtures below the low-row warning noise.
pub fn test_config() -> AnalysisConfig {
    AnalysisConfig {
        min_expected_rows: 1,
        ..AnalysisConfig::default()
    }
}

/// One CSV line for `record` under `full_header()`.
pub fn csv_line(state: &str, record: &QcRecord) -> String {
    Column::ALL
        .iter()
        .map(|&c| match c {
            Column::StateName => state.to_string(),
            Column::StateCode => "28".to_string(),
            _ => record.value(c).map(|v| v.to_string()).unwrap_or_default(),
        })
        .collect::<Vec<_>>()
        .join(",")
}

pub fn to_csv(records: &[QcRecord]) -> String {
    let mut out = full_header();
    out.push('\n');
    for r in records {
        out.push_str(&csv_line(STATE, r));
        out.push('\n');
    }
    out
}

/// Writes `contents` into a fresh temp dir. Keep the dir alive for the test.
pub fn write_csv(contents: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("qc_pub_fy2023.csv");
    let mut file = std::fs::File::create(&path).expect("create csv");
    file.write_all(contents.as_bytes()).expect("write csv");
    (dir, path)
}

/// A plausible household with every catalog column populated.
pub fn household(row: usize, status: CaseStatus, benefit: f64) -> QcRecord {
    QcRecord::new(row, status)
        .with(Column::HouseholdSize, 2.0)
        .with(Column::PovertyRatio, 60.0)
        .with(Column::Benefit, benefit)
        .with(Column::Elderly, 0.0)
        .with(Column::Disabled, 0.0)
        .with(Column::Children, 1.0)
        .with(Column::Wages, 0.0)
        .with(Column::SelfEmployment, 0.0)
        .with(Column::SocialSecurity, 0.0)
        .with(Column::Ssi, 0.0)
        .with(Column::Unemployment, 0.0)
        .with(Column::Veterans, 0.0)
        .with(Column::Tanf, 0.0)
        .with(Column::ChildSupport, 0.0)
        .with(Column::StandardDeduction, 198.0)
        .with(Column::EarnedIncomeDeduction, 0.0)
        .with(Column::DependentCareDeduction, 0.0)
        .with(Column::MedicalDeduction, 0.0)
        .with(Column::ShelterDeduction, 0.0)
        .with(Column::TotalDeductions, 198.0)
        .with(Column::GrossIncome, 500.0)
        .with(Column::NetIncome, 302.0)
}

/// Ten cases: six correct, three payment errors, one error case.
pub fn ten_case_records() -> Vec<QcRecord> {
    let statuses = [1, 1, 1, 1, 1, 1, 2, 2, 2, 3];
    let benefits = [100.0, 150.0, 200.0, 120.0, 130.0, 90.0, 300.0, 310.0, 320.0, 500.0];
    statuses
        .iter()
        .zip(benefits)
        .enumerate()
        .map(|(i, (&s, b))| {
            let status = CaseStatus::from_code(s as f64).expect("valid status");
            household(i + 1, status, b)
        })
        .collect()
}

/// Deterministic random households that pass range validation.
/// About one in ten poverty ratios lands above the top band on purpose.
pub fn random_records(seed: u64, n: usize) -> Vec<QcRecord> {
    let mut rng = Pcg64Mcg::seed_from_u64(seed);
    (1..=n)
        .map(|row| {
            let status = CaseStatus::ALL[rng.gen_range(0..3usize)];
            let mut record = QcRecord::new(row, status)
                .with(Column::HouseholdSize, rng.gen_range(1..=8) as f64)
                .with(
                    Column::PovertyRatio,
                    if rng.gen_bool(0.1) {
                        rng.gen_range(200.0..1000.0)
                    } else {
                        rng.gen_range(0.0..200.0)
                    },
                )
                .with(Column::Benefit, rng.gen_range(0.0..1200.0_f64).round());
            for flag in [Column::Elderly, Column::Disabled, Column::Children] {
                record.set(flag, if rng.gen_bool(0.3) { rng.gen_range(1..=3) as f64 } else { 0.0 });
            }
            for source in snapqc_core::schema::INCOME_SOURCES {
                let amount = if rng.gen_bool(0.25) { rng.gen_range(1.0..2000.0) } else { 0.0 };
                record.set(source, amount);
            }
            let gross: f64 = rng.gen_range(0.0..3000.0);
            record.set(Column::GrossIncome, gross);
            let itemized = [
                (Column::StandardDeduction, 198.0),
                (
                    Column::EarnedIncomeDeduction,
                    if record.is_positive(Column::Wages) { (0.2 * gross).round() } else { 0.0 },
                ),
                (Column::DependentCareDeduction, if rng.gen_bool(0.1) { 120.0 } else { 0.0 }),
                (Column::MedicalDeduction, if rng.gen_bool(0.2) { 35.0 } else { 0.0 }),
                (Column::ShelterDeduction, if rng.gen_bool(0.5) { 250.0 } else { 0.0 }),
            ];
            for (column, amount) in itemized {
                record.set(column, amount);
            }
            let deductions: f64 = itemized.iter().map(|(_, amount)| amount).sum();
            record.set(Column::TotalDeductions, deductions);
            record.set(Column::NetIncome, (gross - deductions).max(0.0));
            record
        })
        .collect()
}

pub fn random_dataset(seed: u64, n: usize) -> Dataset {
    Dataset::from_records(STATE, random_records(seed, n)).expect("valid synthetic dataset")
}
