//! Dataset loader and validator.
//!
//! Pipeline: header check → state filter → numeric parse → range check.
//! Every failure is fatal; the only soft outcome is the low-row-count
//! warning, which is logged and carried on the dataset.

use crate::{
    cohort::Cohort,
    config::AnalysisConfig,
    error::{QcError, QcResult},
    income,
    schema::{Column, COLUMN_COUNT, INCOME_SOURCES},
    types::CaseStatus,
};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

const MAX_HOUSEHOLD_SIZE: f64 = 20.0;
const MAX_POVERTY_RATIO: f64 = 1000.0;

/// One QC case for the target state.
#[derive(Debug, Clone, PartialEq)]
pub struct QcRecord {
    /// 1-based data row in the source file (header excluded).
    pub row: usize,
    pub status: CaseStatus,
    values: [Option<f64>; COLUMN_COUNT],
    /// Derived: number of income-source columns with a positive amount.
    pub income_sources: Option<usize>,
}

impl QcRecord {
    pub fn new(row: usize, status: CaseStatus) -> Self {
        let mut values = [None; COLUMN_COUNT];
        values[Column::Status.index()] = Some(status.code() as f64);
        Self {
            row,
            status,
            values,
            income_sources: None,
        }
    }

    pub fn with(mut self, column: Column, value: f64) -> Self {
        self.set(column, value);
        self
    }

    pub fn set(&mut self, column: Column, value: f64) {
        self.values[column.index()] = Some(value);
    }

    pub fn value(&self, column: Column) -> Option<f64> {
        self.values[column.index()]
    }

    /// Presence flags and amounts count as present only when strictly positive.
    pub fn is_positive(&self, column: Column) -> bool {
        self.value(column).is_some_and(|v| v > 0.0)
    }

    pub fn benefit(&self) -> Option<f64> {
        self.value(Column::Benefit)
    }

    pub fn household_size(&self) -> Option<u32> {
        self.value(Column::HouseholdSize).map(|v| v as u32)
    }
}

/// The validated, state-filtered record set.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub state: String,
    /// Catalog columns found in the file header.
    pub columns: Vec<Column>,
    pub records: Vec<QcRecord>,
    /// Data rows in the file before the state filter.
    pub source_rows: usize,
    pub warnings: Vec<String>,
}

impl Dataset {
    /// Load and validate a QC extract from disk.
    pub fn load(path: &Path, required: &[Column], config: &AnalysisConfig) -> QcResult<Self> {
        if !path.exists() {
            return Err(QcError::MissingFile {
                path: path.display().to_string(),
            });
        }
        log::info!("Loading QC data from {}", path.display());
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, required, config)
    }

    pub fn from_csv_str(data: &str, required: &[Column], config: &AnalysisConfig) -> QcResult<Self> {
        Self::from_reader(data.as_bytes(), required, config)
    }

    pub fn from_reader<R: Read>(
        source: R,
        required: &[Column],
        config: &AnalysisConfig,
    ) -> QcResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(source);

        let positions: HashMap<Column, usize> = reader
            .headers()?
            .iter()
            .enumerate()
            .filter_map(|(i, h)| Column::from_header(h).map(|c| (c, i)))
            .collect();

        let mut required: Vec<Column> = required.to_vec();
        for implied in [Column::StateName, Column::Status] {
            if !required.contains(&implied) {
                required.push(implied);
            }
        }

        let missing: Vec<String> = required
            .iter()
            .filter(|c| !positions.contains_key(c))
            .map(|c| c.header().to_string())
            .collect();
        if !missing.is_empty() {
            return Err(QcError::MissingColumns { missing });
        }

        let columns: Vec<Column> = Column::ALL
            .into_iter()
            .filter(|c| positions.contains_key(c))
            .collect();
        let state_pos = positions[&Column::StateName];

        let mut records = Vec::new();
        let mut source_rows = 0usize;
        for (i, result) in reader.records().enumerate() {
            let row = i + 1;
            let raw = result?;
            source_rows += 1;
            if raw.get(state_pos) != Some(config.target_state.as_str()) {
                continue;
            }
            records.push(parse_record(row, &raw, &columns, &positions, &required)?);
        }

        if records.is_empty() {
            return Err(QcError::EmptyCohort {
                state: config.target_state.clone(),
            });
        }

        let mut warnings = Vec::new();
        if records.len() < config.min_expected_rows {
            let msg = format!(
                "Only {} {} cases found. Expected {}+. Data may be incomplete.",
                records.len(),
                config.target_state,
                config.min_expected_rows
            );
            log::warn!("{msg}");
            warnings.push(msg);
        }

        for record in &records {
            validate_ranges(record)?;
        }

        income::annotate_income_sources(&mut records, &INCOME_SOURCES);

        log::info!(
            "Kept {} of {} rows for {}",
            records.len(),
            source_rows,
            config.target_state
        );

        Ok(Dataset {
            state: config.target_state.clone(),
            columns,
            records,
            source_rows,
            warnings,
        })
    }

    /// Build a dataset from records that were constructed in memory.
    /// Range checks still apply; the state filter does not.
    pub fn from_records(state: impl Into<String>, mut records: Vec<QcRecord>) -> QcResult<Self> {
        let state = state.into();
        if records.is_empty() {
            return Err(QcError::EmptyCohort { state });
        }
        for record in &records {
            validate_ranges(record)?;
        }
        income::annotate_income_sources(&mut records, &INCOME_SOURCES);
        let columns = Column::ALL
            .into_iter()
            .filter(|&c| {
                matches!(c, Column::StateName | Column::Status)
                    || records.iter().any(|r| r.value(c).is_some())
            })
            .collect();
        let source_rows = records.len();
        Ok(Dataset {
            state,
            columns,
            records,
            source_rows,
            warnings: Vec::new(),
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    /// Every record as a single cohort, the default reference population.
    pub fn cohort(&self) -> Cohort<'_> {
        Cohort::new("All cases", self.records.iter())
    }
}

fn parse_record(
    row: usize,
    raw: &csv::StringRecord,
    columns: &[Column],
    positions: &HashMap<Column, usize>,
    required: &[Column],
) -> QcResult<QcRecord> {
    let mut values = [None; COLUMN_COUNT];
    for &column in columns.iter().filter(|c| c.is_numeric()) {
        let cell = raw.get(positions[&column]).unwrap_or("");
        if cell.is_empty() && !required.contains(&column) {
            continue;
        }
        let value = cell
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| QcError::NonNumeric {
                column: column.header().to_string(),
                row,
                value: cell.to_string(),
            })?;
        values[column.index()] = Some(value);
    }

    let code = values[Column::Status.index()].unwrap_or(f64::NAN);
    let status = CaseStatus::from_code(code).ok_or_else(|| QcError::Range {
        column: Column::Status.header().to_string(),
        row,
        value: code,
        reason: "must be 1, 2, or 3",
    })?;

    Ok(QcRecord {
        row,
        status,
        values,
        income_sources: None,
    })
}

fn validate_ranges(record: &QcRecord) -> QcResult<()> {
    let out_of_range = |column: Column, value: f64, reason: &'static str| QcError::Range {
        column: column.header().to_string(),
        row: record.row,
        value,
        reason,
    };

    if let Some(size) = record.value(Column::HouseholdSize) {
        if size < 1.0 {
            return Err(out_of_range(Column::HouseholdSize, size, "must be >= 1"));
        }
        if size > MAX_HOUSEHOLD_SIZE {
            return Err(out_of_range(Column::HouseholdSize, size, "more than 20 people"));
        }
        if size.fract() != 0.0 {
            return Err(out_of_range(Column::HouseholdSize, size, "must be a whole number"));
        }
    }
    if let Some(ratio) = record.value(Column::PovertyRatio) {
        if ratio < 0.0 {
            return Err(out_of_range(Column::PovertyRatio, ratio, "cannot be negative"));
        }
        if ratio > MAX_POVERTY_RATIO {
            return Err(out_of_range(Column::PovertyRatio, ratio, "more than 1000%"));
        }
    }
    if let Some(benefit) = record.benefit() {
        if benefit < 0.0 {
            return Err(out_of_range(Column::Benefit, benefit, "cannot be negative"));
        }
    }
    Ok(())
}
