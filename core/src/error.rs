use thiserror::Error;

#[derive(Error, Debug)]
pub enum QcError {
    #[error("Required input file not found: {path}")]
    MissingFile { path: String },

    #[error("Missing required columns: {}", .missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    #[error("Column {column} should be numeric but row {row} holds {value:?}")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },

    #[error("No {state} records found in input")]
    EmptyCohort { state: String },

    #[error("{column} out of range at row {row}: {value} ({reason})")]
    Range {
        column: String,
        row: usize,
        value: f64,
        reason: &'static str,
    },

    #[error("Invariant violated: {0}")]
    InvariantViolation(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl QcError {
    /// True for both flavours of schema failure (absent column, unparseable cell).
    pub fn is_schema(&self) -> bool {
        matches!(self, QcError::MissingColumns { .. } | QcError::NonNumeric { .. })
    }
}

pub type QcResult<T> = Result<T, QcError>;
