use crate::error::QcResult;
use serde::{Deserialize, Serialize};

/// Estimated SNAP households in Mississippi for FY 2023. This is an
/// administrative estimate, override it in the config file when better
/// caseload figures are available.
pub const DEFAULT_STATEWIDE_HOUSEHOLDS: u64 = 369_000;

/// QC extracts normally carry a thousand or more cases per state.
pub const DEFAULT_MIN_EXPECTED_ROWS: usize = 100;

pub const DEFAULT_TARGET_STATE: &str = "Mississippi";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Exact `STATENAME` value to keep.
    pub target_state: String,
    /// Population used to scale the sample error impact to the whole state.
    pub statewide_households: u64,
    /// Below this many matched rows a warning is emitted.
    pub min_expected_rows: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            target_state: DEFAULT_TARGET_STATE.to_string(),
            statewide_households: DEFAULT_STATEWIDE_HOUSEHOLDS,
            min_expected_rows: DEFAULT_MIN_EXPECTED_ROWS,
        }
    }
}

impl AnalysisConfig {
    /// Load from a JSON file. Absent keys fall back to the defaults.
    pub fn load(path: &str) -> QcResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: AnalysisConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.target_state = state.into();
        self
    }

    pub fn with_statewide_households(mut self, households: u64) -> Self {
        self.statewide_households = households;
        self
    }
}
