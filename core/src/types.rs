//! Shared primitive types used across every analysis.

use serde::{Deserialize, Serialize};

/// QC finding for one sampled household.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CaseStatus {
    Correct = 1,
    PaymentError = 2,
    ErrorCase = 3,
}

impl CaseStatus {
    pub const ALL: [CaseStatus; 3] = [
        CaseStatus::Correct,
        CaseStatus::PaymentError,
        CaseStatus::ErrorCase,
    ];

    /// Accepts only the integral codes 1, 2 and 3.
    pub fn from_code(code: f64) -> Option<Self> {
        if code.fract() != 0.0 {
            return None;
        }
        match code as i64 {
            1 => Some(CaseStatus::Correct),
            2 => Some(CaseStatus::PaymentError),
            3 => Some(CaseStatus::ErrorCase),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    /// Payment errors and error cases both count toward the error rate.
    pub fn is_error(self) -> bool {
        !matches!(self, CaseStatus::Correct)
    }

    pub fn label(self) -> &'static str {
        match self {
            CaseStatus::Correct => "Active - Correct",
            CaseStatus::PaymentError => "Active - Payment Error",
            CaseStatus::ErrorCase => "Error Case",
        }
    }

    /// Plural name used when the status is a cohort heading.
    pub fn cohort_name(self) -> &'static str {
        match self {
            CaseStatus::Correct => "Correct Cases",
            CaseStatus::PaymentError => "Payment Errors",
            CaseStatus::ErrorCase => "Error Cases",
        }
    }
}

/// Half-open interval `[low, high)` with a display label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bucket {
    pub low: f64,
    pub high: f64,
    pub label: &'static str,
}

impl Bucket {
    pub const fn new(low: f64, high: f64, label: &'static str) -> Self {
        Self { low, high, label }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value < self.high
    }
}

/// Returns the first bucket holding `value`, if any.
pub fn bucket_for(buckets: &[Bucket], value: f64) -> Option<&Bucket> {
    buckets.iter().find(|b| b.contains(value))
}
