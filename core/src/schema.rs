//! Column catalog for the SNAP QC public-use file.
//!
//! Header names are fixed by the FNS release layout. Each analysis declares
//! the subset it cannot run without; every other catalog column is picked up
//! opportunistically when the file carries it.

use crate::types::Bucket;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Column {
    StateName,
    StateCode,
    Status,
    HouseholdSize,
    PovertyRatio,
    Benefit,
    Elderly,
    Disabled,
    Children,
    Wages,
    SelfEmployment,
    SocialSecurity,
    Ssi,
    Unemployment,
    Veterans,
    Tanf,
    ChildSupport,
    StandardDeduction,
    EarnedIncomeDeduction,
    DependentCareDeduction,
    MedicalDeduction,
    ShelterDeduction,
    TotalDeductions,
    GrossIncome,
    NetIncome,
}

pub const COLUMN_COUNT: usize = 25;

impl Column {
    pub const ALL: [Column; COLUMN_COUNT] = [
        Column::StateName,
        Column::StateCode,
        Column::Status,
        Column::HouseholdSize,
        Column::PovertyRatio,
        Column::Benefit,
        Column::Elderly,
        Column::Disabled,
        Column::Children,
        Column::Wages,
        Column::SelfEmployment,
        Column::SocialSecurity,
        Column::Ssi,
        Column::Unemployment,
        Column::Veterans,
        Column::Tanf,
        Column::ChildSupport,
        Column::StandardDeduction,
        Column::EarnedIncomeDeduction,
        Column::DependentCareDeduction,
        Column::MedicalDeduction,
        Column::ShelterDeduction,
        Column::TotalDeductions,
        Column::GrossIncome,
        Column::NetIncome,
    ];

    /// Exact header string in the QC extract.
    pub fn header(self) -> &'static str {
        match self {
            Column::StateName => "STATENAME",
            Column::StateCode => "STATE",
            Column::Status => "STATUS",
            Column::HouseholdSize => "RAWHSIZE",
            Column::PovertyRatio => "TPOV",
            Column::Benefit => "FSBEN",
            Column::Elderly => "FSELDER",
            Column::Disabled => "FSDIS",
            Column::Children => "FSKID",
            Column::Wages => "FSWAGES",
            Column::SelfEmployment => "FSSLFEMP",
            Column::SocialSecurity => "FSSOCSEC",
            Column::Ssi => "FSSSI",
            Column::Unemployment => "FSUNEMP",
            Column::Veterans => "FSVET",
            Column::Tanf => "FSTANF",
            Column::ChildSupport => "FSCSUPRT",
            Column::StandardDeduction => "FSSTDDED",
            Column::EarnedIncomeDeduction => "FSERNDED",
            Column::DependentCareDeduction => "FSDEPDED",
            Column::MedicalDeduction => "FSMEDDED",
            Column::ShelterDeduction => "SHELDED",
            Column::TotalDeductions => "FSTOTDED",
            Column::GrossIncome => "FSGRINC",
            Column::NetIncome => "FSNETINC",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Column::StateName => "State",
            Column::StateCode => "State Code",
            Column::Status => "Case Status",
            Column::HouseholdSize => "Household Size",
            Column::PovertyRatio => "Income to Poverty Ratio",
            Column::Benefit => "Monthly Benefit",
            Column::Elderly => "With elderly",
            Column::Disabled => "With disabled",
            Column::Children => "With children",
            Column::Wages => "Wages/Salary",
            Column::SelfEmployment => "Self-Employment",
            Column::SocialSecurity => "Social Security",
            Column::Ssi => "SSI",
            Column::Unemployment => "Unemployment",
            Column::Veterans => "Veterans Benefits",
            Column::Tanf => "TANF",
            Column::ChildSupport => "Child Support",
            Column::StandardDeduction => "Standard Deduction",
            Column::EarnedIncomeDeduction => "Earned Income Deduction",
            Column::DependentCareDeduction => "Dependent Care Deduction",
            Column::MedicalDeduction => "Medical Deduction",
            Column::ShelterDeduction => "Shelter Deduction",
            Column::TotalDeductions => "Total Deductions",
            Column::GrossIncome => "Gross Income",
            Column::NetIncome => "Net Income",
        }
    }

    pub fn from_header(header: &str) -> Option<Column> {
        Column::ALL.into_iter().find(|c| c.header() == header)
    }

    /// Text columns are kept for filtering only and never parsed.
    pub fn is_numeric(self) -> bool {
        !matches!(self, Column::StateName | Column::StateCode)
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

pub const INCOME_SOURCES: [Column; 8] = [
    Column::Wages,
    Column::SelfEmployment,
    Column::SocialSecurity,
    Column::Ssi,
    Column::Unemployment,
    Column::Veterans,
    Column::Tanf,
    Column::ChildSupport,
];

pub const DEDUCTIONS: [Column; 6] = [
    Column::StandardDeduction,
    Column::EarnedIncomeDeduction,
    Column::DependentCareDeduction,
    Column::MedicalDeduction,
    Column::ShelterDeduction,
    Column::TotalDeductions,
];

pub const COMPOSITION_FLAGS: [Column; 3] = [Column::Elderly, Column::Disabled, Column::Children];

pub const POVERTY_BUCKETS: [Bucket; 4] = [
    Bucket::new(0.0, 50.0, "Below 50% poverty"),
    Bucket::new(50.0, 100.0, "50-100% poverty"),
    Bucket::new(100.0, 130.0, "100-130% poverty"),
    Bucket::new(130.0, 200.0, "Above 130% poverty"),
];

pub const BENEFIT_BUCKETS: [Bucket; 7] = [
    Bucket::new(0.0, 100.0, "$0-100"),
    Bucket::new(100.0, 200.0, "$100-200"),
    Bucket::new(200.0, 300.0, "$200-300"),
    Bucket::new(300.0, 400.0, "$300-400"),
    Bucket::new(400.0, 500.0, "$400-500"),
    Bucket::new(500.0, 1000.0, "$500-1000"),
    Bucket::new(1000.0, 5000.0, "$1000+"),
];

/// The three report shapes. Each one is a declarative bundle of the
/// columns it needs; the pipeline itself is shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    Overview,
    ErrorTypes,
    ErrorImpact,
}

impl AnalysisKind {
    pub const ALL: [AnalysisKind; 3] = [
        AnalysisKind::Overview,
        AnalysisKind::ErrorTypes,
        AnalysisKind::ErrorImpact,
    ];

    pub fn required_columns(self) -> &'static [Column] {
        match self {
            AnalysisKind::Overview => &[
                Column::StateName,
                Column::StateCode,
                Column::HouseholdSize,
                Column::PovertyRatio,
                Column::Benefit,
                Column::Status,
            ],
            AnalysisKind::ErrorTypes => &[
                Column::StateName,
                Column::Status,
                Column::Wages,
                Column::SelfEmployment,
                Column::SocialSecurity,
                Column::Ssi,
                Column::ChildSupport,
                Column::GrossIncome,
                Column::NetIncome,
                Column::Benefit,
                Column::StandardDeduction,
                Column::EarnedIncomeDeduction,
                Column::DependentCareDeduction,
                Column::MedicalDeduction,
                Column::ShelterDeduction,
                Column::TotalDeductions,
            ],
            AnalysisKind::ErrorImpact => &[
                Column::StateName,
                Column::Status,
                Column::Benefit,
                Column::HouseholdSize,
                Column::PovertyRatio,
                Column::Elderly,
                Column::Disabled,
                Column::Children,
            ],
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            AnalysisKind::Overview => "SNAP QC ANALYSIS",
            AnalysisKind::ErrorTypes => "DETAILED ERROR TYPE ANALYSIS - INCOME VS DEDUCTIONS",
            AnalysisKind::ErrorImpact => "ADMINISTRATIVE ERROR IMPACT ANALYSIS",
        }
    }
}
