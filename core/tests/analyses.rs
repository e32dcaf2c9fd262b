//! End-to-end runs of the three reports through the CSV pipeline.

mod common;

use common::*;
use snapqc_core::{
    error_impact::ErrorImpactAnalysis, error_types::ErrorTypesAnalysis,
    overview::OverviewAnalysis, AnalysisConfig, AnalysisKind, CaseStatus, CohortAnalyzer, Column,
    QcError, Report,
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn analyzer() -> CohortAnalyzer {
    let _ = env_logger::builder().is_test(true).try_init();
    CohortAnalyzer::new(test_config())
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn overview_of_ten_case_sample() {
    let (_dir, path) = write_csv(&to_csv(&ten_case_records()));
    let report = analyzer().run(&path, &OverviewAnalysis).unwrap();

    assert_eq!(report.sample_size, 10);
    assert_eq!(report.mean_household_size, Some(2.0));
    assert_eq!(report.total_persons, 20.0);
    assert_eq!(report.error_rate_pct, Some(40.0));

    let counts: Vec<usize> = report.statuses.iter().map(|s| s.count).collect();
    assert_eq!(counts, vec![6, 3, 1]);
    let pct: f64 = report.statuses.iter().filter_map(|s| s.pct).sum();
    assert!((pct - 100.0).abs() < 0.1);

    // Every fixture household sits at 60% FPL.
    assert_eq!(report.poverty[1].count, 10);
    assert_eq!(report.poverty_coverage_pct, Some(100.0));
    assert_eq!(report.at_or_below_eligibility_pct, Some(100.0));

    let benefit = report.benefit.unwrap();
    assert_eq!(benefit.sum, 2220.0);

    let kids = report
        .demographics
        .iter()
        .find(|s| s.label.contains("children"))
        .unwrap();
    assert_eq!(kids.count, 10);
}

/// Rows above the top poverty band are reported, not rejected.
#[test]
fn overview_warns_on_partial_poverty_coverage() {
    let mut records = ten_case_records();
    records[0].set(Column::PovertyRatio, 450.0);
    let (_dir, path) = write_csv(&to_csv(&records));
    let report = analyzer().run(&path, &OverviewAnalysis).unwrap();

    assert_eq!(report.poverty_coverage_pct, Some(90.0));
    assert!(report.warnings.iter().any(|w| w.contains("poverty bands")));
}

#[test]
fn error_impact_of_ten_case_sample() {
    let (_dir, path) = write_csv(&to_csv(&ten_case_records()));
    let report = analyzer().run(&path, &ErrorImpactAnalysis).unwrap();

    assert_eq!(report.sample_size, 10);
    let sizes: Vec<usize> = report.benefits.iter().map(|b| b.cases).collect();
    assert_eq!(sizes, vec![6, 3, 1]);
    assert_eq!(sizes.iter().sum::<usize>(), 10);

    let correct = report.benefits[0].summary.unwrap();
    assert!((correct.mean - 790.0 / 6.0).abs() < 1e-9);
    let error_case = report.benefits[2].summary.unwrap();
    assert_eq!(error_case.min, 500.0);
    assert_eq!(error_case.max, 500.0);

    let projection = report.projection.unwrap();
    assert_eq!(projection.households, test_config().statewide_households);
    assert!((projection.sample_error_rate - 0.4).abs() < 1e-12);
    let expected_monthly = 0.4 * projection.households as f64 * projection.avg_impact_per_case;
    assert!((projection.monthly_impact - expected_monthly).abs() < 1e-6);

    // Household size 2 holds everyone; the two-way splits add back to 10.
    assert_eq!(report.by_household_size.len(), 1);
    assert_eq!(report.by_household_size[0].cases, 10);
    for c in &report.by_composition {
        assert_eq!(c.with.cases + c.without.cases, 10, "{}", c.label);
    }

    // Nobody is elderly: the "with" side is undefined, not zero.
    let elderly = report
        .by_composition
        .iter()
        .find(|c| c.column == Column::Elderly)
        .unwrap();
    assert_eq!(elderly.with.error_rate_pct, None);
    assert_eq!(elderly.difference_pp, None);

    let payment_errors = &report.benefit_distribution[1];
    let in_300s = payment_errors
        .buckets
        .iter()
        .find(|b| b.label == "$300-400")
        .unwrap();
    assert_eq!(in_300s.count, 3);
    assert_eq!(in_300s.pct, Some(100.0));
}

#[test]
fn households_override_drives_projection() {
    let (_dir, path) = write_csv(&to_csv(&ten_case_records()));
    let config = test_config().with_statewide_households(1_000);
    let report = CohortAnalyzer::new(config)
        .run(&path, &ErrorImpactAnalysis)
        .unwrap();
    let p = report.projection.unwrap();
    assert_eq!(p.households, 1_000);
    assert!((p.projected_error_cases - 400.0).abs() < 1e-9);
}

/// All-correct samples have no error impact to project.
#[test]
fn projection_is_undefined_without_errors() {
    let records: Vec<_> = (1..=5)
        .map(|i| household(i, CaseStatus::Correct, 100.0 * i as f64))
        .collect();
    let (_dir, path) = write_csv(&to_csv(&records));
    let report = analyzer().run(&path, &ErrorImpactAnalysis).unwrap();
    assert!(report.projection.is_none());
    assert!(report.total_sample_impact.is_none());
}

#[test]
fn error_types_flags_wages_and_complexity() {
    let mut records = ten_case_records();
    // Payment errors and the error case all report wages and Social Security.
    for r in records.iter_mut().skip(6) {
        r.set(Column::Wages, 900.0);
        r.set(Column::SocialSecurity, 400.0);
    }
    let (_dir, path) = write_csv(&to_csv(&records));
    let report = analyzer().run(&path, &ErrorTypesAnalysis).unwrap();

    let wages = &report.income_sources[0];
    assert_eq!(wages.column, Column::Wages);
    assert_eq!(wages.rows[0].cases_with, 0);
    assert_eq!(wages.rows[0].mean_positive, None);
    assert_eq!(wages.rows[1].cases_with, 3);
    assert_eq!(wages.rows[1].pct, Some(100.0));
    assert_eq!(wages.rows[1].mean_positive, Some(900.0));

    let tiers: Vec<(String, Option<f64>)> = report
        .complexity
        .iter()
        .map(|r| (r.label.clone(), r.error_rate_pct))
        .collect();
    assert_eq!(
        tiers,
        vec![
            ("0 income source(s)".to_string(), Some(0.0)),
            ("2 income source(s)".to_string(), Some(100.0)),
        ]
    );

    let wage_pattern = report
        .patterns
        .iter()
        .find(|p| p.column == Column::Wages)
        .unwrap();
    assert_eq!(wage_pattern.with.error_rate_pct, Some(100.0));
    assert_eq!(wage_pattern.without.error_rate_pct, Some(0.0));
    assert_eq!(wage_pattern.difference_pp, Some(100.0));

    // Fixture net income equals gross minus deductions exactly.
    assert_eq!(report.net_income_discrepancies, 0);
    assert_eq!(report.flow.len(), 3);
    assert_eq!(report.flow[0].gross, Some(500.0));
}

#[test]
fn error_types_warns_on_net_income_mismatch() {
    let mut records = ten_case_records();
    for r in records.iter_mut().take(2) {
        r.set(Column::NetIncome, 0.0);
    }
    let (_dir, path) = write_csv(&to_csv(&records));
    let report = analyzer().run(&path, &ErrorTypesAnalysis).unwrap();
    assert_eq!(report.net_income_discrepancies, 2);
    assert!(report.warnings.iter().any(|w| w.contains("net income")));
}

#[test]
fn error_types_requires_deduction_columns() {
    let csv = "STATENAME,STATUS,FSBEN\nMississippi,1,100\n";
    let (_dir, path) = write_csv(csv);
    let err = analyzer().run(&path, &ErrorTypesAnalysis).unwrap_err();
    let QcError::MissingColumns { missing } = err else {
        panic!("expected MissingColumns");
    };
    assert!(missing.contains(&"FSTOTDED".to_string()));
    assert!(missing.contains(&"SHELDED".to_string()));
}

/// Same file, same config, same report.
#[test]
fn reruns_are_identical() {
    let (_dir, path) = write_csv(&to_csv(&random_records(2023, 200)));
    let analyzer = analyzer();
    for kind in AnalysisKind::ALL {
        let a = serde_json::to_string(&analyzer.run_kind(&path, kind).unwrap()).unwrap();
        let b = serde_json::to_string(&analyzer.run_kind(&path, kind).unwrap()).unwrap();
        assert_eq!(a, b, "{kind:?}");
        assert!(a.contains("\"sample_size\":200"), "{kind:?}");
    }
}

/// The synthetic sample carries every column each analysis requires.
#[test]
fn random_sample_satisfies_every_analysis() {
    let records = random_records(11, 50);
    for kind in AnalysisKind::ALL {
        for &column in kind.required_columns() {
            assert!(
                matches!(column, Column::StateName | Column::StateCode)
                    || records.iter().all(|r| r.value(column).is_some()),
                "{kind:?} {}",
                column.header()
            );
        }
    }
    let (_dir, path) = write_csv(&to_csv(&records));
    let report = analyzer().run(&path, &ErrorTypesAnalysis).unwrap();
    assert_eq!(report.sample_size, 50);
    assert_eq!(report.deductions.len(), 6);
}

#[test]
fn run_kind_tags_the_report() {
    let (_dir, path) = write_csv(&to_csv(&ten_case_records()));
    let report = analyzer().run_kind(&path, AnalysisKind::Overview).unwrap();
    assert!(matches!(report, Report::Overview(_)));
    assert_eq!(report.kind(), AnalysisKind::Overview);
}

/// Rows for other states never reach the analysis.
#[test]
fn other_states_are_filtered_out() {
    let mut csv = to_csv(&ten_case_records());
    csv.push_str(&csv_line("Alabama", &household(11, CaseStatus::ErrorCase, 999.0)));
    csv.push('\n');
    let (_dir, path) = write_csv(&csv);

    let config = AnalysisConfig {
        min_expected_rows: 1,
        ..AnalysisConfig::default()
    };
    let report = CohortAnalyzer::new(config)
        .run(&path, &OverviewAnalysis)
        .unwrap();
    assert_eq!(report.sample_size, 10);
}
