//! Fixed-width text rendering of analysis reports.
//!
//! Consumes structured reports only. Undefined values print as "undefined",
//! never as zero.

use snapqc_core::{
    error_impact::ErrorImpactReport,
    error_types::{AmountBreakdown, ErrorTypesReport, IncomeProfile},
    overview::OverviewReport,
    report::{IndicatorComparison, RateRow, Share},
    AnalysisKind, Report,
};
use std::io::{self, Write};

const WIDTH: usize = 80;
const UNDEFINED: &str = "undefined";

pub fn render<W: Write>(out: &mut W, report: &Report) -> io::Result<()> {
    match report {
        Report::Overview(r) => render_overview(out, r),
        Report::ErrorTypes(r) => render_error_types(out, r),
        Report::ErrorImpact(r) => render_error_impact(out, r),
    }
}

pub fn render_overview<W: Write>(out: &mut W, r: &OverviewReport) -> io::Result<()> {
    title(out, AnalysisKind::Overview, &r.state)?;
    warnings(out, &r.warnings)?;

    writeln!(out, "\nSample Size: {} households", r.sample_size)?;
    writeln!(out, "Average household size: {}", num(r.mean_household_size, 2))?;
    writeln!(out, "Total persons in sample: {:.0}", r.total_persons)?;

    banner(out, "INCOME TO POVERTY RATIO DISTRIBUTION")?;
    for share in &r.poverty {
        share_line(out, share, 40)?;
    }
    writeln!(out, "Covered by bands: {}", pct(r.poverty_coverage_pct))?;

    banner(out, "SNAP BENEFIT AMOUNTS")?;
    let benefit = r.benefit.as_ref();
    writeln!(out, "Average monthly benefit: {}", money(benefit.map(|s| s.mean)))?;
    writeln!(out, "Median monthly benefit: {}", money(benefit.map(|s| s.median)))?;
    writeln!(out, "Total monthly benefits (sample): {}", money(benefit.map(|s| s.sum)))?;

    banner(out, "HOUSEHOLD SIZE DISTRIBUTION")?;
    for share in &r.household_sizes {
        share_line(out, share, 14)?;
    }

    banner(out, "CASE STATUS (Quality Control Findings)")?;
    for share in &r.statuses {
        share_line(out, share, 30)?;
    }
    writeln!(out, "\nOverall error rate: {}", pct(r.error_rate_pct))?;

    banner(out, "KEY DEMOGRAPHIC INDICATORS")?;
    for share in &r.demographics {
        writeln!(out, "{}: {} ({})", share.label, share.count, pct(share.pct))?;
    }
    writeln!(
        out,
        "\n{} of participants at or below 130% FPL",
        pct(r.at_or_below_eligibility_pct)
    )?;
    Ok(())
}

pub fn render_error_types<W: Write>(out: &mut W, r: &ErrorTypesReport) -> io::Result<()> {
    title(out, AnalysisKind::ErrorTypes, &r.state)?;
    warnings(out, &r.warnings)?;

    banner(out, "INCOME SOURCES BY CASE TYPE")?;
    breakdowns(out, &r.income_sources)?;

    banner(out, "GROSS INCOME ANALYSIS")?;
    income_profiles(out, "gross", &r.gross_income)?;

    banner(out, "DEDUCTION ANALYSIS BY CASE TYPE")?;
    breakdowns(out, &r.deductions)?;

    banner(out, "NET INCOME ANALYSIS")?;
    income_profiles(out, "net", &r.net_income)?;

    banner(out, "BENEFIT CALCULATION FLOW ANALYSIS")?;
    writeln!(
        out,
        "\n{:<20} {:<15} {:<15} {:<15} {:<15}",
        "Case Type", "Gross Income", "Deductions", "Net Income", "Benefit"
    )?;
    writeln!(out, "{}", "-".repeat(WIDTH))?;
    for row in &r.flow {
        writeln!(
            out,
            "{:<20} {:<15} {:<15} {:<15} {:<15}",
            row.cohort,
            money(row.gross),
            money(row.deductions),
            money(row.net),
            money(row.benefit)
        )?;
    }
    writeln!(
        out,
        "\nCases where gross - deductions differs from net by more than $5: {}",
        r.net_income_discrepancies
    )?;

    banner(out, "INCOME COMPLEXITY AND ERROR RATES")?;
    writeln!(out, "\nError rate by number of income sources:")?;
    for row in &r.complexity {
        rate_line(out, row)?;
    }

    banner(out, "COMMON ERROR PATTERNS")?;
    for comparison in &r.patterns {
        comparison_block(out, comparison)?;
    }

    banner(out, "HIGHEST RISK PROFILES")?;
    writeln!(out, "\nMedian total deductions: {}", money(r.risk.deduction_median))?;
    writeln!(out, "\nComplex cases (2+ income sources AND above-median deductions):")?;
    writeln!(
        out,
        "  Error rate: {} ({} cases)",
        pct(r.risk.complex.error_rate_pct),
        r.risk.complex.cases
    )?;
    writeln!(out, "\nSimple cases (0-1 income sources AND below-median deductions):")?;
    writeln!(
        out,
        "  Error rate: {} ({} cases)",
        pct(r.risk.simple.error_rate_pct),
        r.risk.simple.cases
    )?;
    writeln!(out, "\nRisk difference: {}", points(r.risk.difference_pp))?;
    Ok(())
}

pub fn render_error_impact<W: Write>(out: &mut W, r: &ErrorImpactReport) -> io::Result<()> {
    title(out, AnalysisKind::ErrorImpact, &r.state)?;
    warnings(out, &r.warnings)?;

    writeln!(out, "\nSample breakdown:")?;
    writeln!(out, "  Total cases: {}", r.sample_size)?;
    for share in &r.statuses {
        writeln!(out, "  {}: {} ({})", share.label, share.count, pct(share.pct))?;
    }

    banner(out, "BENEFIT AMOUNT ANALYSIS BY CASE TYPE")?;
    for row in &r.benefits {
        let s = row.summary.as_ref();
        writeln!(out, "\n{} ({} cases):", row.cohort, row.cases)?;
        writeln!(out, "  Average benefit: {}", money(s.map(|s| s.mean)))?;
        writeln!(out, "  Median benefit: {}", money(s.map(|s| s.median)))?;
        writeln!(out, "  Total monthly: {}", money(s.map(|s| s.sum)))?;
        writeln!(out, "  Min benefit: {}", money(s.map(|s| s.min)))?;
        writeln!(out, "  Max benefit: {}", money(s.map(|s| s.max)))?;
    }

    banner(out, "FINANCIAL IMPACT OF ERRORS")?;
    if let Some(first) = r.deltas.first() {
        writeln!(out, "\nAverage benefit comparison:")?;
        writeln!(out, "  Correct cases: {}", money(first.reference_mean))?;
    }
    for d in &r.deltas {
        writeln!(
            out,
            "  {}: {} ({} difference)",
            d.cohort,
            money(d.cohort_mean),
            signed_money(d.per_case)
        )?;
    }
    writeln!(out, "\nEstimated monthly impact (sample):")?;
    for d in &r.deltas {
        writeln!(
            out,
            "  {}: {} cases x {} = {}",
            d.cohort,
            d.cases,
            money(d.per_case),
            money(d.aggregate)
        )?;
    }
    writeln!(out, "  Total monthly impact: {}", money(r.total_sample_impact))?;

    banner(out, "ERROR RATES BY HOUSEHOLD CHARACTERISTICS")?;
    writeln!(out, "\nBy Household Size:")?;
    for row in &r.by_household_size {
        rate_line(out, row)?;
    }
    writeln!(out, "\nBy Income to Poverty Ratio:")?;
    for row in &r.by_poverty {
        rate_line(out, row)?;
    }
    writeln!(out, "\nBy Household Composition:")?;
    for c in &r.by_composition {
        writeln!(out, "  {}: {} error rate", c.label, pct(c.with.error_rate_pct))?;
        writeln!(out, "  Without: {} error rate", pct(c.without.error_rate_pct))?;
    }

    banner(out, "PROJECTED STATEWIDE IMPACT")?;
    match &r.projection {
        Some(p) => {
            writeln!(out, "\nAssumptions:")?;
            writeln!(out, "  SNAP households (est.): {}", thousands(p.households as f64, 0))?;
            writeln!(out, "  Sample error rate: {:.1}%", 100.0 * p.sample_error_rate)?;
            writeln!(
                out,
                "  Average error impact: {}/case/month",
                money(Some(p.avg_impact_per_case))
            )?;
            writeln!(out, "\nProjected Impact (rough point estimate):")?;
            writeln!(out, "  Error cases statewide: {}", thousands(p.projected_error_cases, 0))?;
            writeln!(out, "  Monthly impact: ${}", thousands(p.monthly_impact, 0))?;
            writeln!(out, "  Annual impact: ${}", thousands(p.annual_impact, 0))?;
        }
        None => writeln!(out, "\nProjection {UNDEFINED}: no error cases or no correct cases")?,
    }

    banner(out, "DISTRIBUTION OF BENEFIT AMOUNTS BY ERROR TYPE")?;
    for dist in &r.benefit_distribution {
        writeln!(out, "\n{}:", dist.cohort)?;
        for b in &dist.buckets {
            writeln!(out, "  {}: {:3} cases ({})", b.label, b.count, pct(b.pct))?;
        }
    }
    Ok(())
}

// ── Pieces ───────────────────────────────────────────────────────────────────

fn title<W: Write>(out: &mut W, kind: AnalysisKind, state: &str) -> io::Result<()> {
    writeln!(out, "{}", "=".repeat(WIDTH))?;
    writeln!(out, "{}", kind.title())?;
    writeln!(out, "SNAP Quality Control Data - {state}")?;
    writeln!(out, "{}", "=".repeat(WIDTH))
}

fn banner<W: Write>(out: &mut W, heading: &str) -> io::Result<()> {
    writeln!(out, "\n{}", "=".repeat(WIDTH))?;
    writeln!(out, "{heading}")?;
    writeln!(out, "{}", "=".repeat(WIDTH))
}

fn warnings<W: Write>(out: &mut W, warnings: &[String]) -> io::Result<()> {
    for w in warnings {
        writeln!(out, "WARNING: {w}")?;
    }
    Ok(())
}

fn share_line<W: Write>(out: &mut W, share: &Share, width: usize) -> io::Result<()> {
    writeln!(
        out,
        "{:<width$}: {:4} ({:>9})",
        share.label,
        share.count,
        pct(share.pct)
    )
}

fn rate_line<W: Write>(out: &mut W, row: &RateRow) -> io::Result<()> {
    writeln!(
        out,
        "  {}: {} error rate ({}/{} cases)",
        row.label,
        pct(row.error_rate_pct),
        row.errors,
        row.cases
    )
}

fn breakdowns<W: Write>(out: &mut W, items: &[AmountBreakdown]) -> io::Result<()> {
    for item in items {
        writeln!(out, "\n{} ({}):", item.label, item.column.header())?;
        for row in &item.rows {
            writeln!(
                out,
                "  {:<15}: {:3} cases ({:>9}) - Avg: {}",
                row.cohort,
                row.cases_with,
                pct(row.pct),
                money(row.mean_positive)
            )?;
        }
    }
    Ok(())
}

fn income_profiles<W: Write>(out: &mut W, which: &str, rows: &[IncomeProfile]) -> io::Result<()> {
    for row in rows {
        writeln!(out, "\n{}:", row.cohort)?;
        writeln!(out, "  Average {which} income: {}", money(row.mean))?;
        writeln!(out, "  Median {which} income: {}", money(row.median))?;
        writeln!(
            out,
            "  Cases with $0 {which} income: {} ({})",
            row.zero_count,
            pct(row.zero_pct)
        )?;
    }
    Ok(())
}

fn comparison_block<W: Write>(out: &mut W, c: &IndicatorComparison) -> io::Result<()> {
    writeln!(out, "\n{}:", c.label)?;
    writeln!(out, "  With: {} error rate", pct(c.with.error_rate_pct))?;
    writeln!(out, "  Without: {} error rate", pct(c.without.error_rate_pct))?;
    writeln!(out, "  Difference: {}", points(c.difference_pp))
}

// ── Formatting ───────────────────────────────────────────────────────────────

fn num(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(|| UNDEFINED.to_string(), |v| format!("{v:.decimals$}"))
}

fn pct(value: Option<f64>) -> String {
    value.map_or_else(|| UNDEFINED.to_string(), |v| format!("{v:.1}%"))
}

fn points(value: Option<f64>) -> String {
    value.map_or_else(
        || UNDEFINED.to_string(),
        |v| format!("{v:+.1} percentage points"),
    )
}

fn money(value: Option<f64>) -> String {
    value.map_or_else(
        || UNDEFINED.to_string(),
        |v| {
            if v < 0.0 {
                format!("-${}", thousands(-v, 2))
            } else {
                format!("${}", thousands(v, 2))
            }
        },
    )
}

fn signed_money(value: Option<f64>) -> String {
    value.map_or_else(
        || UNDEFINED.to_string(),
        |v| {
            let sign = if v < 0.0 { '-' } else { '+' };
            format!("{sign}${}", thousands(v.abs(), 2))
        },
    )
}

/// `1234567.891` with 2 decimals becomes `1,234,567.89`.
fn thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{value:.decimals$}");
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(d) => ("-", d),
        None => ("", int_part),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}
