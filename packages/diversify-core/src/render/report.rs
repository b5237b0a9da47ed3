//! Single-page summary document.

use super::chart::frontier_elements;
use super::{escape_xml, format_percent};
use crate::types::{DeviationKind, FrontierAnalysis, WeightedPortfolio};
use crate::Result;
use chrono::{DateTime, Utc};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

// A4 in points
const PAGE_WIDTH: f64 = 595.0;
const PAGE_HEIGHT: f64 = 842.0;
const MARGIN: f64 = 40.0;
const ROW_HEIGHT: f64 = 16.0;
const CHART_HEIGHT: f64 = 300.0;
const MAX_TABLE_ROWS: usize = 12;

/// Render the one-page report as an SVG document.
///
/// The page holds the title, generation time, summary statistics, the
/// portfolio table, the diversification benefit and the frontier chart.
pub fn render_report(analysis: &FrontierAnalysis, title: &str, generated_at: DateTime<Utc>) -> String {
    let st = &analysis.statistics;
    let mut page = String::new();

    let _ = writeln!(
        page,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{PAGE_WIDTH}pt" height="{PAGE_HEIGHT}pt" viewBox="0 0 {PAGE_WIDTH} {PAGE_HEIGHT}" font-family="Helvetica, Arial, sans-serif">"#,
    );
    let _ = writeln!(
        page,
        r#"<rect width="{PAGE_WIDTH}" height="{PAGE_HEIGHT}" fill="white" />"#
    );

    // Header
    text(&mut page, MARGIN, 56.0, 20, "bold", &escape_xml(title));
    text(
        &mut page,
        MARGIN,
        74.0,
        9,
        "normal",
        &format!(
            "Generated {} | {} periods | {} deviation",
            generated_at.format("%Y-%m-%d %H:%M UTC"),
            st.periods,
            match st.deviation {
                DeviationKind::Sample => "sample",
                DeviationKind::Population => "population",
            }
        ),
    );

    // Summary statistics
    let mut y = 106.0;
    text(&mut page, MARGIN, y, 12, "bold", "Summary Statistics");
    y += ROW_HEIGHT + 2.0;
    row(&mut page, y, &["Security", "Mean Return", "Standard Deviation"], true);
    for (name, mean, sd) in [
        (&analysis.security_s, st.mean_s, st.std_dev_s),
        (&analysis.security_t, st.mean_t, st.std_dev_t),
    ] {
        y += ROW_HEIGHT;
        let cells = [escape_xml(name), format_percent(mean), format_percent(sd)];
        row(&mut page, y, &cells, false);
    }
    y += ROW_HEIGHT + 4.0;
    text(
        &mut page,
        MARGIN,
        y,
        10,
        "normal",
        &format!("Correlation (r): {:.2}", st.correlation),
    );

    // Portfolio table
    y += 26.0;
    text(&mut page, MARGIN, y, 12, "bold", "Portfolio Risk and Return");
    y += ROW_HEIGHT + 2.0;
    row(&mut page, y, &["Portfolio", "Mean Return", "Standard Deviation"], true);
    for p in table_rows(analysis) {
        y += ROW_HEIGHT;
        let cells = [
            escape_xml(&p.label),
            format_percent(p.expected_return),
            format_percent(p.risk),
        ];
        row(&mut page, y, &cells, false);
    }

    // Diversification benefit
    let b = &analysis.benefit;
    y += 26.0;
    text(
        &mut page,
        MARGIN,
        y,
        10,
        "normal",
        &format!(
            "Minimum portfolio risk: {} ({}), compared to {} ({}) and {} ({}).",
            format_percent(b.min_portfolio_risk),
            escape_xml(&analysis.min_risk.label),
            escape_xml(&analysis.security_s),
            format_percent(st.std_dev_s),
            escape_xml(&analysis.security_t),
            format_percent(st.std_dev_t),
        ),
    );
    y += ROW_HEIGHT;
    text(
        &mut page,
        MARGIN,
        y,
        10,
        "normal",
        &format!(
            "Risk reduced by {} relative to {} and by {} relative to {}.",
            format_percent(b.s_risk_reduction),
            escape_xml(&analysis.security_s),
            format_percent(b.t_risk_reduction),
            escape_xml(&analysis.security_t),
        ),
    );

    // Chart pinned to the bottom of the page
    let chart_top = PAGE_HEIGHT - MARGIN - CHART_HEIGHT;
    let _ = writeln!(
        page,
        r#"<g transform="translate({MARGIN} {chart_top})">"#
    );
    page.push_str(&frontier_elements(
        analysis,
        PAGE_WIDTH - 2.0 * MARGIN,
        CHART_HEIGHT,
    ));
    page.push_str("</g>\n</svg>\n");

    page
}

/// Write the report for `analysis` to `path`, stamped with the current time.
pub fn write_report(path: &Path, analysis: &FrontierAnalysis, title: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(path, render_report(analysis, title, Utc::now()))?;
    tracing::info!(path = %path.display(), "wrote report");
    Ok(())
}

/// Rows shown in the page table, highest S weight first.
///
/// Fine grids are thinned to an even stride so the page never overflows; the
/// endpoints and the minimum-risk mix are always kept.
fn table_rows(analysis: &FrontierAnalysis) -> Vec<&WeightedPortfolio> {
    let n = analysis.portfolios.len();
    let stride = n.div_ceil(MAX_TABLE_ROWS - 1).max(1);

    analysis
        .portfolios
        .iter()
        .enumerate()
        .filter(|(i, p)| {
            n <= MAX_TABLE_ROWS
                || i % stride == 0
                || *i == n - 1
                || p.weight == analysis.min_risk.weight
        })
        .map(|(_, p)| p)
        .rev()
        .collect()
}

fn text(page: &mut String, x: f64, y: f64, size: u32, weight: &str, content: &str) {
    let _ = writeln!(
        page,
        r##"<text x="{x:.2}" y="{y:.2}" font-size="{size}" font-weight="{weight}" fill="#222222">{content}</text>"##,
    );
}

fn row<S: AsRef<str>>(page: &mut String, y: f64, cells: &[S], header: bool) {
    let columns = [MARGIN, MARGIN + 180.0, MARGIN + 320.0];
    let weight = if header { "bold" } else { "normal" };
    for (x, cell) in columns.iter().zip(cells) {
        text(page, *x, y, 10, weight, cell.as_ref());
    }
}
