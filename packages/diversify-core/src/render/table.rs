//! Terminal tables.

use super::format_percent;
use crate::types::{FrontierAnalysis, ReturnSeries};
use tabled::{
    builder::Builder,
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Security")]
    security: String,
    #[tabled(rename = "Mean Return")]
    mean: String,
    #[tabled(rename = "Standard Deviation")]
    std_dev: String,
}

#[derive(Tabled)]
struct PortfolioRow {
    #[tabled(rename = "Portfolio")]
    label: String,
    #[tabled(rename = "Mean Return (%)")]
    expected_return: String,
    #[tabled(rename = "Standard Deviation (%)")]
    risk: String,
    #[tabled(rename = "Efficient")]
    efficient: &'static str,
}

fn render<T: Tabled>(rows: Vec<T>) -> String {
    style(Table::new(rows))
}

fn style(mut table: Table) -> String {
    table
        .with(Style::rounded())
        .with(Modify::new(Columns::first()).with(Alignment::left()))
        .to_string()
}

/// Period-by-period returns of both securities, headed by their names.
pub fn returns_table(s: &ReturnSeries, t: &ReturnSeries) -> String {
    let mut builder = Builder::default();
    builder.push_record([
        "Period".to_string(),
        s.name().to_string(),
        t.name().to_string(),
    ]);

    for (i, (vs, vt)) in s.values().iter().zip(t.values()).enumerate() {
        builder.push_record([(i + 1).to_string(), format_percent(*vs), format_percent(*vt)]);
    }

    style(builder.build())
}

/// Mean and standard deviation of each security.
pub fn summary_table(analysis: &FrontierAnalysis) -> String {
    let st = &analysis.statistics;
    let rows = vec![
        SummaryRow {
            security: analysis.security_s.clone(),
            mean: format_percent(st.mean_s),
            std_dev: format_percent(st.std_dev_s),
        },
        SummaryRow {
            security: analysis.security_t.clone(),
            mean: format_percent(st.mean_t),
            std_dev: format_percent(st.std_dev_t),
        },
    ];

    render(rows)
}

/// Expected return and risk for every grid weight, highest S weight first.
pub fn portfolio_table(analysis: &FrontierAnalysis) -> String {
    let rows: Vec<PortfolioRow> = analysis
        .portfolios
        .iter()
        .rev()
        .map(|p| PortfolioRow {
            label: p.label.clone(),
            expected_return: format_percent(p.expected_return),
            risk: format_percent(p.risk),
            efficient: if p.efficient { "yes" } else { "" },
        })
        .collect();

    render(rows)
}
