//! Presentation of analysis results.
//!
//! - **Tables**: terminal tables for the data, statistics and portfolio grid
//! - **Chart**: SVG efficient-frontier plot
//! - **Report**: single-page SVG document combining both

mod chart;
mod report;
mod table;

pub use chart::{frontier_svg, write_chart};
pub use report::{render_report, write_report};
pub use table::{portfolio_table, returns_table, summary_table};

/// Format a decimal return as a percentage with two decimals (0.0596 -> "5.96%").
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// Escape text for use inside SVG elements and attributes.
pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
