//! SVG efficient-frontier chart.

use super::escape_xml;
use crate::types::FrontierAnalysis;
use crate::Result;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

const WIDTH: f64 = 576.0;
const HEIGHT: f64 = 384.0;
const PADDING: f64 = 48.0;
const TICKS: usize = 5;
const LINE_COLOR: &str = "#348dc1";
const MIN_COLOR: &str = "#d62728";
const GRID_COLOR: &str = "#e0e0e0";
const TEXT_COLOR: &str = "#333333";

/// Render the frontier as a standalone SVG document.
///
/// Risk (%) runs along the x axis and expected return (%) up the y axis. Each
/// grid portfolio is a labelled marker; the lowest-risk point is highlighted.
pub fn frontier_svg(analysis: &FrontierAnalysis) -> String {
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="Helvetica, Arial, sans-serif">"#,
        w = WIDTH,
        h = HEIGHT
    );
    svg.push('\n');
    svg.push_str(&frontier_elements(analysis, WIDTH, HEIGHT));
    svg.push_str("</svg>\n");
    svg
}

/// Write the frontier chart to `path`.
pub fn write_chart(path: &Path, analysis: &FrontierAnalysis) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(path, frontier_svg(analysis))?;
    tracing::info!(path = %path.display(), "wrote frontier chart");
    Ok(())
}

/// Axis range padded by 10% on each side; flat ranges are widened.
fn padded_extent(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (mut lo, mut hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }

    if (hi - lo).abs() < f64::EPSILON {
        let adjust = if lo == 0.0 { 1.0 } else { lo.abs() * 0.1 };
        lo -= adjust;
        hi += adjust;
    }

    let pad = (hi - lo) * 0.1;
    (lo - pad, hi + pad)
}

/// Chart body (axes, grid, curve, markers) sized to `width` x `height`.
///
/// Shared by the standalone chart and the report page, which places it inside
/// a translated group.
pub(crate) fn frontier_elements(analysis: &FrontierAnalysis, width: f64, height: f64) -> String {
    // Percent units on both axes
    let (x_min, x_max) = padded_extent(analysis.portfolios.iter().map(|p| p.risk * 100.0));
    let (y_min, y_max) =
        padded_extent(analysis.portfolios.iter().map(|p| p.expected_return * 100.0));

    let plot_w = width - 2.0 * PADDING;
    let plot_h = height - 2.0 * PADDING;
    let sx = |v: f64| PADDING + (v - x_min) / (x_max - x_min) * plot_w;
    let sy = |v: f64| PADDING + (1.0 - (v - y_min) / (y_max - y_min)) * plot_h;

    let mut out = String::new();

    // Grid and tick labels
    for i in 0..=TICKS {
        let frac = i as f64 / TICKS as f64;
        let xv = x_min + frac * (x_max - x_min);
        let yv = y_min + frac * (y_max - y_min);
        let x = sx(xv);
        let y = sy(yv);

        let _ = writeln!(
            out,
            r#"<line x1="{x:.2}" y1="{top:.2}" x2="{x:.2}" y2="{bottom:.2}" stroke="{GRID_COLOR}" stroke-width="1" />"#,
            top = PADDING,
            bottom = height - PADDING,
        );
        let _ = writeln!(
            out,
            r#"<line x1="{left:.2}" y1="{y:.2}" x2="{right:.2}" y2="{y:.2}" stroke="{GRID_COLOR}" stroke-width="1" />"#,
            left = PADDING,
            right = width - PADDING,
        );
        let _ = writeln!(
            out,
            r#"<text x="{x:.2}" y="{ty:.2}" font-size="10" fill="{TEXT_COLOR}" text-anchor="middle">{xv:.1}</text>"#,
            ty = height - PADDING + 14.0,
        );
        let _ = writeln!(
            out,
            r#"<text x="{tx:.2}" y="{y:.2}" font-size="10" fill="{TEXT_COLOR}" text-anchor="end" dominant-baseline="middle">{yv:.1}</text>"#,
            tx = PADDING - 6.0,
        );
    }

    // Axes
    let _ = writeln!(
        out,
        r#"<rect x="{PADDING:.2}" y="{PADDING:.2}" width="{plot_w:.2}" height="{plot_h:.2}" fill="none" stroke="{TEXT_COLOR}" stroke-width="1" />"#,
    );
    let _ = writeln!(
        out,
        r#"<text x="{x:.2}" y="{y:.2}" font-size="12" fill="{TEXT_COLOR}" text-anchor="middle">Risk (Standard Deviation %)</text>"#,
        x = width / 2.0,
        y = height - 12.0,
    );
    let _ = writeln!(
        out,
        r#"<text x="14" y="{y:.2}" font-size="12" fill="{TEXT_COLOR}" text-anchor="middle" transform="rotate(-90 14 {y:.2})">Expected Return (%)</text>"#,
        y = height / 2.0,
    );

    // Frontier curve in weight order
    let points: Vec<String> = analysis
        .portfolios
        .iter()
        .map(|p| format!("{:.2},{:.2}", sx(p.risk * 100.0), sy(p.expected_return * 100.0)))
        .collect();
    let _ = writeln!(
        out,
        r#"<polyline points="{}" fill="none" stroke="{LINE_COLOR}" stroke-width="1.5" />"#,
        points.join(" ")
    );

    // Markers and labels
    for p in &analysis.portfolios {
        let x = sx(p.risk * 100.0);
        let y = sy(p.expected_return * 100.0);
        let is_min = p.weight == analysis.min_risk.weight;
        let (color, radius) = if is_min { (MIN_COLOR, 4.5) } else { (LINE_COLOR, 3.0) };

        let _ = writeln!(
            out,
            r#"<circle cx="{x:.2}" cy="{y:.2}" r="{radius}" fill="{color}" />"#,
        );
        let _ = writeln!(
            out,
            r#"<text x="{lx:.2}" y="{ly:.2}" font-size="8" fill="{TEXT_COLOR}">{label}</text>"#,
            lx = x + 6.0,
            ly = y - 4.0,
            label = escape_xml(&p.label),
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::sample_data;
    use crate::portfolio::{analyze, WeightGrid};
    use crate::types::DeviationKind;
    use tempfile::tempdir;

    fn textbook() -> FrontierAnalysis {
        let (s, t) = sample_data();
        analyze(&s, &t, &WeightGrid::textbook(), DeviationKind::Population).unwrap()
    }

    #[test]
    fn test_frontier_svg_contains_every_point() {
        let analysis = textbook();
        let svg = frontier_svg(&analysis);

        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<circle").count(), analysis.portfolios.len());
        for p in &analysis.portfolios {
            assert!(svg.contains(&p.label), "missing label {}", p.label);
        }
        assert_eq!(svg.matches(MIN_COLOR).count(), 1);
    }

    #[test]
    fn test_padded_extent() {
        let (lo, hi) = padded_extent([1.0, 3.0].into_iter());
        assert!((lo - 0.8).abs() < 1e-12);
        assert!((hi - 3.2).abs() < 1e-12);

        let (lo, hi) = padded_extent([2.0, 2.0].into_iter());
        assert!(lo < 2.0 && hi > 2.0);

        assert_eq!(padded_extent(std::iter::empty()), (0.0, 1.0));
    }

    #[test]
    fn test_flat_frontier_renders_finite_coordinates() {
        let (s, _) = sample_data();
        let analysis = analyze(&s, &s, &WeightGrid::default(), DeviationKind::Sample).unwrap();
        let svg = frontier_svg(&analysis);

        assert!(!svg.contains("NaN"));
        assert!(!svg.contains("inf"));
    }

    #[test]
    fn test_write_chart() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("charts/frontier.svg");

        write_chart(&path, &textbook()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("Expected Return (%)"));
    }
}
