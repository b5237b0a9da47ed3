//! Diversify CLI - Command line interface for the two-security calculator.
//!
//! Prints terminal tables by default, or JSON wrapped in `ApiResponse` for
//! integration with other tools.

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use diversify_core::{
    analyze,
    config::AnalysisConfig,
    input::{load_csv, sample_data, simulate, CsvLayout},
    render::{format_percent, portfolio_table, returns_table, summary_table, write_chart, write_report},
    ApiResponse, DeviationKind, FrontierAnalysis, ReturnSeries, WeightGrid,
};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "diversify")]
#[command(about = "Diversification of risk calculator - two-security portfolio statistics")]
#[command(version)]
struct Cli {
    /// Config file (defaults to $DIVERSIFY_CONFIG or the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute statistics, the portfolio table and the efficient frontier
    Analyze(AnalyzeArgs),
    /// Show the Watson & Head (2023) sample data
    Sample {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args)]
struct AnalyzeArgs {
    /// CSV file with one column per security (defaults to the sample data)
    #[arg(short, long, conflicts_with = "simulate")]
    data: Option<PathBuf>,
    /// Simulate returns with this seed instead of reading data
    #[arg(long, value_name = "SEED")]
    simulate: Option<u64>,
    /// CSV cells are decimals (0.066) rather than percentages (6.6)
    #[arg(long)]
    decimal: bool,
    /// Spacing of the weight grid
    #[arg(long)]
    step: Option<f64>,
    /// Deviation convention
    #[arg(long, value_enum)]
    deviation: Option<DeviationArg>,
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    format: OutputFormat,
    /// Write the frontier chart (SVG) to this file
    #[arg(long)]
    chart: Option<PathBuf>,
    /// Write the one-page report (SVG) to this file
    #[arg(long)]
    report: Option<PathBuf>,
    /// Report title
    #[arg(long)]
    title: Option<String>,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the config file location
    Path,
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum DeviationArg {
    Sample,
    Population,
}

impl From<DeviationArg> for DeviationKind {
    fn from(arg: DeviationArg) -> Self {
        match arg {
            DeviationArg::Sample => DeviationKind::Sample,
            DeviationArg::Population => DeviationKind::Population,
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(AnalysisConfig::default_path);

    let json_output = match &cli.command {
        Commands::Analyze(args) => args.format == OutputFormat::Json,
        Commands::Sample { format } => *format == OutputFormat::Json,
        Commands::Config { .. } => false,
    };

    match run(cli.command, &config_path) {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) if json_output => {
            tracing::error!("{:#}", e);
            println!("{}", error_json(&e)?);
            std::process::exit(1);
        }
        Err(e) => Err(e),
    }
}

/// Dispatch a command. The config file is only read by commands that use it,
/// so `config path` and `config init` still work when the file is broken.
fn run(command: Commands, config_path: &Path) -> Result<String> {
    match command {
        Commands::Analyze(args) => {
            let config = AnalysisConfig::load_from_path(config_path)?;
            handle_analyze(args, &config)
        }
        Commands::Sample { format } => handle_sample(format),
        Commands::Config { action } => handle_config(action, config_path),
    }
}

/// Error wrapped in the JSON envelope.
fn error_json(error: &anyhow::Error) -> Result<String> {
    Ok(serde_json::to_string_pretty(&ApiResponse::<()>::err(format!(
        "{:#}",
        error
    )))?)
}

fn handle_analyze(args: AnalyzeArgs, config: &AnalysisConfig) -> Result<String> {
    let (s, t) = load_input(&args, config)?;

    let grid = match args.step {
        Some(step) => WeightGrid::new(step)?,
        None => config.grid()?,
    };
    let deviation = args.deviation.map(DeviationKind::from).unwrap_or(config.deviation);

    let analysis = analyze(&s, &t, &grid, deviation)?;
    tracing::info!(
        periods = analysis.statistics.periods,
        points = analysis.portfolios.len(),
        "analysis complete"
    );

    let title = args.title.as_deref().unwrap_or(&config.output.title);
    let chart = args.chart.or_else(|| config.output.chart.clone());
    let report = args.report.or_else(|| config.output.report.clone());

    if let Some(path) = &chart {
        write_chart(path, &analysis)?;
    }
    if let Some(path) = &report {
        write_report(path, &analysis, title)?;
    }

    match args.format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&ApiResponse::ok(json!({
            "analysis": analysis,
            "efficient": analysis.efficient_points(),
            "chart": chart,
            "report": report,
        })))?),
        OutputFormat::Table => Ok(analysis_text(&analysis)),
    }
}

fn load_input(args: &AnalyzeArgs, config: &AnalysisConfig) -> Result<(ReturnSeries, ReturnSeries)> {
    if let Some(path) = &args.data {
        let layout = CsvLayout {
            percent: config.csv.percent && !args.decimal,
            ..config.csv.clone()
        };
        return Ok(load_csv(path, &layout)?);
    }

    if let Some(seed) = args.simulate {
        return Ok(simulate(&config.simulation, seed)?);
    }

    Ok(sample_data())
}

fn analysis_text(analysis: &FrontierAnalysis) -> String {
    let st = &analysis.statistics;
    let mv = &analysis.minimum_variance;
    let b = &analysis.benefit;

    let mut lines = vec![
        "Summary Statistics".to_string(),
        summary_table(analysis),
        format!("Correlation (r): {:.2}", st.correlation),
        String::new(),
        "Portfolio Risk and Return".to_string(),
        portfolio_table(analysis),
        String::new(),
        format!(
            "Minimum portfolio risk: {} at {}, compared to {} ({}) and {} ({}).",
            format_percent(b.min_portfolio_risk),
            analysis.min_risk.label,
            analysis.security_s,
            format_percent(st.std_dev_s),
            analysis.security_t,
            format_percent(st.std_dev_t),
        ),
        format!(
            "{} risk reduced by {}; {} risk reduced by {}.",
            analysis.security_s,
            format_percent(b.s_risk_reduction),
            analysis.security_t,
            format_percent(b.t_risk_reduction),
        ),
        format!(
            "Exact minimum-variance mix: {:.1}% in {} (return {}, risk {}).",
            mv.weight * 100.0,
            analysis.security_s,
            format_percent(mv.expected_return),
            format_percent(mv.risk),
        ),
    ];

    if b.s_risk_reduction > 0.0 && b.t_risk_reduction > 0.0 {
        lines.push(
            "Diversification reduces total portfolio risk below that of either individual security."
                .to_string(),
        );
    }

    lines.join("\n")
}

fn handle_sample(format: OutputFormat) -> Result<String> {
    let (s, t) = sample_data();

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&ApiResponse::ok(json!({
            "source": "Watson & Head (2023), Corporate Finance: Principles and Practice",
            "securities": [s, t],
        })))?),
        OutputFormat::Table => Ok(returns_table(&s, &t)),
    }
}

fn handle_config(action: ConfigAction, path: &Path) -> Result<String> {
    match action {
        ConfigAction::Show => Ok(AnalysisConfig::load_from_path(path)?.to_toml()?),
        ConfigAction::Path => Ok(path.display().to_string()),
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {} (use --force to overwrite)",
                    path.display()
                );
            }
            AnalysisConfig::default().save_to_path(path)?;
            Ok(format!("Wrote default config to {}", path.display()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::fs;
    use tempfile::tempdir;

    fn parse(args: &[&str]) -> Commands {
        let mut argv = vec!["diversify"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap().command
    }

    fn analyze_args(args: &[&str]) -> AnalyzeArgs {
        let mut argv = vec!["analyze"];
        argv.extend_from_slice(args);
        match parse(&argv) {
            Commands::Analyze(args) => args,
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_config_init_force_replaces_broken_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("c.toml");
        fs::write(&path, "step = \"wide\"").unwrap();

        let shown = run(parse(&["config", "path"]), &path).unwrap();
        assert_eq!(shown, path.display().to_string());

        assert!(run(parse(&["config", "init"]), &path).is_err());
        run(parse(&["config", "init", "--force"]), &path).unwrap();

        let config = AnalysisConfig::load_from_path(&path).unwrap();
        assert_eq!(config, AnalysisConfig::default());
        assert!(run(parse(&["config", "show"]), &path).unwrap().contains("step = 0.1"));
    }

    #[test]
    fn test_analyze_reports_broken_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("c.toml");
        fs::write(&path, "step = \"wide\"").unwrap();

        assert!(run(parse(&["analyze"]), &path).is_err());
    }

    #[test]
    fn test_error_json_envelope() {
        let err = run(parse(&["analyze", "--step", "1e-300"]), Path::new("/nonexistent/c.toml"))
            .unwrap_err();
        let value: Value = serde_json::from_str(&error_json(&err).unwrap()).unwrap();

        assert_eq!(value["ok"], Value::Bool(false));
        assert!(value["error"].as_str().unwrap().contains("Weight step"));
        assert!(value.get("data").is_none());
    }

    #[test]
    fn test_flags_override_config() {
        let config = AnalysisConfig {
            step: 0.1,
            deviation: DeviationKind::Sample,
            ..AnalysisConfig::default()
        };

        let output = handle_analyze(
            analyze_args(&["--step", "0.5", "--deviation", "population", "--format", "json"]),
            &config,
        )
        .unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();
        let analysis = &value["data"]["analysis"];

        assert_eq!(value["ok"], Value::Bool(true));
        assert_eq!(analysis["portfolios"].as_array().unwrap().len(), 3);
        assert_eq!(analysis["statistics"]["deviation"], "population");

        let output = handle_analyze(analyze_args(&["--format", "json"]), &config).unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["data"]["analysis"]["portfolios"].as_array().unwrap().len(), 11);
        assert_eq!(value["data"]["analysis"]["statistics"]["deviation"], "sample");
    }

    #[test]
    fn test_load_input_decimal_flag() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("returns.csv");
        fs::write(&path, "S,T\n0.10,0.05\n0.02,0.07\n").unwrap();
        let data = path.to_str().unwrap();
        let config = AnalysisConfig::default();

        let (s, _) = load_input(&analyze_args(&["--data", data, "--decimal"]), &config).unwrap();
        assert_eq!(s.values(), &[0.10, 0.02]);

        let (s, _) = load_input(&analyze_args(&["--data", data]), &config).unwrap();
        assert!((s.values()[0] - 0.001).abs() < 1e-12);
    }

    #[test]
    fn test_load_input_defaults_to_sample_data() {
        let (s, t) = load_input(&analyze_args(&[]), &AnalysisConfig::default()).unwrap();
        assert_eq!(s, sample_data().0);
        assert_eq!(t.len(), 5);
    }
}
