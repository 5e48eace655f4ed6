//! Command line entry point for the ERA5 rainfall analyses.

use clap::{Parser, Subcommand};
use rainfall_core::chart::render_line_chart;
use rainfall_core::export::{ExportJob, ExportSpec};
use rainfall_core::source::FileCatalog;
use rainfall_era5::analyses;
use rainfall_era5::config::AnalysisConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rainfall", version, about = "ERA5 rainfall climatologies for Rwanda")]
struct Cli {
    /// Path to a TOML analysis configuration; defaults are used when absent.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where to write the rendered chart.
    #[arg(long, default_value = "rainfall.png")]
    chart: PathBuf,

    /// Skip the CSV export.
    #[arg(long)]
    no_export: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Mean monthly rainfall over the country boundary.
    Monthly,
    /// Mean rainfall per day-of-year slot over the country boundary.
    Daily,
    /// Mean monthly rainfall over the literal bounding rectangle.
    Rect,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AnalysisConfig::from_path(path)?,
        None => AnalysisConfig::default(),
    };
    log::info!("resolving datasets from {:?}", config.catalog_dir);
    let catalog = FileCatalog::new(&config.catalog_dir);

    let (table, chart_config) = match cli.command {
        Command::Monthly => (
            analyses::monthly_rainfall(&catalog, &config)?,
            analyses::monthly_chart_config(),
        ),
        Command::Daily => (
            analyses::daily_rainfall(&catalog, &config)?,
            analyses::daily_chart_config(),
        ),
        Command::Rect => (
            analyses::rect_rainfall(&catalog, &config)?,
            analyses::monthly_chart_config(),
        ),
    };

    render_line_chart(&table, &chart_config, &cli.chart)?;
    println!("chart written to {}", cli.chart.display());

    if !cli.no_export {
        let spec = ExportSpec::csv(&config.export_folder, &config.export_prefix);
        let job = ExportJob::queue(table, spec);
        let report = job.wait()?;
        println!("exported {} rows to {}", report.rows, report.path.display());
    }

    Ok(())
}
