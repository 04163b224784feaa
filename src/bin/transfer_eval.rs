//! Transfer evaluation CLI
//!
//! Scores a source tower's model on a target tower and writes the
//! actual vs predicted chart.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use tower_transfer::transfer::EvaluationPath;
use tower_transfer::{EvaluationConfig, Season, TowerId, TransferEvaluator, TransferRequest};

#[derive(Parser, Debug)]
#[command(name = "transfer-eval")]
#[command(about = "Evaluate a cooling tower LSTM model on another tower", long_about = None)]
struct Args {
    /// Building of the source model (e.g., ESB)
    #[arg(long)]
    from_building: String,

    /// Tower number of the source model
    #[arg(long)]
    from_tower: u32,

    /// Building of the target data
    #[arg(long)]
    to_building: String,

    /// Tower number of the target data
    #[arg(long)]
    to_tower: u32,

    /// Comma-separated feature columns
    #[arg(long, value_delimiter = ',', required = true)]
    features: Vec<String>,

    /// Target column to predict
    #[arg(long)]
    target: String,

    /// Season of the target data (spring, summer, fall, winter, allyear)
    #[arg(long)]
    season: Option<String>,

    /// Season of the source model, if different
    #[arg(long)]
    from_season: Option<String>,

    /// Fraction of target data used for fine-tuning, 0 for zero-shot
    #[arg(long, default_value = "0.0")]
    finetune: f64,

    /// Fine-tuning epochs
    #[arg(long, default_value = "10")]
    epochs: usize,

    /// Skip the chart
    #[arg(long)]
    no_plot: bool,

    /// Predict absolute values instead of deltas from the first reading
    #[arg(long)]
    no_delta: bool,

    /// Configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Chart output path (SVG)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write the results table as CSV
    #[arg(long)]
    results_csv: Option<PathBuf>,

    /// Verbosity level
    #[arg(short, long)]
    log_level: Option<String>,
}

fn parse_season(value: Option<&str>) -> Result<Option<Season>> {
    Ok(value.map(str::parse::<Season>).transpose()?)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = EvaluationConfig::load_or_default(&args.config);

    let level = args.log_level.as_deref().unwrap_or(&config.logging.level);
    let log_level = match level {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut request = TransferRequest::new(
        TowerId::new(&args.from_building, args.from_tower),
        TowerId::new(&args.to_building, args.to_tower),
        args.features.clone(),
        &args.target,
    )
    .with_finetuning(args.finetune)
    .with_epochs(args.epochs)
    .with_display(!args.no_plot)
    .with_delta(!args.no_delta);
    request.season = parse_season(args.season.as_deref())?;
    request.source_season = parse_season(args.from_season.as_deref())?;

    info!("Model: {}", request.model_identifier());
    info!("Target: {} ({})", request.target, request.seasons().1);

    let evaluator = TransferEvaluator::new(config.clone());
    let outcome = evaluator.evaluate(&request)?;

    println!("\n=== {} ===", request.chart_title());
    if let EvaluationPath::FineTune {
        finetune_rows,
        test_rows,
        loss_history,
        ..
    } = &outcome.path
    {
        println!("Fine-tune rows: {}, test rows: {}", finetune_rows, test_rows);
        if let Some(loss) = loss_history.last() {
            println!("Final fine-tune loss: {:.6}", loss);
        }
    }
    println!("Samples: {}", outcome.results.len());
    println!("RMSE: {:.4}", outcome.rmse);
    println!("MAE:  {:.4}", outcome.mae);

    if let Some(path) = &args.results_csv {
        outcome.results.save_csv(path)?;
        info!("Results saved to {}", path.display());
    }

    if let Some(chart) = &outcome.chart {
        let path = match &args.output {
            Some(path) => path.clone(),
            None => {
                std::fs::create_dir_all(&config.report.output_dir)?;
                config.report.output_dir.join(format!(
                    "{}_on_{}{}_{:.0}pct.svg",
                    outcome.model_identifier,
                    request.target.building.to_lowercase(),
                    request.target.tower,
                    request.finetuning_fraction * 100.0
                ))
            }
        };
        chart.save_svg(&path, (config.report.width, config.report.height))?;
        println!("Chart saved to {}", path.display());
    }

    Ok(())
}
