// Chart engine entry point: loads a price history file and prints the chart bundle as JSON.
use clap::Parser;
use engine::config::{utc_offset_from_minutes, IndicatorSettings};
use engine::data::market_data::HistoryStore;
use engine::data::{load_history_file, HistoryFormat};
use engine::services::ChartService;
use engine::EngineError;
use shared::models::ChartPeriod;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "chart-engine", about = "Compute chart series and indicators for a price history")]
struct Cli {
    /// History file (CSV or JSON)
    #[arg(short, long)]
    input: PathBuf,

    /// Input layout; guessed from the file extension when omitted
    #[arg(short, long, value_enum)]
    format: Option<HistoryFormat>,

    #[arg(short, long, default_value = "SYMBOL")]
    symbol: String,

    /// Chart period (1d, 1wk, 1mo, 3mo, 6mo, 1y, 5y, max); defaults to the settings value
    #[arg(short, long)]
    period: Option<ChartPeriod>,

    /// JSON settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Group intraday sessions at this UTC offset instead of local time
    #[arg(long, allow_hyphen_values = true)]
    utc_offset_minutes: Option<i32>,

    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        error!(error = %err, "chart-engine failed");
        std::process::exit(err.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), EngineError> {
    let settings = match &cli.config {
        Some(path) => IndicatorSettings::from_json_file(path)?,
        None => IndicatorSettings::default(),
    };
    let period = cli.period.unwrap_or(settings.default_period);

    let format = match cli.format.or_else(|| HistoryFormat::from_path(&cli.input)) {
        Some(format) => format,
        None => {
            return Err(EngineError::ConfigError(format!(
                "Cannot infer the format of '{}'; pass --format",
                cli.input.display()
            )))
        }
    };

    info!(input = %cli.input.display(), ?format, symbol = %cli.symbol, %period, "Starting chart engine");
    let points = load_history_file(&cli.input, format)?;

    let store = Arc::new(RwLock::new(HistoryStore::new()));
    let mut service = ChartService::new(store, settings);
    if let Some(minutes) = cli.utc_offset_minutes {
        service = service.with_timezone(utc_offset_from_minutes(minutes)?);
    }

    service.load_history(&cli.symbol, period, points).await;
    let chart = service.build_chart(&cli.symbol, period).await?;

    let json = if cli.pretty {
        serde_json::to_string_pretty(&chart)?
    } else {
        serde_json::to_string(&chart)?
    };
    println!("{}", json);
    Ok(())
}
