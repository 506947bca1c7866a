use super::report::{
    run_appraise, run_batch_report, run_on_road, run_rates, AppraiseArgs, BatchArgs, OnRoadArgs,
    RatesArgs,
};
use super::server;
use clap::{Args, Parser, Subcommand};
use obv_engine::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "OBV Engine",
    about = "Value used vehicles for the Hyderabad market from the command line or over HTTP",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Value one vehicle described by a JSON file
    Appraise(AppraiseArgs),
    /// Break an ex-showroom price down into its on-road components
    OnRoad(OnRoadArgs),
    /// Value every row of a CSV export and write a CSV summary
    Batch(BatchArgs),
    /// Print the active rate tables as JSON
    Rates(RatesArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    #[command(flatten)]
    pub(crate) engine: EngineArgs,
}

/// Engine overrides shared by every command.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct EngineArgs {
    /// JSON rate tables to use instead of OBV_RATES_PATH / the built-in set
    #[arg(long)]
    pub(crate) rates: Option<PathBuf>,
    /// Apply market-sentiment multipliers
    #[arg(long)]
    pub(crate) market_sentiment: bool,
    /// Registration state used when converting ex-showroom prices
    #[arg(long)]
    pub(crate) home_state: Option<String>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Appraise(args) => run_appraise(args),
        Command::OnRoad(args) => run_on_road(args),
        Command::Batch(args) => run_batch_report(args),
        Command::Rates(args) => run_rates(args),
    }
}
