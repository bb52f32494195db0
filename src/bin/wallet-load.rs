//! Load-test driver: submit many transactions concurrently against a
//! running wallet service and report the aggregate outcome.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use rust_decimal::Decimal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wallet_rpc::config::{load_config, Config};
use wallet_rpc::harness::{SubmissionHarness, TxJob};
use wallet_rpc::poll::PollOptions;
use wallet_rpc::wallet::WalletClient;

#[derive(Parser)]
#[command(name = "wallet-load")]
#[command(about = "Concurrent transaction load test for a wallet service", long_about = None)]
struct Cli {
    /// Optional TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Wallet service URL (overrides config).
    #[arg(short, long)]
    url: Option<String>,

    /// Sending account id.
    #[arg(long)]
    account_id: String,

    /// Destination address.
    #[arg(long)]
    to_address: String,

    /// Number of transactions to submit.
    #[arg(short, long, default_value_t = 10)]
    num: usize,

    /// Amount per transaction in display units.
    #[arg(short, long, default_value = "0.001")]
    amount: Decimal,

    /// Optional fee per transaction in display units.
    #[arg(long)]
    fee: Option<Decimal>,

    /// Launch interval in milliseconds (overrides config).
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Echo request and response bodies to the log.
    #[arg(short, long)]
    verbose: bool,

    /// Print every task outcome, not just the summary.
    #[arg(long)]
    show_outcomes: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wallet_rpc=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };
    if let Some(url) = &cli.url {
        config.client.url = url.clone();
    }
    if cli.verbose {
        config.client.verbose = true;
    }
    if let Some(interval_ms) = cli.interval_ms {
        config.load.launch_interval_ms = interval_ms;
    }

    tracing::info!(
        url = %config.client.url,
        num = cli.num,
        amount = %cli.amount,
        interval_ms = config.load.launch_interval_ms,
        "starting load run"
    );

    let client = Arc::new(WalletClient::new(
        &config.client.url,
        config.client.verbose,
        Duration::from_secs(config.client.request_timeout_secs),
    )?);

    let harness = SubmissionHarness::new(
        Arc::clone(&client),
        &cli.account_id,
        Duration::from_millis(config.load.launch_interval_ms),
        PollOptions {
            attempts: config.load.confirm_attempts,
            delay: Duration::from_millis(config.load.confirm_delay_ms),
        },
    );

    let jobs = vec![
        TxJob {
            to_address: cli.to_address.clone(),
            amount: cli.amount,
            fee: cli.fee,
        };
        cli.num
    ];

    let start = Instant::now();
    let results = harness.send_transactions(jobs).await;
    let summary = harness.summarize(&results, start.elapsed());

    if cli.show_outcomes {
        let mut outcomes: Vec<_> = results.values().collect();
        outcomes.sort_by(|a, b| a.id.cmp(&b.id));
        println!("{}", serde_json::to_string_pretty(&outcomes)?);
    }
    println!("{}", serde_json::to_string_pretty(&summary)?);

    tracing::info!(queries = client.query_count(), "load run complete");

    if summary.failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
