//! Command line interface of the staked-ETH pool monitor.
use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use pool_watch_detection::prelude::*;
use pool_watch_domain::BlockHeader;
use pool_watch_protocols::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

mod config;
mod logging;

use config::AppConfig;

#[derive(Parser)]
#[command(name = "pool-watch")]
#[command(about = "Balance and price monitor for staked-ETH liquidity pools", long_about = None)]
struct Cli {
    /// JSON-RPC endpoint (overrides RPC_URL)
    #[arg(long, global = true)]
    rpc_url: Option<String>,

    /// Emit logs as JSON (overrides LOG_JSON)
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Follow the chain head and print alerts as they fire
    Run {
        /// Seconds between two head polls (overrides POLL_INTERVAL_SECS)
        #[arg(short, long)]
        poll_secs: Option<u64>,

        /// Block to initialize at instead of the current head
        #[arg(long)]
        from_block: Option<u64>,
    },
    /// Evaluate a historical block range
    Replay {
        /// Block to initialize at
        #[arg(long)]
        from: u64,

        /// Last block to evaluate
        #[arg(long)]
        to: u64,
    },
    /// Evaluate a single block
    Check {
        /// Block to evaluate
        #[arg(long)]
        block: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    let mut config = AppConfig::from_env()?;
    if let Some(url) = cli.rpc_url {
        config.rpc_url = Some(url);
    }
    config.json_logs |= cli.json_logs;
    logging::init(config.json_logs);

    let rpc_url = config
        .rpc_url
        .clone()
        .ok_or_else(|| anyhow!("RPC_URL must be set in .env, the environment or --rpc-url"))?;
    let reader = Arc::new(EthereumReader::connect(&rpc_url).context("Failed to build RPC client")?);
    let mut cycle = DetectionCycle::with_reader(reader.clone(), config.detection.clone());
    info!(detectors = ?cycle.detector_names(), "Pool monitor ready");

    match cli.command {
        Commands::Run {
            poll_secs,
            from_block,
        } => {
            let interval = poll_secs.unwrap_or(config.poll_interval_secs).max(1);
            run(&mut cycle, reader.as_ref(), from_block, Duration::from_secs(interval)).await
        }
        Commands::Replay { from, to } => {
            if to < from {
                return Err(anyhow!("--to ({to}) is before --from ({from})"));
            }
            let start = reader.block(from).await.context("Failed to read start block")?;
            initialize(&mut cycle, &start).await?;
            for number in from + 1..=to {
                let header = reader
                    .block(number)
                    .await
                    .with_context(|| format!("Failed to read block {number}"))?;
                evaluate(&mut cycle, &header).await?;
            }
            Ok(())
        }
        Commands::Check { block } => {
            let seed = reader
                .block(block.saturating_sub(1))
                .await
                .context("Failed to read seed block")?;
            initialize(&mut cycle, &seed).await?;
            let header = reader
                .block(block)
                .await
                .with_context(|| format!("Failed to read block {block}"))?;
            evaluate(&mut cycle, &header).await
        }
    }
}

async fn initialize(cycle: &mut DetectionCycle, block: &BlockHeader) -> Result<()> {
    let summary = cycle
        .initialize(block)
        .await
        .with_context(|| format!("Failed to initialize detectors at block {}", block.number))?;
    for (key, value) in &summary {
        info!(block = block.number, key = %key, value = %value, "Initial state");
    }
    Ok(())
}

/// Runs one cycle and prints its alerts as JSON lines.
async fn evaluate(cycle: &mut DetectionCycle, block: &BlockHeader) -> Result<()> {
    let outcome = cycle.handle_block(block).await?;
    for alert in &outcome.alerts {
        println!("{}", serde_json::to_string(alert)?);
    }
    if !outcome.failures.is_empty() {
        warn!(
            block = block.number,
            failed = outcome.failures.len(),
            "Some detectors skipped this block"
        );
    }
    Ok(())
}

async fn run(
    cycle: &mut DetectionCycle,
    chain: &EthereumReader,
    from_block: Option<u64>,
    interval: Duration,
) -> Result<()> {
    let start = match from_block {
        Some(number) => chain.block(number).await,
        None => chain.latest_block().await,
    }
    .context("Failed to read start block")?;
    initialize(cycle, &start).await?;

    let mut last = start.number;
    let mut ticker = tokio::time::interval(interval);
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!(last_block = last, "Shutting down");
                return Ok(());
            }
            _ = ticker.tick() => {}
        }

        let head = match chain.latest_block().await {
            Ok(head) => head,
            Err(e) => {
                warn!(error = %e, "Failed to read chain head");
                continue;
            }
        };

        while last < head.number {
            let number = last + 1;
            let header = match chain.block(number).await {
                Ok(header) => header,
                Err(e) => {
                    warn!(block = number, error = %e, "Failed to read block, retrying next tick");
                    break;
                }
            };
            if let Err(e) = evaluate(cycle, &header).await {
                error!(block = number, error = %e, "Detection cycle failed");
            }
            last = number;
        }
    }
}
