//! Asset bootstrap CLI.
//!
//! Subcommands map to the bootstrap lifecycle:
//!
//! - `verify`       — check credentials and configuration, probe fees
//! - `mint`         — create the distributor trustline, then mint supply
//! - `set-domain`   — set the issuer's home domain
//! - `bootstrap-lp` — preflight and seed the liquidity pool via first deposit
//! - `analyze`      — aggregate pool activity into CSV/INI reports

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pi_bootstrap::analytics;
use pi_bootstrap::config::BootstrapConfig;
use pi_bootstrap::crypto::KeyPair;
use pi_bootstrap::fees::FeePolicy;
use pi_bootstrap::horizon::{HorizonClient, LedgerClient};
use pi_bootstrap::pool::PoolId;
use pi_bootstrap::report::{self, AnalyticsExporter};
use pi_bootstrap::tx::Orchestrator;
use pi_bootstrap::workflow::WorkflowState;
use pi_bootstrap::workflows::{DomainWorkflow, LiquidityWorkflow, MintWorkflow, StepContext};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Verify credentials and configuration, then probe network fees
    Verify,

    /// Create the distributor trustline, then mint the supply
    Mint,

    /// Set the issuer account's home domain
    SetDomain,

    /// Preflight and seed the liquidity pool via its first deposit
    BootstrapLp,

    /// Aggregate recent pool activity into CSV/INI reports
    Analyze {
        /// Pool identifier (hex)
        #[arg(long)]
        pool_id: String,

        /// How many recent records to fetch
        #[arg(long, default_value_t = 200)]
        limit: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    info!("🚀 pi-bootstrap {}", env!("CARGO_PKG_VERSION"));

    let config = BootstrapConfig::from_env().context("loading configuration")?;
    info!(horizon = %config.horizon_url, network = %config.network_passphrase, "configured");

    let client = Arc::new(HorizonClient::new(&config.horizon_url).context("building ledger client")?);

    match cli.command {
        Command::Verify => cmd_verify(&config, client).await,
        Command::Mint => cmd_mint(&config, client).await,
        Command::SetDomain => cmd_set_domain(&config, client).await,
        Command::BootstrapLp => cmd_bootstrap_lp(&config, client).await,
        Command::Analyze { pool_id, limit } => cmd_analyze(client, &pool_id, limit).await,
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        "pi_bootstrap=debug,info"
    } else {
        "pi_bootstrap=info,warn,error"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    Ok(())
}

fn step_context(
    config: &BootstrapConfig,
    client: Arc<HorizonClient>,
) -> Arc<StepContext<HorizonClient>> {
    let orchestrator = Orchestrator::new(client.clone(), config.network());
    // Conservative fees: these are one-shot bootstrap transactions, not a
    // congestion race.
    Arc::new(StepContext::new(
        client,
        orchestrator,
        FeePolicy::Conservative,
        config.tx_timeout_secs,
    ))
}

/// Credential and configuration verification, plus a fee probe.
async fn cmd_verify(config: &BootstrapConfig, client: Arc<HorizonClient>) -> Result<()> {
    let mut missing = Vec::new();

    match config.issuer_secret() {
        Some(secret) => match KeyPair::from_secret_seed(secret.expose()) {
            Ok(pair) => info!("ISSUER_SECRET ✅ (address {})", pair.address()),
            Err(e) => {
                warn!("ISSUER_SECRET is set but not a valid seed: {}", e);
                missing.push("ISSUER_SECRET");
            }
        },
        None => missing.push("ISSUER_SECRET"),
    }
    match config.distributor_secret() {
        Some(secret) => match KeyPair::from_secret_seed(secret.expose()) {
            Ok(pair) => info!("DISTRIBUTOR_SECRET ✅ (address {})", pair.address()),
            Err(e) => {
                warn!("DISTRIBUTOR_SECRET is set but not a valid seed: {}", e);
                missing.push("DISTRIBUTOR_SECRET");
            }
        },
        None => missing.push("DISTRIBUTOR_SECRET"),
    }

    for (key, value) in [
        ("TOKEN_CODE", config.token_code.as_deref()),
        (
            "ISSUER_PUBLIC_ADDRESS",
            config.issuer_public_address.as_deref(),
        ),
    ] {
        match value {
            Some(v) => info!("{} ✅ ({})", key, v),
            None => missing.push(key),
        }
    }

    info!("MINT_Amount = {}", config.mint_amount);
    info!("MINT_LIMIT = {}", config.mint_limit);
    match (config.lp_native_deposit, config.lp_token_deposit) {
        (Some(native), Some(token)) => {
            info!("LP_PI_DEPOSIT = {} ✔️", native);
            info!("LP_TOKEN_DEPOSIT = {} ✔️", token);
        }
        _ => missing.push("LP_PI_DEPOSIT / LP_TOKEN_DEPOSIT"),
    }

    let stats = client
        .latest_ledger_stats()
        .await
        .context("fetching ledger statistics")?;
    info!("Base fee (stroops): {}", stats.base_fee);
    match stats.recommended_p70 {
        Some(p70) => info!("Recommended fee, p70 (stroops): {}", p70),
        None => info!("No fee recommendation published"),
    }

    if missing.is_empty() {
        info!("✅ all credentials and options verified");
        Ok(())
    } else {
        bail!("missing or invalid options: {}", missing.join(", "));
    }
}

async fn cmd_mint(config: &BootstrapConfig, client: Arc<HorizonClient>) -> Result<()> {
    let ctx = step_context(config, client);
    let workflow = MintWorkflow::prepare(
        ctx,
        config.issuer_secret(),
        config.distributor_secret(),
        config.token_code.as_deref(),
        config.mint_amount,
        config.mint_limit,
    )?;

    let sequencer = workflow.run().await;
    for (i, report) in sequencer.reports().iter().enumerate() {
        info!("step {} ({}): {}", i + 1, report.name, report.result.describe());
    }
    match sequencer.state() {
        WorkflowState::Completed => {
            info!("🎉 trustline + mint complete");
            Ok(())
        }
        state => bail!("mint workflow {}", state),
    }
}

async fn cmd_set_domain(config: &BootstrapConfig, client: Arc<HorizonClient>) -> Result<()> {
    let ctx = step_context(config, client);
    let workflow = DomainWorkflow::prepare(ctx, config.issuer_secret(), config.home_domain.as_deref())?;

    let sequencer = workflow.run().await;
    match sequencer.state() {
        WorkflowState::Completed => {
            info!("✅ home domain set");
            Ok(())
        }
        state => bail!("set-domain workflow {}", state),
    }
}

async fn cmd_bootstrap_lp(config: &BootstrapConfig, client: Arc<HorizonClient>) -> Result<()> {
    let (native_deposit, token_deposit) = config.require_lp_deposits()?;
    let ctx = step_context(config, client);
    let workflow = LiquidityWorkflow::prepare(
        ctx,
        config.distributor_secret(),
        config.token_code.as_deref(),
        config.issuer_public_address.as_deref(),
        native_deposit,
        token_deposit,
    )?;

    let outcome = workflow.run().await?;
    match (&outcome.state, outcome.accepted) {
        (WorkflowState::Completed, Some((hash, ledger))) => {
            info!("🎉 liquidity deposit successful");
            info!("Pool ID: {}", outcome.pool_id);
            info!("Tx Hash: {}", hash);
            info!("Ledger: {}", ledger);

            let token_code = config.token_code.as_deref().unwrap_or("TOKEN");
            report::write_lp_artifact(
                Path::new("."),
                token_code,
                &outcome.pool_id,
                &hash,
                ledger,
            )
            .context("writing bootstrap record")?;
            Ok(())
        }
        (state, _) => bail!("liquidity workflow {}", state),
    }
}

async fn cmd_analyze(client: Arc<HorizonClient>, pool_id: &str, limit: u32) -> Result<()> {
    let pool_id: PoolId = pool_id.parse().context("parsing pool id")?;

    info!(pool_id = %pool_id, limit, "gathering pool activity");
    let transactions = client
        .pool_transactions(&pool_id, limit)
        .await
        .context("fetching pool transactions")?;
    let operations = client
        .pool_operations(&pool_id, limit)
        .await
        .context("fetching pool operations")?;
    info!(
        transactions = transactions.len(),
        operations = operations.len(),
        "analyzing gathered data"
    );

    let stats = analytics::analyze(&transactions, &operations);
    let exporter = AnalyticsExporter::create(Path::new("pool_analytics"), Utc::now())
        .context("creating analytics output directory")?;
    exporter.write_csv(&stats).context("writing CSV")?;
    exporter
        .write_above_average_ini(&stats)
        .context("writing above-average INI")?;

    info!(
        "Done. Outputs saved in {}",
        exporter.output_dir().display()
    );
    Ok(())
}
