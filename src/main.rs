//! BPT Migrator - relayer multicall builder
//!
//! Run with: cargo run -- pool2pool --user 0x.. --from 0x.. --to 0x..
//!
//! Prints the relayer address and calldata of a migration. Nothing is
//! signed or broadcast.

use std::path::PathBuf;
use std::sync::Arc;

use alloy_primitives::{Address, U256};
use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{eyre, Result};
use console::style;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bpt_migrator::chain::{RpcBalances, StaticCallSimulator};
use bpt_migrator::config::Config;
use bpt_migrator::migration::{decode_min_bpt_out, MigrationPayload, Migrations};
use bpt_migrator::repository::{InMemoryGauges, InMemoryPools};
use bpt_migrator::topology::PoolId;

#[derive(Parser, Debug)]
#[command(author, version, about = "Build Balancer relayer multicalls that migrate BPT positions")]
struct Cli {
    /// TOML config file; environment variables are used when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Move an unstaked BPT balance between pools
    Pool2pool(MigrateArgs),

    /// Move a gauge stake between the gauges of two pools
    Gauge2gauge(MigrateArgs),

    /// Minimum BPT out from the hex return data of a peek simulation
    DecodeMinOut {
        /// `multicall` return data, 0x-prefixed or not
        return_data: String,
    },
}

#[derive(Args, Debug)]
struct MigrateArgs {
    /// Account holding the position
    #[arg(long)]
    user: Address,

    /// Source pool id
    #[arg(long)]
    from: PoolId,

    /// Destination pool id
    #[arg(long)]
    to: PoolId,

    /// Commit with this minimum; without it the payload ends in a peek
    #[arg(long, conflicts_with = "simulate")]
    min_bpt_out: Option<U256>,

    /// Simulate the peek payload first and commit with the simulated minimum
    #[arg(long, default_value_t = false)]
    simulate: bool,
}

fn print_banner() {
    println!();
    println!(
        "{}",
        style("═══════════════════════════════════════════════════════════════").cyan()
    );
    println!(
        "{}",
        style(" ⇄ BPT MIGRATOR - Balancer relayer multicall builder").cyan().bold()
    );
    println!(
        "{}",
        style("═══════════════════════════════════════════════════════════════").cyan()
    );
    println!();
}

fn print_payload(payload: &MigrationPayload, min_bpt_out: Option<U256>) {
    println!();
    println!("{}", style("═══ MIGRATION PAYLOAD ═══").blue().bold());
    let steps = payload
        .step_kinds()
        .iter()
        .map(|k| k.to_string())
        .collect::<Vec<_>>()
        .join(" → ");
    println!("{} {}", style("Steps:").bold(), steps);
    if let Some(min_out) = min_bpt_out {
        println!("{} {}", style("Min BPT out:").bold(), min_out);
    }
    println!("{} {}", style("To:").bold(), payload.to);
    println!("{} 0x{}", style("Data:").bold(), hex::encode(&payload.data));
    println!();
}

async fn migrate(config: &Config, args: MigrateArgs, gauges: bool) -> Result<()> {
    let relayer = config.relayer()?;

    let pools = InMemoryPools::from_json_file(&config.pools_file)?;
    let gauge_registry = if gauges {
        InMemoryGauges::from_json_file(&config.gauges_file)?
    } else {
        InMemoryGauges::default()
    };
    info!("Loaded {} pools, {} gauges", pools.len(), gauge_registry.len());

    let migrations = Migrations::new(
        relayer,
        Arc::new(pools),
        Arc::new(gauge_registry),
        Arc::new(RpcBalances::new(config.rpc_url.clone())),
    );

    if args.simulate {
        let simulator = StaticCallSimulator::new(config.rpc_url.clone(), config.simulation_gas_limit);
        let prepared = if gauges {
            migrations
                .prepare_gauge2gauge(args.user, args.from, args.to, &simulator)
                .await?
        } else {
            migrations
                .prepare_pool2pool(args.user, args.from, args.to, &simulator)
                .await?
        };
        print_payload(&prepared.payload, Some(prepared.min_bpt_out));
        return Ok(());
    }

    let payload = if gauges {
        migrations
            .gauge2gauge(args.user, args.from, args.to, args.min_bpt_out)
            .await?
    } else {
        migrations
            .pool2pool(args.user, args.from, args.to, args.min_bpt_out)
            .await?
    };
    print_payload(&payload, args.min_bpt_out);

    if args.min_bpt_out.is_none() {
        println!(
            "{}",
            style("Peek payload: static-call it and pass the result to decode-min-out").yellow()
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bpt_migrator=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    if let Command::DecodeMinOut { return_data } = &cli.command {
        let bytes = hex::decode(return_data.trim().trim_start_matches("0x"))
            .map_err(|e| eyre!("return data is not hex: {}", e))?;
        let min_out = decode_min_bpt_out(&bytes)?;
        println!("{}", min_out);
        return Ok(());
    }

    print_banner();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        error!("Please check your .env file");
        return Err(e);
    }

    config.print_summary();

    match cli.command {
        Command::Pool2pool(args) => migrate(&config, args, false).await,
        Command::Gauge2gauge(args) => migrate(&config, args, true).await,
        Command::DecodeMinOut { .. } => Ok(()),
    }
}
