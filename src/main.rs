//! l1-fee: price a rollup transaction's L1 data cost
//!
//! Reads the rollup's live fee parameters, computes the L1 security fee for
//! the given calldata and converts it to USD and a quote token through the
//! deepest Uniswap V3 pools.
//!
//! Example:
//!   l1-fee --rollup optimism --chain-id 10 --calldata 0x00ff --rpc-url $RPC_URL

use alloy::primitives::Address;
use alloy::providers::{Provider, ProviderBuilder};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use l1_fee_oracle::config::ChainConfig;
use l1_fee_oracle::converter::{L1CostEstimate, PriceConverter};
use l1_fee_oracle::gas::{ArbitrumGasDataProvider, Calldata, GasDataProvider, OptimismGasDataProvider};
use l1_fee_oracle::pool::V3PoolProvider;
use l1_fee_oracle::types::{CurrencyAmount, Token};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Rollup {
    Arbitrum,
    Optimism,
}

/// L1 security fee calculator for rollups
#[derive(Parser)]
#[command(name = "l1-fee")]
struct Args {
    /// Rollup fee model to apply
    #[arg(long, value_enum)]
    rollup: Rollup,

    /// Chain id of the rollup
    #[arg(long, env = "CHAIN_ID")]
    chain_id: u64,

    /// Transaction calldata, 0x-prefixed hex
    #[arg(long, default_value = "0x")]
    calldata: String,

    /// RPC endpoint of the rollup (http, ws or ipc)
    #[arg(long, env = "RPC_URL")]
    rpc_url: String,

    /// TOML chain table; the built-in table is used when omitted
    #[arg(long, env = "CHAIN_CONFIG")]
    chain_config: Option<PathBuf>,

    /// Uniswap V3 factory address
    #[arg(long)]
    factory: Option<Address>,

    /// Token to express the cost in (defaults to the native currency)
    #[arg(long)]
    quote_token: Option<Address>,

    /// Symbol for a quote token not in the chain table
    #[arg(long, default_value = "TOKEN")]
    quote_symbol: String,

    /// Decimals for a quote token not in the chain table
    #[arg(long, default_value_t = 18)]
    quote_decimals: u8,

    /// Print a JSON report instead of log lines
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    if args.json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(false))
            .with(filter)
            .init();
    }

    let chains = match &args.chain_config {
        Some(path) => ChainConfig::load(path)?,
        None => ChainConfig::builtin(),
    };
    let chains = chains.install()?;
    let native = chains
        .native_currency_of(args.chain_id)
        .with_context(|| format!("Chain {} is not configured", args.chain_id))?
        .clone();

    let quote_token = match args.quote_token {
        Some(address) => chains
            .find_token(args.chain_id, address)
            .cloned()
            .unwrap_or_else(|| Token::new(args.chain_id, address, args.quote_symbol.clone(), args.quote_decimals)),
        None => native.clone(),
    };

    let calldata: Calldata = args.calldata.parse()?;

    info!("Connecting to {}...", url_prefix(&args.rpc_url));
    let provider = ProviderBuilder::new()
        .connect(&args.rpc_url)
        .await
        .context("Failed to connect to RPC")?;
    let provider = Arc::new(provider);

    let remote_chain_id = provider.get_chain_id().await.context("Failed to get chain id")?;
    if remote_chain_id != args.chain_id {
        anyhow::bail!(
            "RPC serves chain {} but --chain-id is {}",
            remote_chain_id,
            args.chain_id
        );
    }

    let gas_data: Box<dyn GasDataProvider> = match args.rollup {
        Rollup::Arbitrum => Box::new(ArbitrumGasDataProvider::new(Arc::clone(&provider))),
        Rollup::Optimism => Box::new(OptimismGasDataProvider::new(Arc::clone(&provider))),
    };
    let pools = match args.factory {
        Some(factory) => V3PoolProvider::with_factory(Arc::clone(&provider), factory),
        None => V3PoolProvider::new(Arc::clone(&provider)),
    };

    let converter = PriceConverter::new(chains);
    let estimate = converter
        .estimate(args.chain_id, &quote_token, gas_data.as_ref(), &calldata, &pools)
        .await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report(&args, &calldata, &estimate))?);
    } else {
        info!("Calldata: {} bytes ({:?} fee model)", calldata.len(), args.rollup);
        info!("L1 gas used: {}", estimate.breakdown.l1_gas_used);
        info!("L1 fee: {} wei", estimate.breakdown.l1_fee_wei);
        info!("Cost in USD: {}", estimate.costs.cost_in_usd);
        info!("Cost in {}: {}", quote_token, estimate.costs.cost_in_quote_token);
    }

    Ok(())
}

fn amount_json(amount: &CurrencyAmount) -> serde_json::Value {
    serde_json::json!({
        "token": format!("{:?}", amount.token().address),
        "symbol": amount.token().symbol,
        "raw": amount.raw().to_string(),
        "formatted": amount.to_exact_string(),
    })
}

fn report(args: &Args, calldata: &Calldata, estimate: &L1CostEstimate) -> serde_json::Value {
    serde_json::json!({
        "chain_id": args.chain_id,
        "rollup": format!("{:?}", args.rollup).to_lowercase(),
        "calldata_bytes": calldata.len(),
        "l1_gas_used": estimate.breakdown.l1_gas_used.to_string(),
        "l1_fee_wei": estimate.breakdown.l1_fee_wei.to_string(),
        "cost_in_usd": amount_json(&estimate.costs.cost_in_usd),
        "cost_in_quote_token": amount_json(&estimate.costs.cost_in_quote_token),
    })
}

/// First 40 bytes of an RPC URL for logging; the whole URL when byte 40 is
/// not a char boundary
fn url_prefix(url: &str) -> &str {
    url.get(..40).unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_prefix() {
        assert_eq!(url_prefix("http://localhost:8545"), "http://localhost:8545");
        let long = format!("https://rpc.example.org/v2/{}", "k".repeat(40));
        assert_eq!(url_prefix(&long).len(), 40);
        // byte 40 falls inside the two-byte 'é'
        let multibyte = format!("{}é/key", "a".repeat(39));
        assert_eq!(url_prefix(&multibyte), multibyte);
    }
}
