//! L1 Fee Oracle Library
//!
//! Computes the L1 security fee a rollup pays to publish a transaction's
//! calldata (Arbitrum and Optimism fee models) and converts it into USD and
//! any quote token using the deepest-liquidity Uniswap V3 pools.

pub mod config;
pub mod contracts;
pub mod converter;
pub mod error;
pub mod gas;
pub mod pool;
pub mod types;

// Re-export commonly used types
pub use config::ChainConfig;
pub use converter::{L1CostEstimate, PriceConverter};
pub use error::{FeeOracleError, Result};
pub use gas::{arbitrum_fee, gas_used_for_calldata, optimism_fee, Calldata, L1GasData};
pub use pool::{Pool, PoolAccessor, PoolKey, PoolProvider, PoolSelector, StaticPoolProvider};
pub use types::{CurrencyAmount, FeeTier, GasCostBreakdown, GasCosts, Price, Token};
