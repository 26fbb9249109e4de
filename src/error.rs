//! Error types for fee calculation and currency conversion
//!
//! Fatal conditions are returned to the caller of the conversion. The
//! missing native/quote pool case is not fatal; `NoNativePool` exists so the
//! degradation can be described in logs, it is never returned by `convert`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeeOracleError {
    /// Calldata was not `0x` followed by an even number of hex digits
    #[error("invalid calldata: {0}")]
    InvalidCalldata(String),

    #[error("no USD reference token configured for chain {0}")]
    NoUsdReferenceToken(u64),

    #[error("could not find a USD/{native} pool for computing gas costs on chain {chain_id}")]
    NoUsdPool { chain_id: u64, native: String },

    #[error("could not find a {native} pool with {token} for computing gas costs")]
    NoNativePool { native: String, token: String },

    #[error("chain {0} has no native currency configured")]
    UnsupportedChain(u64),

    #[error("token {token} is not part of pool {pool}")]
    TokenNotInPool { token: String, pool: String },

    #[error("invalid pool: {0}")]
    InvalidPool(String),

    #[error("amount in {0} does not fit in 256 bits")]
    AmountOverflow(String),

    /// The pool collaborator failed (transport, timeout, decode); distinct
    /// from a pool simply not existing
    #[error("pool fetch failed: {0:#}")]
    PoolFetch(#[source] anyhow::Error),

    #[error("gas data fetch failed: {0:#}")]
    GasData(#[source] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, FeeOracleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_chain() {
        let err = FeeOracleError::NoUsdReferenceToken(10);
        assert_eq!(err.to_string(), "no USD reference token configured for chain 10");

        let err = FeeOracleError::NoUsdPool { chain_id: 1, native: "WETH".to_string() };
        assert!(err.to_string().contains("USD/WETH"));
    }

    #[test]
    fn test_pool_fetch_keeps_context_chain() {
        let source = anyhow::anyhow!("connection reset").context("slot0 call");
        let err = FeeOracleError::PoolFetch(source);
        let msg = err.to_string();
        assert!(msg.contains("slot0 call"));
        assert!(msg.contains("connection reset"));
    }
}
