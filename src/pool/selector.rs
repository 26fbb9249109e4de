//! Deepest-Liquidity Pool Selection
//!
//! Builds the candidate (tokenA, tokenB, fee) sets used for gas cost
//! conversion, fetches them in one batch and keeps the pool with the
//! greatest in-range liquidity. Ties go to the earliest candidate.

use super::provider::PoolProvider;
use super::state::{Pool, PoolKey};
use crate::error::{FeeOracleError, Result};
use crate::types::{FeeTier, Token};
use tracing::debug;

/// Fee tiers tried for native/target pools, in candidate order
pub const NATIVE_POOL_FEE_TIERS: [FeeTier; 3] = [FeeTier::High, FeeTier::Medium, FeeTier::Low];

/// Fee tiers tried for native/USD pools, in candidate order
pub const USD_POOL_FEE_TIERS: [FeeTier; 4] =
    [FeeTier::High, FeeTier::Medium, FeeTier::Low, FeeTier::Lowest];

pub struct PoolSelector;

impl PoolSelector {
    /// (native, target, tier) for each native fee tier
    pub fn native_candidates(native: &Token, target: &Token) -> Vec<PoolKey> {
        NATIVE_POOL_FEE_TIERS
            .iter()
            .map(|&fee| PoolKey::new(native, target, fee))
            .collect()
    }

    /// (native, usd, tier) for every tier, then every USD token within a tier
    pub fn usd_candidates(chain_id: u64, native: &Token, usd_tokens: &[Token]) -> Result<Vec<PoolKey>> {
        if usd_tokens.is_empty() {
            return Err(FeeOracleError::NoUsdReferenceToken(chain_id));
        }
        Ok(USD_POOL_FEE_TIERS
            .iter()
            .flat_map(|&fee| usd_tokens.iter().map(move |usd| PoolKey::new(native, usd, fee)))
            .collect())
    }

    /// One batched fetch, then the strictly-greatest liquidity pool.
    /// `Ok(None)` when no candidate exists; `Err` only when the fetch fails.
    pub async fn select_best<P>(candidates: &[PoolKey], provider: &P) -> Result<Option<Pool>>
    where
        P: PoolProvider + ?Sized,
    {
        let accessor = provider
            .get_pools(candidates)
            .await
            .map_err(FeeOracleError::PoolFetch)?;

        let mut best: Option<&Pool> = None;
        for pool in candidates.iter().filter_map(|key| accessor.get(key)) {
            match best {
                Some(current) if pool.liquidity() <= current.liquidity() => {}
                _ => best = Some(pool),
            }
        }

        if let Some(pool) = best {
            debug!("Selected {} from {} candidates", pool, candidates.len());
        }
        Ok(best.cloned())
    }
}
