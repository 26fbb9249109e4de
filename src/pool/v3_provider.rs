//! Uniswap V3 Pool Provider
//!
//! Resolves (tokenA, tokenB, fee) keys to live pool state via RPC:
//! factory.getPool() for the address, then slot0() + liquidity() in
//! parallel. All keys in a batch are fetched concurrently via join_all.
//!
//! A zero pool address (or an uninitialized pool with sqrtPriceX96 = 0)
//! counts as "not found". Any RPC failure fails the whole batch so callers
//! never mistake a transport error for a missing pool.

use super::provider::{PoolAccessor, PoolProvider};
use super::state::{Pool, PoolKey};
use crate::contracts::{UniswapV3Factory, UniswapV3Pool, UNISWAP_V3_FACTORY};
use alloy::primitives::{Address, Uint, U256};
use alloy::providers::Provider;
use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::future::join_all;
use std::sync::Arc;
use tracing::debug;

/// Helper: convert u32 fee tier to alloy uint24 type for contract calls.
/// Uses from_limbs() because Uint<24, 1> doesn't impl From<u32>.
fn fee_to_u24(fee: u32) -> Uint<24, 1> {
    debug_assert!(fee <= 0xFFFFFF, "fee {} exceeds U24 max (16777215)", fee);
    Uint::from_limbs([fee as u64])
}

pub struct V3PoolProvider<P> {
    provider: Arc<P>,
    factory: Address,
}

impl<P: Provider + 'static> V3PoolProvider<P> {
    /// Provider against the canonical Uniswap V3 factory
    pub fn new(provider: Arc<P>) -> Self {
        Self::with_factory(provider, UNISWAP_V3_FACTORY)
    }

    pub fn with_factory(provider: Arc<P>, factory: Address) -> Self {
        Self { provider, factory }
    }

    async fn fetch_pool(&self, key: &PoolKey) -> Result<Option<Pool>> {
        let factory = UniswapV3Factory::new(self.factory, self.provider.clone());
        let pool_address = factory
            .getPool(key.token0.address, key.token1.address, fee_to_u24(key.fee.fee()))
            .call()
            .await
            .with_context(|| format!("Failed to get V3 pool address for {}", key))?;

        if pool_address == Address::ZERO {
            debug!("No V3 pool for {}", key);
            return Ok(None);
        }

        let pool = UniswapV3Pool::new(pool_address, self.provider.clone());
        let slot0_call = pool.slot0();
        let liq_call = pool.liquidity();
        let (slot0_res, liq_res) = tokio::join!(slot0_call.call(), liq_call.call());

        let slot0 = slot0_res.with_context(|| format!("Failed to get slot0 for {}", key))?;
        let liquidity = liq_res.with_context(|| format!("Failed to get liquidity for {}", key))?;

        let sqrt_price_x96 = U256::from(slot0.sqrtPriceX96);
        if sqrt_price_x96.is_zero() {
            debug!("V3 pool {} at {:?} is not initialized", key, pool_address);
            return Ok(None);
        }

        debug!(
            "Fetched V3 pool {} at {:?} | liquidity={}",
            key, pool_address, liquidity
        );

        let pool = Pool::new(
            key.token0.clone(),
            key.token1.clone(),
            key.fee,
            sqrt_price_x96,
            liquidity,
        )?;
        Ok(Some(pool))
    }
}

#[async_trait]
impl<P: Provider + 'static> PoolProvider for V3PoolProvider<P> {
    async fn get_pools(&self, keys: &[PoolKey]) -> Result<PoolAccessor> {
        let results = join_all(keys.iter().map(|key| self.fetch_pool(key))).await;

        let mut pools = Vec::with_capacity(keys.len());
        for result in results {
            if let Some(pool) = result? {
                pools.push(pool);
            }
        }

        debug!("V3 batch fetch: {} of {} keys resolved", pools.len(), keys.len());
        Ok(PoolAccessor::new(pools))
    }
}
