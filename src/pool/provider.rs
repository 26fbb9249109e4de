//! Pool Provider Abstraction
//!
//! The selector depends on a single capability: fetch a batch of pools by
//! (tokenA, tokenB, fee) in one call. `Err` means the fetch failed; a key
//! missing from the returned accessor means the pool does not exist.

use super::state::{Pool, PoolKey};
use crate::types::{FeeTier, Token};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// Batched pool fetcher. Implementations must tolerate concurrent calls.
#[async_trait]
pub trait PoolProvider: Send + Sync {
    async fn get_pools(&self, keys: &[PoolKey]) -> Result<PoolAccessor>;
}

/// Pools fetched for one request
#[derive(Debug, Clone, Default)]
pub struct PoolAccessor {
    pools: HashMap<PoolKey, Pool>,
}

impl PoolAccessor {
    pub fn new(pools: impl IntoIterator<Item = Pool>) -> Self {
        Self {
            pools: pools.into_iter().map(|p| (p.key(), p)).collect(),
        }
    }

    /// Token order does not matter
    pub fn get_pool(&self, token_a: &Token, token_b: &Token, fee: FeeTier) -> Option<&Pool> {
        self.pools.get(&PoolKey::new(token_a, token_b, fee))
    }

    pub fn get(&self, key: &PoolKey) -> Option<&Pool> {
        self.pools.get(key)
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}

/// In-memory provider over a fixed pool set
#[derive(Debug, Clone, Default)]
pub struct StaticPoolProvider {
    pools: HashMap<PoolKey, Pool>,
}

impl StaticPoolProvider {
    pub fn new(pools: impl IntoIterator<Item = Pool>) -> Self {
        Self {
            pools: pools.into_iter().map(|p| (p.key(), p)).collect(),
        }
    }

    /// Add or replace a pool
    pub fn insert(&mut self, pool: Pool) {
        self.pools.insert(pool.key(), pool);
    }
}

#[async_trait]
impl PoolProvider for StaticPoolProvider {
    async fn get_pools(&self, keys: &[PoolKey]) -> Result<PoolAccessor> {
        let found = keys
            .iter()
            .filter_map(|key| self.pools.get(key).cloned());
        Ok(PoolAccessor::new(found))
    }
}
