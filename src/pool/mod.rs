//! Pool module
//!
//! V3 pool snapshots, the batched pool provider abstraction (in-memory and
//! on-chain implementations) and deepest-liquidity selection.

pub mod provider;
pub mod selector;
pub mod state;
pub mod v3_provider;

pub use provider::{PoolAccessor, PoolProvider, StaticPoolProvider};
pub use selector::{PoolSelector, NATIVE_POOL_FEE_TIERS, USD_POOL_FEE_TIERS};
pub use state::{encode_sqrt_ratio_x96, Pool, PoolKey};
pub use v3_provider::V3PoolProvider;
