//! Gas Cost Conversion
//!
//! Expresses an L1 fee (wei of the chain's native currency) in USD and in
//! an arbitrary quote token, using the deepest native/USD and native/quote
//! V3 pools.
//!
//! Only a missing USD pool is fatal. A missing native/quote pool degrades
//! to a zero amount in the quote token.

use crate::config::ChainConfig;
use crate::error::{FeeOracleError, Result};
use crate::gas::{Calldata, GasDataProvider};
use crate::pool::{Pool, PoolProvider, PoolSelector};
use crate::types::{CurrencyAmount, GasCostBreakdown, GasCosts, Token};
use alloy::primitives::U256;
use tracing::{debug, error, info};

/// Fee calculation plus conversion for one transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct L1CostEstimate {
    pub breakdown: GasCostBreakdown,
    pub costs: GasCosts,
}

/// Stateless per call; every request brings its own provider
pub struct PriceConverter<'a> {
    chains: &'a ChainConfig,
}

impl PriceConverter<'static> {
    /// Converter over the process-wide chain configuration
    pub fn global() -> Self {
        Self::new(ChainConfig::global())
    }
}

impl<'a> PriceConverter<'a> {
    pub fn new(chains: &'a ChainConfig) -> Self {
        Self { chains }
    }

    /// Deepest native/USD pool. Fatal when no candidate resolves.
    pub async fn select_usd_pool<P>(&self, chain_id: u64, provider: &P) -> Result<Pool>
    where
        P: PoolProvider + ?Sized,
    {
        let native = self.chains.native_currency_of(chain_id)?;
        let usd_tokens = self.chains.usd_reference_tokens_of(chain_id);
        let candidates = PoolSelector::usd_candidates(chain_id, native, usd_tokens)?;

        match PoolSelector::select_best(&candidates, provider).await? {
            Some(pool) => Ok(pool),
            None => {
                let attempted: Vec<String> = candidates.iter().map(|k| k.to_string()).collect();
                error!(
                    ?attempted,
                    "Could not find a USD/{} pool for computing gas costs on chain {}",
                    native,
                    chain_id
                );
                Err(FeeOracleError::NoUsdPool {
                    chain_id,
                    native: native.symbol.clone(),
                })
            }
        }
    }

    /// Deepest native/target pool, or None when the pair has no pool
    pub async fn select_native_pool<P>(
        &self,
        chain_id: u64,
        target: &Token,
        provider: &P,
    ) -> Result<Option<Pool>>
    where
        P: PoolProvider + ?Sized,
    {
        let native = self.chains.native_currency_of(chain_id)?;
        let candidates = PoolSelector::native_candidates(native, target);
        PoolSelector::select_best(&candidates, provider).await
    }

    /// Convert `l1_fee_wei` into USD and into `target`
    pub async fn convert<P>(
        &self,
        chain_id: u64,
        target: &Token,
        l1_fee_wei: U256,
        provider: &P,
    ) -> Result<GasCosts>
    where
        P: PoolProvider + ?Sized,
    {
        let native = self.chains.native_currency_of(chain_id)?;
        let cost_native = CurrencyAmount::from_raw(native.clone(), l1_fee_wei);

        let usd_pool = self.select_usd_pool(chain_id, provider).await?;
        let cost_in_usd = usd_pool.price_of(native)?.quote(&cost_native)?;

        let cost_in_quote_token = if target == native {
            cost_native
        } else {
            match self.select_native_pool(chain_id, target, provider).await? {
                Some(pool) => pool.price_of(native)?.quote(&cost_native)?,
                None => {
                    let reason = FeeOracleError::NoNativePool {
                        native: native.symbol.clone(),
                        token: target.symbol.clone(),
                    };
                    info!("{}; converting the cost into the quote token as zero", reason);
                    CurrencyAmount::zero(target.clone())
                }
            }
        };

        debug!(
            "L1 fee {} wei on chain {} -> {} / {}",
            l1_fee_wei, chain_id, cost_in_usd, cost_in_quote_token
        );

        Ok(GasCosts {
            cost_in_quote_token,
            cost_in_usd,
        })
    }

    /// Compute the security fee for `calldata` from live gas data, then
    /// convert it
    pub async fn estimate<G, P>(
        &self,
        chain_id: u64,
        target: &Token,
        gas_data: &G,
        calldata: &Calldata,
        provider: &P,
    ) -> Result<L1CostEstimate>
    where
        G: GasDataProvider + ?Sized,
        P: PoolProvider + ?Sized,
    {
        let gas_data = gas_data
            .get_gas_data()
            .await
            .map_err(FeeOracleError::GasData)?;
        let breakdown = gas_data.security_fee(calldata)?;
        let costs = self
            .convert(chain_id, target, breakdown.l1_fee_wei, provider)
            .await?;
        Ok(L1CostEstimate { breakdown, costs })
    }
}
