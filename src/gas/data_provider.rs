//! Rollup Gas Data Providers
//!
//! Reads the per-network fee parameters the calculator needs from the
//! rollup's own system contracts:
//! - Arbitrum: ArbGasInfo.getPricesInWei() at 0x...6C
//! - Optimism: GasPriceOracle at 0x42...0F (l1BaseFee, scalar, decimals, overhead)

use super::calculator::{ArbitrumGasData, L1GasData, OptimismGasData};
use crate::contracts::{ArbGasInfo, GasPriceOracle, ARB_GAS_INFO, OP_GAS_PRICE_ORACLE};
use alloy::primitives::Address;
use alloy::providers::Provider;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Source of the current L1 fee parameters for one rollup
#[async_trait]
pub trait GasDataProvider: Send + Sync {
    async fn get_gas_data(&self) -> Result<L1GasData>;
}

/// Fixed parameters, for offline use
#[async_trait]
impl GasDataProvider for L1GasData {
    async fn get_gas_data(&self) -> Result<L1GasData> {
        Ok(*self)
    }
}

pub struct ArbitrumGasDataProvider<P> {
    provider: Arc<P>,
    address: Address,
}

impl<P: Provider + 'static> ArbitrumGasDataProvider<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self::with_address(provider, ARB_GAS_INFO)
    }

    pub fn with_address(provider: Arc<P>, address: Address) -> Self {
        Self { provider, address }
    }
}

#[async_trait]
impl<P: Provider + 'static> GasDataProvider for ArbitrumGasDataProvider<P> {
    async fn get_gas_data(&self) -> Result<L1GasData> {
        let gas_info = ArbGasInfo::new(self.address, self.provider.clone());
        let prices = gas_info
            .getPricesInWei()
            .call()
            .await
            .context("Failed to call ArbGasInfo.getPricesInWei")?;

        debug!(
            "Arbitrum gas data: per_l2_tx={} per_l1_calldata_byte={}",
            prices.perL2Tx, prices.perL1CalldataByte
        );

        Ok(L1GasData::Arbitrum(ArbitrumGasData {
            per_l2_tx_fee: prices.perL2Tx,
            per_l1_calldata_fee: prices.perL1CalldataByte,
        }))
    }
}

pub struct OptimismGasDataProvider<P> {
    provider: Arc<P>,
    address: Address,
}

impl<P: Provider + 'static> OptimismGasDataProvider<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self::with_address(provider, OP_GAS_PRICE_ORACLE)
    }

    pub fn with_address(provider: Arc<P>, address: Address) -> Self {
        Self { provider, address }
    }
}

#[async_trait]
impl<P: Provider + 'static> GasDataProvider for OptimismGasDataProvider<P> {
    async fn get_gas_data(&self) -> Result<L1GasData> {
        let oracle = GasPriceOracle::new(self.address, self.provider.clone());
        let l1_base_fee_call = oracle.l1BaseFee();
        let scalar_call = oracle.scalar();
        let decimals_call = oracle.decimals();
        let overhead_call = oracle.overhead();

        let (l1_base_fee, scalar, decimals, overhead) = tokio::join!(
            l1_base_fee_call.call(),
            scalar_call.call(),
            decimals_call.call(),
            overhead_call.call()
        );

        let gas_data = OptimismGasData {
            l1_base_fee: l1_base_fee.context("Failed to get l1BaseFee")?,
            scalar: scalar.context("Failed to get scalar")?,
            decimals: decimals.context("Failed to get decimals")?,
            overhead: overhead.context("Failed to get overhead")?,
        };

        debug!(
            "Optimism gas data: l1_base_fee={} scalar={} decimals={} overhead={}",
            gas_data.l1_base_fee, gas_data.scalar, gas_data.decimals, gas_data.overhead
        );

        Ok(L1GasData::Optimism(gas_data))
    }
}
