//! L1 security fee module
//!
//! Pure fee formulas per rollup architecture, plus providers that read the
//! live fee parameters from chain.

pub mod calculator;
pub mod data_provider;

pub use calculator::{
    arbitrum_fee, gas_used_for_calldata, optimism_fee, ArbitrumGasData, Calldata, L1GasData,
    OptimismGasData, SIGNATURE_SURCHARGE_GAS,
};
pub use data_provider::{ArbitrumGasDataProvider, GasDataProvider, OptimismGasDataProvider};
