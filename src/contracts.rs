//! Contract Definitions
//!
//! Solidity interfaces read by the pool and gas data providers, defined
//! with alloy's `sol!` macro. `#[sol(rpc)]` generates contract instance
//! types callable through any alloy Provider.

use alloy::primitives::{address, Address};
use alloy::sol;

/// Canonical Uniswap V3 factory (Ethereum, Optimism, Arbitrum)
pub const UNISWAP_V3_FACTORY: Address = address!("1f98431c8ad98523631ae4a59f267346ea31f984");

/// Arbitrum ArbGasInfo precompile
pub const ARB_GAS_INFO: Address = address!("000000000000000000000000000000000000006c");

/// Optimism GasPriceOracle predeploy
pub const OP_GAS_PRICE_ORACLE: Address = address!("420000000000000000000000000000000000000f");

// ── Uniswap V3 ───────────────────────────────────────────────────────

sol! {
    #[sol(rpc)]
    interface UniswapV3Factory {
        function getPool(address tokenA, address tokenB, uint24 fee) external view returns (address pool);
    }
}

sol! {
    #[sol(rpc)]
    interface UniswapV3Pool {
        function slot0() external view returns (uint160 sqrtPriceX96, int24 tick, uint16 observationIndex, uint16 observationCardinality, uint16 observationCardinalityNext, uint8 feeProtocol, bool unlocked);
        function liquidity() external view returns (uint128);
    }
}

// ── Rollup gas oracles ───────────────────────────────────────────────

sol! {
    #[sol(rpc)]
    interface ArbGasInfo {
        function getPricesInWei() external view returns (uint256 perL2Tx, uint256 perL1CalldataByte, uint256 perStorageAllocation, uint256 perArbGasBase, uint256 perArbGasCongestion, uint256 perArbGasTotal);
    }
}

sol! {
    #[sol(rpc)]
    interface GasPriceOracle {
        function l1BaseFee() external view returns (uint256);
        function overhead() external view returns (uint256);
        function scalar() external view returns (uint256);
        function decimals() external view returns (uint256);
    }
}
