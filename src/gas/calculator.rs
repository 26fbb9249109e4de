//! L1 Security Fee Calculator
//!
//! Prices publishing an L2 transaction's calldata to L1. Each byte costs
//! 4 gas when zero and 16 gas otherwise, plus a per-network overhead and a
//! fixed 68 × 16 surcharge for the signature bytes.
//!
//! Arbitrum: fee = gas_used * per_l1_calldata_fee + per_l2_tx_fee
//! Optimism: fee = gas_used * l1_base_fee * scalar / 10^decimals
//!
//! Gas and fee amounts are U256 and checked; wei-scale products do not fit
//! u64. The Optimism product is formed in 1024 bits so only the final fee
//! has to fit.

use crate::error::{FeeOracleError, Result};
use crate::types::{GasCostBreakdown, U1024};
use alloy::primitives::U256;
use std::str::FromStr;
use tracing::debug;

/// Gas per zero calldata byte
pub const ZERO_BYTE_GAS: u64 = 4;
/// Gas per non-zero calldata byte
pub const NON_ZERO_BYTE_GAS: u64 = 16;
/// 68 signature bytes priced as non-zero, added to every estimate
pub const SIGNATURE_SURCHARGE_GAS: u64 = 68 * 16;

/// Raw transaction input, parsed from `0x`-prefixed hex
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Calldata(Vec<u8>);

impl Calldata {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn parse(hex_str: &str) -> Result<Self> {
        let digits = hex_str.strip_prefix("0x").ok_or_else(|| {
            FeeOracleError::InvalidCalldata(format!("missing 0x prefix: {:?}", truncate(hex_str)))
        })?;
        if digits.len() % 2 != 0 {
            return Err(FeeOracleError::InvalidCalldata(format!(
                "odd number of hex digits ({})",
                digits.len()
            )));
        }
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(FeeOracleError::InvalidCalldata(format!(
                "non-hex characters in {:?}",
                truncate(hex_str)
            )));
        }
        let bytes = alloy::hex::decode(digits)
            .map_err(|e| FeeOracleError::InvalidCalldata(e.to_string()))?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for Calldata {
    type Err = FeeOracleError;

    fn from_str(s: &str) -> Result<Self> {
        Calldata::parse(s)
    }
}

fn truncate(s: &str) -> &str {
    s.get(..16).unwrap_or(s)
}

/// Arbitrum ArbGasInfo prices (wei)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArbitrumGasData {
    pub per_l2_tx_fee: U256,
    pub per_l1_calldata_fee: U256,
}

/// Optimism GasPriceOracle parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptimismGasData {
    pub l1_base_fee: U256,
    pub scalar: U256,
    pub decimals: U256,
    pub overhead: U256,
}

/// Per-rollup fee parameters, dispatched statically
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum L1GasData {
    Arbitrum(ArbitrumGasData),
    Optimism(OptimismGasData),
}

impl L1GasData {
    pub fn security_fee(&self, calldata: &Calldata) -> Result<GasCostBreakdown> {
        match self {
            L1GasData::Arbitrum(data) => arbitrum_fee(calldata, data),
            L1GasData::Optimism(data) => optimism_fee(calldata, data),
        }
    }

    pub fn network(&self) -> &'static str {
        match self {
            L1GasData::Arbitrum(_) => "arbitrum",
            L1GasData::Optimism(_) => "optimism",
        }
    }
}

fn overflow(what: &str) -> FeeOracleError {
    FeeOracleError::AmountOverflow(format!("L1 {}", what))
}

/// L1 gas used to publish `calldata`, including `overhead` and the
/// signature surcharge
pub fn gas_used_for_calldata(calldata: &Calldata, overhead: U256) -> Result<U256> {
    let count: u64 = calldata
        .as_bytes()
        .iter()
        .map(|&b| if b == 0 { ZERO_BYTE_GAS } else { NON_ZERO_BYTE_GAS })
        .sum();

    overhead
        .checked_add(U256::from(count))
        .and_then(|g| g.checked_add(U256::from(SIGNATURE_SURCHARGE_GAS)))
        .ok_or_else(|| overflow("gas used"))
}

/// Arbitrum security fee. Overhead is zero; the flat per-tx fee is added
/// after the calldata charge.
pub fn arbitrum_fee(calldata: &Calldata, gas_data: &ArbitrumGasData) -> Result<GasCostBreakdown> {
    let l1_gas_used = gas_used_for_calldata(calldata, U256::ZERO)?;
    let l1_fee_wei = l1_gas_used
        .checked_mul(gas_data.per_l1_calldata_fee)
        .and_then(|fee| fee.checked_add(gas_data.per_l2_tx_fee))
        .ok_or_else(|| overflow("fee"))?;

    debug!(
        "Arbitrum L1 fee: {} bytes -> gas_used={} fee_wei={}",
        calldata.len(),
        l1_gas_used,
        l1_fee_wei
    );

    Ok(GasCostBreakdown { l1_gas_used, l1_fee_wei })
}

/// Optimism security fee, scaled down by 10^decimals with truncation
pub fn optimism_fee(calldata: &Calldata, gas_data: &OptimismGasData) -> Result<GasCostBreakdown> {
    let l1_gas_used = gas_used_for_calldata(calldata, gas_data.overhead)?;

    // three 256-bit factors never exceed 768 bits
    let unscaled = U1024::from(l1_gas_used)
        * U1024::from(gas_data.l1_base_fee)
        * U1024::from(gas_data.scalar);
    // a scale past 1024 bits is larger than any product, so the fee floors to 0
    let l1_fee_wei = match U1024::from(10u64).checked_pow(U1024::from(gas_data.decimals)) {
        Some(scale) => U256::checked_from_limbs_slice((unscaled / scale).as_limbs()).ok_or_else(|| overflow("fee"))?,
        None => U256::ZERO,
    };

    debug!(
        "Optimism L1 fee: {} bytes, overhead={} -> gas_used={} fee_wei={}",
        calldata.len(),
        gas_data.overhead,
        l1_gas_used,
        l1_fee_wei
    );

    Ok(GasCostBreakdown { l1_gas_used, l1_fee_wei })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op_data(l1_base_fee: u64) -> OptimismGasData {
        OptimismGasData {
            l1_base_fee: U256::from(l1_base_fee),
            scalar: U256::from(1_000_000u64),
            decimals: U256::from(6u64),
            overhead: U256::from(2100u64),
        }
    }

    #[test]
    fn test_parse_calldata() {
        assert_eq!(Calldata::parse("0x00ff").unwrap().as_bytes(), &[0x00, 0xff]);
        assert!(Calldata::parse("0x").unwrap().is_empty());
        assert_eq!(Calldata::parse("0xABcd").unwrap().as_bytes(), &[0xab, 0xcd]);
    }

    #[test]
    fn test_parse_calldata_rejects_malformed() {
        for bad in ["00ff", "0x0", "0x0g", "0xzz", "", "0x0x00", "0x0x00ff", "0x 0", "0x+1"] {
            assert!(
                matches!(Calldata::parse(bad), Err(FeeOracleError::InvalidCalldata(_))),
                "expected InvalidCalldata for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_gas_used_mixed_bytes() {
        let calldata: Calldata = "0x00ff".parse().unwrap();
        assert_eq!(gas_used_for_calldata(&calldata, U256::ZERO).unwrap(), U256::from(1108u64));
    }

    #[test]
    fn test_gas_used_empty() {
        let calldata = Calldata::default();
        assert_eq!(gas_used_for_calldata(&calldata, U256::ZERO).unwrap(), U256::from(1088u64));
    }

    #[test]
    fn test_gas_used_all_zero_and_all_nonzero() {
        let overhead = U256::from(188u64);
        for n in [1usize, 7, 64, 1000] {
            let zeros = Calldata::new(vec![0u8; n]);
            assert_eq!(
                gas_used_for_calldata(&zeros, overhead).unwrap(),
                overhead + U256::from(4 * n as u64 + 1088)
            );

            let non_zero = Calldata::new(vec![0x01u8; n]);
            assert_eq!(
                gas_used_for_calldata(&non_zero, overhead).unwrap(),
                overhead + U256::from(16 * n as u64 + 1088)
            );
        }
    }

    #[test]
    fn test_arbitrum_fee_is_linear() {
        let gas_data = ArbitrumGasData {
            per_l2_tx_fee: U256::from(5_000_000_000_000u64),
            per_l1_calldata_fee: U256::from(30_000_000_000u64),
        };
        let calldata: Calldata = "0x00ff".parse().unwrap();
        let breakdown = arbitrum_fee(&calldata, &gas_data).unwrap();
        assert_eq!(breakdown.l1_gas_used, U256::from(1108u64));
        assert_eq!(
            breakdown.l1_fee_wei,
            U256::from(1108u64) * gas_data.per_l1_calldata_fee + gas_data.per_l2_tx_fee
        );

        let empty = arbitrum_fee(&Calldata::default(), &gas_data).unwrap();
        assert_eq!(empty.l1_gas_used, U256::from(1088u64));
    }

    #[test]
    fn test_optimism_fee_truncates() {
        // gas_used = 2100 + 16 + 1088 = 3204; 3204 * 7 * 1_500_000 / 10^6 = 33642
        let gas_data = OptimismGasData {
            l1_base_fee: U256::from(7u64),
            scalar: U256::from(1_500_000u64),
            decimals: U256::from(6u64),
            overhead: U256::from(2100u64),
        };
        let calldata: Calldata = "0x01".parse().unwrap();
        let breakdown = optimism_fee(&calldata, &gas_data).unwrap();
        assert_eq!(breakdown.l1_gas_used, U256::from(3204u64));
        assert_eq!(breakdown.l1_fee_wei, U256::from(33642u64));

        // 3204 * 1 * 333_333 / 10^6 = 1067.99... -> 1067
        let gas_data = OptimismGasData {
            l1_base_fee: U256::from(1u64),
            scalar: U256::from(333_333u64),
            ..gas_data
        };
        let breakdown = optimism_fee(&calldata, &gas_data).unwrap();
        assert_eq!(breakdown.l1_fee_wei, U256::from(1067u64));
    }

    #[test]
    fn test_optimism_fee_monotonic_in_base_fee() {
        let calldata: Calldata = "0xdeadbeef0000".parse().unwrap();
        let mut previous = U256::ZERO;
        for base_fee in [0u64, 1, 2, 10, 1_000_000_000, 30_000_000_000, 250_000_000_000] {
            let fee = optimism_fee(&calldata, &op_data(base_fee)).unwrap().l1_fee_wei;
            assert!(fee >= previous, "fee decreased at base fee {}", base_fee);
            previous = fee;
        }
    }

    #[test]
    fn test_wei_scale_beyond_u64() {
        let gas_data = OptimismGasData {
            l1_base_fee: U256::from(u64::MAX),
            scalar: U256::from(u64::MAX),
            decimals: U256::ZERO,
            overhead: U256::ZERO,
        };
        let fee = optimism_fee(&Calldata::default(), &gas_data).unwrap().l1_fee_wei;
        assert_eq!(fee, U256::from(1088u64) * U256::from(u64::MAX) * U256::from(u64::MAX));
    }

    #[test]
    fn test_optimism_intermediate_product_beyond_256_bits() {
        // 1088 * 10^70 * 10^10 does not fit U256; after scaling by 10^60 it does
        let gas_data = OptimismGasData {
            l1_base_fee: U256::from(10u64).pow(U256::from(70u64)),
            scalar: U256::from(10u64).pow(U256::from(10u64)),
            decimals: U256::from(60u64),
            overhead: U256::ZERO,
        };
        let fee = optimism_fee(&Calldata::default(), &gas_data).unwrap().l1_fee_wei;
        assert_eq!(fee, U256::from(1088u64) * U256::from(10u64).pow(U256::from(20u64)));
    }

    #[test]
    fn test_optimism_huge_decimals_floor_to_zero() {
        // 10^80 exceeds 256 bits, 10^400 exceeds 1024 bits
        for decimals in [80u64, 400, u64::MAX] {
            let gas_data = OptimismGasData {
                l1_base_fee: U256::from(1u64),
                scalar: U256::from(1u64),
                decimals: U256::from(decimals),
                overhead: U256::ZERO,
            };
            let fee = optimism_fee(&Calldata::default(), &gas_data).unwrap().l1_fee_wei;
            assert_eq!(fee, U256::ZERO, "decimals {}", decimals);
        }
    }

    #[test]
    fn test_optimism_final_fee_overflow_is_an_error() {
        let gas_data = OptimismGasData {
            l1_base_fee: U256::MAX,
            scalar: U256::MAX,
            decimals: U256::ZERO,
            overhead: U256::ZERO,
        };
        assert!(matches!(
            optimism_fee(&Calldata::default(), &gas_data),
            Err(FeeOracleError::AmountOverflow(_))
        ));
    }

    #[test]
    fn test_overflow_is_an_error() {
        let gas_data = ArbitrumGasData {
            per_l2_tx_fee: U256::ZERO,
            per_l1_calldata_fee: U256::MAX,
        };
        assert!(matches!(
            arbitrum_fee(&Calldata::default(), &gas_data),
            Err(FeeOracleError::AmountOverflow(_))
        ));
    }

    #[test]
    fn test_l1_gas_data_dispatch() {
        let calldata: Calldata = "0x00ff".parse().unwrap();
        let arb = L1GasData::Arbitrum(ArbitrumGasData {
            per_l2_tx_fee: U256::from(1u64),
            per_l1_calldata_fee: U256::from(2u64),
        });
        assert_eq!(arb.network(), "arbitrum");
        assert_eq!(arb.security_fee(&calldata).unwrap().l1_fee_wei, U256::from(2217u64));

        let op = L1GasData::Optimism(op_data(1));
        assert_eq!(op.network(), "optimism");
        // (2100 + 1108) * 1 * 1_000_000 / 10^6
        assert_eq!(op.security_fee(&calldata).unwrap().l1_fee_wei, U256::from(3208u64));
    }
}
