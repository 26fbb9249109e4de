// Core data structures: tokens, fee tiers, exact amounts and prices

use crate::error::{FeeOracleError, Result};
use alloy::primitives::{Address, Uint, U256};
use rust_decimal::Decimal;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// 512-bit integer for price ratios (sqrtPriceX96² needs up to 320 bits)
pub type U512 = Uint<512, 8>;
/// 1024-bit integer for amount × ratio products
pub type U1024 = Uint<1024, 16>;

/// ERC20 token identity plus display metadata
///
/// Equality and hashing use (chain_id, address) only; symbol and decimals
/// are carried along for logging and formatting.
#[derive(Debug, Clone)]
pub struct Token {
    pub chain_id: u64,
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
}

impl Token {
    pub fn new(chain_id: u64, address: Address, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            chain_id,
            address,
            symbol: symbol.into(),
            decimals,
        }
    }

    /// V3 pools order their tokens by address (token0 < token1)
    pub fn sorts_before(&self, other: &Token) -> bool {
        self.address < other.address
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.chain_id == other.chain_id && self.address == other.address
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.chain_id.hash(state);
        self.address.hash(state);
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

/// Uniswap V3 fee tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeeTier {
    Lowest, // 0.01%
    Low,    // 0.05%
    Medium, // 0.30%
    High,   // 1.00%
}

impl FeeTier {
    /// Fee in hundredths of a bip, as passed to the factory
    pub fn fee(&self) -> u32 {
        match self {
            FeeTier::Lowest => 100,
            FeeTier::Low => 500,
            FeeTier::Medium => 3000,
            FeeTier::High => 10000,
        }
    }
}

impl TryFrom<u32> for FeeTier {
    type Error = FeeOracleError;

    fn try_from(fee: u32) -> Result<Self> {
        match fee {
            100 => Ok(FeeTier::Lowest),
            500 => Ok(FeeTier::Low),
            3000 => Ok(FeeTier::Medium),
            10000 => Ok(FeeTier::High),
            other => Err(FeeOracleError::InvalidPool(format!("unknown fee tier {}", other))),
        }
    }
}

impl fmt::Display for FeeTier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FeeTier::Lowest => write!(f, "0.01%"),
            FeeTier::Low => write!(f, "0.05%"),
            FeeTier::Medium => write!(f, "0.30%"),
            FeeTier::High => write!(f, "1.00%"),
        }
    }
}

/// Exact token amount in raw (smallest unit) integer form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyAmount {
    token: Token,
    raw: U256,
}

impl CurrencyAmount {
    pub fn from_raw(token: Token, raw: U256) -> Self {
        Self { token, raw }
    }

    pub fn zero(token: Token) -> Self {
        Self::from_raw(token, U256::ZERO)
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn raw(&self) -> U256 {
        self.raw
    }

    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }

    /// Decimal string using the token's scale, computed without floats.
    /// Trailing fractional zeros are trimmed: 1.500000 USDC -> "1.5".
    pub fn to_exact_string(&self) -> String {
        let digits = self.raw.to_string();
        let scale = self.token.decimals as usize;
        if scale == 0 {
            return digits;
        }

        let padded = if digits.len() <= scale {
            format!("{}{}", "0".repeat(scale - digits.len() + 1), digits)
        } else {
            digits
        };
        let (int_part, frac_part) = padded.split_at(padded.len() - scale);
        let frac_part = frac_part.trim_end_matches('0');

        if frac_part.is_empty() {
            int_part.to_string()
        } else {
            format!("{}.{}", int_part, frac_part)
        }
    }

    /// Best-effort Decimal for display. None when the value exceeds
    /// Decimal's 96-bit mantissa.
    pub fn to_decimal(&self) -> Option<Decimal> {
        Decimal::from_str(&self.to_exact_string()).ok()
    }
}

impl fmt::Display for CurrencyAmount {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.to_exact_string(), self.token.symbol)
    }
}

/// Exchange rate between two tokens in raw units:
/// `raw quote = raw base * numerator / denominator`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Price {
    pub base: Token,
    pub quote: Token,
    pub numerator: U512,
    pub denominator: U512,
}

impl Price {
    pub fn new(base: Token, quote: Token, numerator: U512, denominator: U512) -> Self {
        Self {
            base,
            quote,
            numerator,
            denominator,
        }
    }

    pub fn invert(&self) -> Price {
        Price::new(
            self.quote.clone(),
            self.base.clone(),
            self.denominator,
            self.numerator,
        )
    }

    /// Apply the price to an amount of the base token. Truncates toward zero.
    pub fn quote(&self, amount: &CurrencyAmount) -> Result<CurrencyAmount> {
        if amount.token() != &self.base {
            return Err(FeeOracleError::TokenNotInPool {
                token: amount.token().symbol.clone(),
                pool: format!("{}/{}", self.base, self.quote),
            });
        }
        if self.denominator.is_zero() {
            return Err(FeeOracleError::InvalidPool(format!(
                "{}/{} price has zero denominator",
                self.base, self.quote
            )));
        }

        let product = U1024::from(amount.raw()) * U1024::from(self.numerator);
        let quoted = product / U1024::from(self.denominator);
        let raw = U256::checked_from_limbs_slice(quoted.as_limbs())
            .ok_or_else(|| FeeOracleError::AmountOverflow(self.quote.symbol.clone()))?;

        Ok(CurrencyAmount::from_raw(self.quote.clone(), raw))
    }
}

/// L1 gas accounting for one transaction's calldata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasCostBreakdown {
    pub l1_gas_used: U256,
    pub l1_fee_wei: U256,
}

/// Converted L1 fee
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasCosts {
    /// Zero in the target token when no native/target pool exists
    pub cost_in_quote_token: CurrencyAmount,
    pub cost_in_usd: CurrencyAmount,
}
