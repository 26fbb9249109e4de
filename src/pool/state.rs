//! V3 Pool State
//!
//! Pool snapshot used for ranking (liquidity) and pricing (sqrtPriceX96).
//! Prices are exact ratios; no floating point.
//!
//! V3 pools sort tokens by address (token0 < token1) and sqrtPriceX96
//! encodes sqrt(token1/token0) as a Q64.96 fixed point number, so
//! token0 price = sqrtPriceX96² / 2^192.

use crate::error::{FeeOracleError, Result};
use crate::types::{FeeTier, Price, Token, U512};
use alloy::primitives::U256;
use std::fmt;

/// Order-independent lookup key for (tokenA, tokenB, fee)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PoolKey {
    pub token0: Token,
    pub token1: Token,
    pub fee: FeeTier,
}

impl PoolKey {
    pub fn new(token_a: &Token, token_b: &Token, fee: FeeTier) -> Self {
        let (token0, token1) = if token_a.sorts_before(token_b) {
            (token_a.clone(), token_b.clone())
        } else {
            (token_b.clone(), token_a.clone())
        };
        Self { token0, token1, fee }
    }
}

impl fmt::Display for PoolKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}@{}", self.token0, self.token1, self.fee)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pool {
    token0: Token,
    token1: Token,
    fee: FeeTier,
    /// sqrt(token1/token0) as Q64.96, relative to the sorted tokens
    sqrt_price_x96: U256,
    /// Current in-range liquidity
    liquidity: u128,
}

impl Pool {
    /// Build a pool from two tokens in any order. `sqrt_price_x96` must be
    /// expressed for the address-sorted ordering, as returned by slot0().
    pub fn new(
        token_a: Token,
        token_b: Token,
        fee: FeeTier,
        sqrt_price_x96: U256,
        liquidity: u128,
    ) -> Result<Self> {
        if token_a == token_b {
            return Err(FeeOracleError::InvalidPool(format!(
                "pool tokens must differ ({})",
                token_a
            )));
        }
        let (token0, token1) = if token_a.sorts_before(&token_b) {
            (token_a, token_b)
        } else {
            (token_b, token_a)
        };
        Ok(Self {
            token0,
            token1,
            fee,
            sqrt_price_x96,
            liquidity,
        })
    }

    pub fn token0(&self) -> &Token {
        &self.token0
    }

    pub fn token1(&self) -> &Token {
        &self.token1
    }

    pub fn fee(&self) -> FeeTier {
        self.fee
    }

    pub fn liquidity(&self) -> u128 {
        self.liquidity
    }

    pub fn sqrt_price_x96(&self) -> U256 {
        self.sqrt_price_x96
    }

    pub fn key(&self) -> PoolKey {
        PoolKey::new(&self.token0, &self.token1, self.fee)
    }

    pub fn involves_token(&self, token: &Token) -> bool {
        token == &self.token0 || token == &self.token1
    }

    /// Price of token0 in token1
    pub fn token0_price(&self) -> Price {
        let sqrt = U512::from(self.sqrt_price_x96);
        Price::new(
            self.token0.clone(),
            self.token1.clone(),
            sqrt * sqrt,
            q192(),
        )
    }

    /// Price of token1 in token0
    pub fn token1_price(&self) -> Price {
        self.token0_price().invert()
    }

    /// Price of `token` in terms of the pool's other token. Resolved by
    /// token identity, never by position.
    pub fn price_of(&self, token: &Token) -> Result<Price> {
        if token == &self.token0 {
            Ok(self.token0_price())
        } else if token == &self.token1 {
            Ok(self.token1_price())
        } else {
            Err(FeeOracleError::TokenNotInPool {
                token: token.symbol.clone(),
                pool: self.to_string(),
            })
        }
    }
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}/{}@{} (liquidity={})",
            self.token0, self.token1, self.fee, self.liquidity
        )
    }
}

fn q192() -> U512 {
    U512::from(1u64) << 192usize
}

/// Integer square root (floor), Newton's method
fn isqrt(n: U512) -> U512 {
    if n < U512::from(2u64) {
        return n;
    }
    let mut x = n;
    let mut y = (n >> 1usize) + (n & U512::from(1u64));
    while y < x {
        x = y;
        y = (x + n / x) >> 1usize;
    }
    x
}

/// sqrtPriceX96 for a raw ratio `amount1 / amount0` of token1 per token0
pub fn encode_sqrt_ratio_x96(amount1: U256, amount0: U256) -> Result<U256> {
    if amount0.is_zero() {
        return Err(FeeOracleError::InvalidPool("zero amount0 in price ratio".to_string()));
    }
    let ratio_x192 = (U512::from(amount1) << 192usize) / U512::from(amount0);
    U256::checked_from_limbs_slice(isqrt(ratio_x192).as_limbs())
        .ok_or_else(|| FeeOracleError::InvalidPool("sqrt price exceeds 256 bits".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CurrencyAmount;
    use alloy::primitives::{address, Address};

    /// 2^96, i.e. a 1:1 raw price
    fn q96() -> U256 {
        U256::from(1u64) << 96usize
    }

    fn token(addr: Address, symbol: &str, decimals: u8) -> Token {
        Token::new(1, addr, symbol, decimals)
    }

    fn low() -> Token {
        token(address!("0000000000000000000000000000000000000001"), "LOW", 18)
    }

    fn high() -> Token {
        token(address!("00000000000000000000000000000000000000ff"), "HIGH", 6)
    }

    #[test]
    fn test_tokens_sorted_by_address() {
        let pool = Pool::new(high(), low(), FeeTier::Medium, q96(), 1).unwrap();
        assert_eq!(pool.token0(), &low());
        assert_eq!(pool.token1(), &high());
    }

    #[test]
    fn test_identical_tokens_rejected() {
        assert!(matches!(
            Pool::new(low(), low(), FeeTier::Low, q96(), 1),
            Err(FeeOracleError::InvalidPool(_))
        ));
    }

    #[test]
    fn test_pool_key_order_independent() {
        assert_eq!(
            PoolKey::new(&low(), &high(), FeeTier::High),
            PoolKey::new(&high(), &low(), FeeTier::High)
        );
        assert_ne!(
            PoolKey::new(&low(), &high(), FeeTier::High),
            PoolKey::new(&low(), &high(), FeeTier::Low)
        );
    }

    #[test]
    fn test_price_of_resolves_by_identity() {
        // sqrt price 2 * 2^96 -> 4 raw HIGH per raw LOW
        let pool = Pool::new(high(), low(), FeeTier::Medium, q96() * U256::from(2u64), 1).unwrap();

        let low_amount = CurrencyAmount::from_raw(low(), U256::from(1000u64));
        let in_high = pool.price_of(&low()).unwrap().quote(&low_amount).unwrap();
        assert_eq!(in_high.token(), &high());
        assert_eq!(in_high.raw(), U256::from(4000u64));

        let high_amount = CurrencyAmount::from_raw(high(), U256::from(1000u64));
        let in_low = pool.price_of(&high()).unwrap().quote(&high_amount).unwrap();
        assert_eq!(in_low.token(), &low());
        assert_eq!(in_low.raw(), U256::from(250u64));
    }

    #[test]
    fn test_price_of_foreign_token() {
        let pool = Pool::new(high(), low(), FeeTier::Medium, q96(), 1).unwrap();
        let stranger = token(address!("0000000000000000000000000000000000000042"), "X", 18);
        assert!(matches!(
            pool.price_of(&stranger),
            Err(FeeOracleError::TokenNotInPool { .. })
        ));
    }

    #[test]
    fn test_encode_sqrt_ratio_x96() {
        assert_eq!(encode_sqrt_ratio_x96(U256::from(1u64), U256::from(1u64)).unwrap(), q96());
        assert_eq!(
            encode_sqrt_ratio_x96(U256::from(4u64), U256::from(1u64)).unwrap(),
            q96() * U256::from(2u64)
        );
        assert_eq!(
            encode_sqrt_ratio_x96(U256::from(1u64), U256::from(4u64)).unwrap(),
            q96() / U256::from(2u64)
        );
        assert!(encode_sqrt_ratio_x96(U256::from(1u64), U256::ZERO).is_err());
    }

    #[test]
    fn test_encoded_price_quotes_close_to_ratio() {
        // 2000 USDC (6 decimals) per 1 WETH (18 decimals), WETH as token1
        let usdc = token(address!("a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"), "USDC", 6);
        let weth = token(address!("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2"), "WETH", 18);
        let sqrt = encode_sqrt_ratio_x96(
            U256::from(1_000_000_000_000_000_000u128),
            U256::from(2_000_000_000u64),
        )
        .unwrap();
        let pool = Pool::new(weth.clone(), usdc.clone(), FeeTier::Low, sqrt, 1).unwrap();

        let one_eth = CurrencyAmount::from_raw(weth.clone(), U256::from(1_000_000_000_000_000_000u128));
        let usd = pool.price_of(&weth).unwrap().quote(&one_eth).unwrap();
        // flooring the sqrt can only push the inverted price up, by a hair
        assert!(usd.raw() >= U256::from(2_000_000_000u64));
        assert!(usd.raw() <= U256::from(2_000_000_010u64));
    }

    #[test]
    fn test_isqrt_small_values() {
        for (n, root) in [(0u64, 0u64), (1, 1), (2, 1), (3, 1), (4, 2), (15, 3), (16, 4), (17, 4)] {
            assert_eq!(isqrt(U512::from(n)), U512::from(root), "isqrt({})", n);
        }
    }
}
