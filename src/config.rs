//! Chain configuration
//!
//! Per-chain wrapped native currency and the ordered USD reference tokens
//! used to price gas. Loaded once at startup (built-in table or TOML file)
//! and installed process-wide; there is no reload path.
//!
//! TOML layout:
//!
//! ```toml
//! [[chain]]
//! chain_id = 10
//! name = "optimism"
//! native = { address = "0x4200000000000000000000000000000000000006", symbol = "WETH", decimals = 18 }
//! usd_tokens = [
//!     { address = "0x7F5c764cBc14f9669B88837ca1490cCa17c31607", symbol = "USDC", decimals = 6 },
//! ]
//! ```

use crate::error::{FeeOracleError, Result};
use crate::types::Token;
use alloy::primitives::{address, Address};
use anyhow::{bail, Context};
use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

pub const MAINNET: u64 = 1;
pub const OPTIMISM: u64 = 10;
pub const ARBITRUM_ONE: u64 = 42161;

static GLOBAL: OnceCell<ChainConfig> = OnceCell::new();

#[derive(Debug, Clone)]
pub struct ChainEntry {
    pub name: String,
    pub native: Token,
    pub usd_tokens: Vec<Token>,
}

#[derive(Debug, Clone, Default)]
pub struct ChainConfig {
    chains: HashMap<u64, ChainEntry>,
}

// ---------------------------------------------------------------------------
// TOML structures
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ChainConfigFile {
    #[serde(rename = "chain", default)]
    chains: Vec<ChainSection>,
}

#[derive(Debug, Deserialize)]
struct ChainSection {
    chain_id: u64,
    name: String,
    native: TokenSection,
    #[serde(default)]
    usd_tokens: Vec<TokenSection>,
}

#[derive(Debug, Deserialize)]
struct TokenSection {
    address: String, // Address as string
    symbol: String,
    decimals: u8,
}

impl TokenSection {
    fn to_token(&self, chain_id: u64) -> anyhow::Result<Token> {
        let address: Address = self
            .address
            .parse()
            .with_context(|| format!("Invalid address for {}: {}", self.symbol, self.address))?;
        Ok(Token::new(chain_id, address, self.symbol.clone(), self.decimals))
    }
}

impl ChainConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a chain. The native token must belong to `chain_id`,
    /// and so must every USD reference token.
    pub fn insert(&mut self, chain_id: u64, entry: ChainEntry) -> anyhow::Result<()> {
        if entry.native.chain_id != chain_id {
            bail!(
                "Native token {} of chain {} is declared on chain {}",
                entry.native,
                chain_id,
                entry.native.chain_id
            );
        }
        if let Some(foreign) = entry.usd_tokens.iter().find(|t| t.chain_id != chain_id) {
            bail!(
                "USD token {} of chain {} is declared on chain {}",
                foreign,
                chain_id,
                foreign.chain_id
            );
        }
        self.chains.insert(chain_id, entry);
        Ok(())
    }

    /// Ethereum mainnet, Optimism and Arbitrum One with DAI/USDC/USDT
    pub fn builtin() -> Self {
        let weth = |chain_id, addr| Token::new(chain_id, addr, "WETH", 18);
        let dai = |chain_id, addr| Token::new(chain_id, addr, "DAI", 18);
        let usdc = |chain_id, addr| Token::new(chain_id, addr, "USDC", 6);
        let usdt = |chain_id, addr| Token::new(chain_id, addr, "USDT", 6);

        let mut chains = HashMap::new();
        chains.insert(
            MAINNET,
            ChainEntry {
                name: "mainnet".to_string(),
                native: weth(MAINNET, address!("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2")),
                usd_tokens: vec![
                    dai(MAINNET, address!("6b175474e89094c44da98b954eedeac495271d0f")),
                    usdc(MAINNET, address!("a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48")),
                    usdt(MAINNET, address!("dac17f958d2ee523a2206206994597c13d831ec7")),
                ],
            },
        );
        chains.insert(
            OPTIMISM,
            ChainEntry {
                name: "optimism".to_string(),
                native: weth(OPTIMISM, address!("4200000000000000000000000000000000000006")),
                usd_tokens: vec![
                    dai(OPTIMISM, address!("da10009cbd5d07dd0cecc66161fc93d7c9000da1")),
                    usdc(OPTIMISM, address!("7f5c764cbc14f9669b88837ca1490cca17c31607")),
                    usdt(OPTIMISM, address!("94b008aa00579c1307b0ef2c499ad98a8ce58e58")),
                ],
            },
        );
        chains.insert(
            ARBITRUM_ONE,
            ChainEntry {
                name: "arbitrum".to_string(),
                native: weth(ARBITRUM_ONE, address!("82af49447d8a07e3bd95bd0d56f35241523fbab1")),
                usd_tokens: vec![
                    dai(ARBITRUM_ONE, address!("da10009cbd5d07dd0cecc66161fc93d7c9000da1")),
                    usdc(ARBITRUM_ONE, address!("ff970a61a04b1ca14834a43f5de4533ebddb5cc8")),
                    usdt(ARBITRUM_ONE, address!("fd086bc7cd5c481dcc9c85ebe478a1c0b69fcbb9")),
                ],
            },
        );
        Self { chains }
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let file: ChainConfigFile =
            toml::from_str(content).context("Failed to parse chain configuration")?;

        let mut config = Self::new();
        for section in &file.chains {
            if config.chains.contains_key(&section.chain_id) {
                bail!("Chain {} configured twice", section.chain_id);
            }
            let native = section
                .native
                .to_token(section.chain_id)
                .with_context(|| format!("Chain {} native currency", section.chain_id))?;
            let usd_tokens = section
                .usd_tokens
                .iter()
                .map(|t| t.to_token(section.chain_id))
                .collect::<anyhow::Result<Vec<_>>>()
                .with_context(|| format!("Chain {} USD tokens", section.chain_id))?;

            config.insert(
                section.chain_id,
                ChainEntry {
                    name: section.name.clone(),
                    native,
                    usd_tokens,
                },
            )?;
        }
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read chain config file: {}", path.as_ref().display())
        })?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid chain config: {}", path.as_ref().display()))
    }

    /// Install the process-wide configuration. Fails if one is already set.
    pub fn install(self) -> anyhow::Result<&'static ChainConfig> {
        let count = self.chains.len();
        GLOBAL
            .set(self)
            .map_err(|_| anyhow::anyhow!("Chain configuration already installed"))?;
        info!("Chain configuration installed: {} chains", count);
        GLOBAL
            .get()
            .context("Chain configuration missing right after install")
    }

    /// Installed configuration, falling back to the built-in table
    pub fn global() -> &'static ChainConfig {
        GLOBAL.get_or_init(ChainConfig::builtin)
    }

    pub fn chain(&self, chain_id: u64) -> Option<&ChainEntry> {
        self.chains.get(&chain_id)
    }

    pub fn chain_ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self.chains.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn native_currency_of(&self, chain_id: u64) -> Result<&Token> {
        self.chains
            .get(&chain_id)
            .map(|entry| &entry.native)
            .ok_or(FeeOracleError::UnsupportedChain(chain_id))
    }

    /// Empty for unknown chains and chains without USD references
    pub fn usd_reference_tokens_of(&self, chain_id: u64) -> &[Token] {
        self.chains
            .get(&chain_id)
            .map(|entry| entry.usd_tokens.as_slice())
            .unwrap_or(&[])
    }

    /// Look up a configured token (native or USD reference) by address
    pub fn find_token(&self, chain_id: u64, address: Address) -> Option<&Token> {
        let entry = self.chains.get(&chain_id)?;
        std::iter::once(&entry.native)
            .chain(entry.usd_tokens.iter())
            .find(|t| t.address == address)
    }
}
