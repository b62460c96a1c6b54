use crate::network::{Chain, Token};
use alloy_primitives::Address;
use anyhow::{Context, Result};
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub etherscan_api_key: String,
    pub chain: Chain,
    pub wallet_address: Option<Address>,
    pub token_address: Option<Address>,
    pub token_symbol: String,
    pub token_decimals: u8,
    pub database_url: String,
    pub poll_interval: Duration,
    pub http_fallback: bool,
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let etherscan_api_key = std::env::var("ETHERSCAN_API_KEY").unwrap_or_default();

        let chain = Chain(parse_var("CHAIN_ID", 1)?);

        let wallet_address = optional_address("WALLET_ADDRESS")?;
        let token_address = optional_address("TOKEN_ADDRESS")?;
        let token_symbol = std::env::var("TOKEN_SYMBOL").unwrap_or_else(|_| "TOKEN".to_string());
        let token_decimals = parse_var("TOKEN_DECIMALS", 18)?;

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:./walleth.db".to_string());

        let poll_interval = Duration::from_secs(parse_var("POLL_INTERVAL_SECS", 12)?);
        let http_fallback = parse_var("ETHERSCAN_HTTP_FALLBACK", true)?;
        let http_timeout = Duration::from_secs(parse_var("HTTP_TIMEOUT_SECS", 30)?);

        Ok(Config {
            etherscan_api_key,
            chain,
            wallet_address,
            token_address,
            token_symbol,
            token_decimals,
            database_url,
            poll_interval,
            http_fallback,
            http_timeout,
        })
    }

    /// The token whose balance is tracked: `TOKEN_ADDRESS` if set, else the chain's root token.
    pub fn current_token(&self) -> Token {
        match self.token_address {
            Some(address) => Token {
                address,
                chain: self.chain,
                symbol: self.token_symbol.clone(),
                decimals: self.token_decimals,
            },
            None => Token::root(self.chain),
        }
    }

    pub fn require_wallet_address(&self) -> Result<Address> {
        self.wallet_address
            .context("WALLET_ADDRESS must be set in .env")
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("Invalid {name} value: {value}")),
        Err(_) => Ok(default),
    }
}

fn optional_address(name: &str) -> Result<Option<Address>> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(|value| {
            Address::from_str(value.trim()).with_context(|| format!("Invalid {name} format"))
        })
        .transpose()
}
