use crate::network::Chain;
use alloy_primitives::{Address, B256, U256};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Balance {
    pub address: Address,
    pub token_address: Address,
    pub chain: Chain,
    pub block: u64,
    pub balance: U256,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionSource {
    Etherscan,
    Walleth,
}

impl fmt::Display for TransactionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionSource::Etherscan => write!(f, "etherscan"),
            TransactionSource::Walleth => write!(f, "walleth"),
        }
    }
}

impl FromStr for TransactionSource {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "etherscan" => Ok(TransactionSource::Etherscan),
            "walleth" => Ok(TransactionSource::Walleth),
            other => Err(anyhow::anyhow!("Unknown transaction source: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionState {
    pub is_pending: bool,
    pub block_number: Option<u64>,
    pub error: Option<String>,
    pub source: TransactionSource,
}

impl TransactionState {
    pub fn pending(source: TransactionSource) -> Self {
        Self {
            is_pending: true,
            block_number: None,
            error: None,
            source,
        }
    }

    pub fn confirmed(block_number: u64, source: TransactionSource) -> Self {
        Self {
            is_pending: false,
            block_number: Some(block_number),
            error: None,
            source,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionEntity {
    pub hash: B256,
    pub chain: Chain,
    pub from: Address,
    pub to: Option<Address>,
    pub value: U256,
    pub nonce: u64,
    pub gas_price: U256,
    pub gas_limit: u64,
    pub input: String,
    pub timestamp: Option<u64>,
    pub state: TransactionState,
}
