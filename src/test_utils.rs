//! Shared fixtures for unit tests.
#![allow(dead_code)]

use crate::network::{Chain, Token};
use crate::repository::{Balance, TransactionEntity, TransactionSource, TransactionState};
use crate::transport::{Transport, TransportError};
use alloy_primitives::{Address, B256, U256, address};
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::Mutex;

pub const WALLET: Address = address!("0x381e247bef0ebc21b6611786c665dd5514dcc31f");
pub const OTHER: Address = address!("0x0000000000000000000000000000000000001234");
pub const DAI: Address = address!("0x6b175474e89094c44da98b954eedeac495271d0f");

pub fn hash(n: u8) -> B256 {
    B256::with_last_byte(n)
}

pub fn dai_token() -> Token {
    Token {
        address: DAI,
        chain: Chain::MAINNET,
        symbol: "DAI".to_string(),
        decimals: 18,
    }
}

pub fn balance(address: Address, token_address: Address, block: u64, amount: u64) -> Balance {
    Balance {
        address,
        token_address,
        chain: Chain::MAINNET,
        block,
        balance: U256::from(amount),
    }
}

pub fn confirmed_tx(n: u8, from: Address, to: Address, block: u64) -> TransactionEntity {
    TransactionEntity {
        state: TransactionState::confirmed(block, TransactionSource::Etherscan),
        ..pending_tx(n, from, to)
    }
}

pub fn pending_tx(n: u8, from: Address, to: Address) -> TransactionEntity {
    TransactionEntity {
        hash: hash(n),
        chain: Chain::MAINNET,
        from,
        to: Some(to),
        value: U256::from(1_000u64),
        nonce: u64::from(n),
        gas_price: U256::from(20_000_000_000u64),
        gas_limit: 21_000,
        input: "0x".to_string(),
        timestamp: Some(1_500_000_000),
        state: TransactionState::pending(TransactionSource::Walleth),
    }
}

/// One entry of an Etherscan `txlist` result.
pub fn txlist_entry(n: u8, from: Address, to: Address, block: u64) -> Value {
    json!({
        "blockNumber": block.to_string(),
        "timeStamp": "1500000000",
        "hash": format!("{:?}", hash(n)),
        "nonce": n.to_string(),
        "blockHash": format!("{:?}", B256::repeat_byte(0xbb)),
        "transactionIndex": "0",
        "from": format!("{from:?}"),
        "to": format!("{to:?}"),
        "value": "1000000000000000000",
        "gas": "21000",
        "gasPrice": "20000000000",
        "isError": "0",
        "txreceipt_status": "1",
        "input": "0x",
        "contractAddress": "",
        "cumulativeGasUsed": "21000",
        "gasUsed": "21000",
        "confirmations": "100"
    })
}

pub fn envelope(result: Value) -> String {
    json!({ "status": "1", "message": "OK", "result": result }).to_string()
}

/// Replays scripted responses in order and records every requested URL.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<String, TransportError>>>,
    requests: Mutex<Vec<String>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, body: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push_back(Ok(body.into()));
        self
    }

    pub fn fail(self, error: TransportError) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for MockTransport {
    async fn get(&self, url: &str) -> Result<String, TransportError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Network("no scripted response".into())))
    }
}
