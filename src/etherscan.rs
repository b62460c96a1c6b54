//! Mirrors remote Etherscan state (balances and transaction history) into the
//! local store, fetching only blocks it has not seen yet.

use crate::network::{NetworkDefinition, Token};
use crate::repository::{
    Balance, BalanceRepository, Database, TransactionEntity, TransactionRepository,
    TransactionSource, TransactionState,
};
use crate::transport::{Transport, TransportError};
use alloy_primitives::{Address, B256, U256};
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;
use tracing::{debug, error, info, warn};

pub struct EtherscanClient<T: Transport> {
    transport: T,
    db: Database,
    api_key: String,
    network: Option<NetworkDefinition>,
    current_token: Token,
    http_fallback: bool,
    last_seen_transactions_block: u64,
    last_seen_balance_block: u64,
}

impl<T: Transport> EtherscanClient<T> {
    pub fn new(
        transport: T,
        db: Database,
        api_key: impl Into<String>,
        network: NetworkDefinition,
        current_token: Token,
    ) -> Self {
        Self {
            transport,
            db,
            api_key: api_key.into(),
            network: Some(network),
            current_token,
            http_fallback: true,
            last_seen_transactions_block: 0,
            last_seen_balance_block: 0,
        }
    }

    /// Allow a single plain-http retry when the explorer's certificate chain
    /// fails validation.
    pub fn with_http_fallback(mut self, enabled: bool) -> Self {
        self.http_fallback = enabled;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn network(&self) -> Option<&NetworkDefinition> {
        self.network.as_ref()
    }

    pub fn current_token(&self) -> &Token {
        &self.current_token
    }

    pub fn last_seen_transactions_block(&self) -> u64 {
        self.last_seen_transactions_block
    }

    pub fn last_seen_balance_block(&self) -> u64 {
        self.last_seen_balance_block
    }

    pub fn set_network(&mut self, network: Option<NetworkDefinition>) {
        if self.network != network {
            info!("Switching network to {:?}", network.as_ref().map(|n| &n.name));
            self.network = network;
            self.reset();
        }
    }

    pub fn set_current_token(&mut self, token: Token) {
        if self.current_token != token {
            info!("Switching current token to {}", token.symbol);
            self.current_token = token;
            self.reset();
        }
    }

    fn reset(&mut self) {
        self.last_seen_transactions_block = 0;
        self.last_seen_balance_block = 0;
    }

    /// Fetch transactions of `address` in blocks not yet seen and store them.
    ///
    /// Remote failures are logged and leave the client and store untouched.
    /// Returns the number of rows written.
    pub async fn query_transactions(&mut self, address: &Address) -> Result<usize> {
        let Some(network) = self.active_network() else {
            return Ok(0);
        };

        let request = format!(
            "module=account&action=txlist&address={address:?}&startblock={}&endblock={}&sort=asc",
            self.last_seen_transactions_block,
            self.last_seen_balance_block.saturating_add(1)
        );

        let Some(result) = self.get_etherscan_result(&request, &network).await else {
            return Ok(0);
        };

        let parsed = match parse_transactions(&result, &network) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Problem with JSON from Etherscan: {:#}", e);
                return Ok(0);
            }
        };

        self.last_seen_transactions_block =
            self.last_seen_transactions_block.max(parsed.highest_block);

        let db_tx = self.db.conn.unchecked_transaction()?;
        let mut written = 0;
        {
            let repo = TransactionRepository::new(&db_tx);
            for transaction in &parsed.transactions {
                if repo.upsert_unless_confirmed(transaction)? {
                    written += 1;
                }
            }
        }
        db_tx.commit()?;

        info!(
            "Received {} transactions, stored {}, last seen block {}",
            parsed.transactions.len(),
            written,
            self.last_seen_transactions_block
        );

        Ok(written)
    }

    /// Fetch the balance of `address` in the current token and store it if it
    /// was observed at a newer block than the stored one.
    ///
    /// Returns whether a balance row was written.
    pub async fn query_balance(&mut self, address: &Address) -> Result<bool> {
        let Some(network) = self.active_network() else {
            return Ok(false);
        };
        let token = self.current_token.clone();

        let block_result = self
            .get_etherscan_result("module=proxy&action=eth_blockNumber", &network)
            .await;
        let Some(block_number) = block_result.as_ref().and_then(parse_block_number) else {
            warn!("Cannot parse block number from {:?}", block_result);
            return Ok(false);
        };

        self.last_seen_balance_block = block_number;

        let request = if token.is_root_token() {
            format!("module=account&action=balance&address={address:?}&tag=latest")
        } else {
            format!(
                "module=account&action=tokenbalance&contractaddress={:?}&address={address:?}&tag=latest",
                token.address
            )
        };

        let Some(balance_string) = self
            .get_etherscan_result(&request, &network)
            .await
            .as_ref()
            .and_then(result_as_string)
        else {
            debug!("No balance returned for {:?}", address);
            return Ok(false);
        };

        let Some(amount) = parse_balance(&balance_string) else {
            info!("Could not parse number {}", balance_string);
            return Ok(false);
        };

        let balance = Balance {
            address: *address,
            token_address: token.address,
            chain: network.chain,
            block: block_number,
            balance: amount,
        };

        let written = BalanceRepository::new(&self.db.conn).upsert_if_newer_block(&balance)?;
        if written {
            info!(
                "Updated {} balance of {:?} to {} at block {}",
                token.symbol, address, amount, block_number
            );
        } else {
            debug!("Stored balance is at least as new as block {}", block_number);
        }

        Ok(written)
    }

    fn active_network(&self) -> Option<NetworkDefinition> {
        let Some(network) = &self.network else {
            debug!("No network configured, skipping Etherscan query");
            return None;
        };
        if network.chain.etherscan_api_base_url().is_none() {
            debug!("Chain {} has no Etherscan instance", network.chain);
            return None;
        }
        Some(network.clone())
    }

    /// Run `request` against the network's explorer and return the `result`
    /// member of the JSON envelope.
    async fn get_etherscan_result(
        &self,
        request: &str,
        network: &NetworkDefinition,
    ) -> Option<Value> {
        let base_url = network.chain.etherscan_api_base_url()?;

        let body = match self.transport.get(&self.build_url(base_url, request)).await {
            Err(e) if e.is_certificate() && self.http_fallback => {
                warn!("{}, retrying {} over plain http", e, base_url);
                let insecure_base = base_url.replacen("https://", "http://", 1);
                self.transport
                    .get(&self.build_url(&insecure_base, request))
                    .await
            }
            other => other,
        };

        let body = match body {
            Ok(body) => body,
            Err(e) => {
                log_transport_error(&e);
                return None;
            }
        };

        match serde_json::from_str::<Value>(&body) {
            Ok(Value::Object(mut envelope)) => envelope.remove("result"),
            Ok(other) => {
                warn!("Problem with JSON from Etherscan: expected an object, got {}", other);
                None
            }
            Err(e) => {
                warn!("Problem with JSON from Etherscan: {}", e);
                None
            }
        }
    }

    fn build_url(&self, base_url: &str, request: &str) -> String {
        format!("{base_url}/api?{request}&apikey={}", self.api_key)
    }
}

fn log_transport_error(e: &TransportError) {
    match e {
        TransportError::Status(_) => warn!("Etherscan request failed: {}", e),
        _ => error!("Etherscan request failed: {}", e),
    }
}

// SQLite integers are signed, so anything above i64::MAX cannot be stored.
const MAX_STORABLE: u64 = i64::MAX as u64;

fn parse_block_number(result: &Value) -> Option<u64> {
    let hex = result.as_str()?.trim();
    let digits = hex.strip_prefix("0x").unwrap_or(hex);
    u64::from_str_radix(digits, 16)
        .ok()
        .filter(|block| *block <= MAX_STORABLE)
}

/// Plain decimal digits only; empty strings, signs, separators and whitespace are rejected.
fn parse_balance(balance: &str) -> Option<U256> {
    if balance.is_empty() || !balance.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    U256::from_str_radix(balance, 10).ok()
}

fn parse_storable(value: &str, field: &str) -> Result<u64> {
    let parsed: u64 = value
        .parse()
        .with_context(|| format!("Invalid {field}: {value}"))?;
    if parsed > MAX_STORABLE {
        anyhow::bail!("{field} out of range: {value}");
    }
    Ok(parsed)
}

fn result_as_string(result: &Value) -> Option<String> {
    match result {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[derive(Debug)]
pub struct ParsedTransactions {
    pub transactions: Vec<TransactionEntity>,
    pub highest_block: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EtherscanTransaction {
    block_number: String,
    #[serde(default)]
    time_stamp: Option<String>,
    hash: String,
    nonce: String,
    from: String,
    #[serde(default)]
    to: String,
    value: String,
    gas: String,
    gas_price: String,
    #[serde(default)]
    is_error: String,
    #[serde(default)]
    input: String,
}

impl EtherscanTransaction {
    fn into_entity(self, network: &NetworkDefinition) -> Result<TransactionEntity> {
        let block_number = parse_storable(&self.block_number, "blockNumber")?;

        let to = if self.to.is_empty() {
            None
        } else {
            Some(Address::from_str(&self.to).with_context(|| format!("Invalid to: {}", self.to))?)
        };

        let mut state = TransactionState::confirmed(block_number, TransactionSource::Etherscan);
        if self.is_error == "1" {
            state.error = Some("Transaction failed".to_string());
        }

        Ok(TransactionEntity {
            hash: B256::from_str(&self.hash)
                .with_context(|| format!("Invalid hash: {}", self.hash))?,
            chain: network.chain,
            from: Address::from_str(&self.from)
                .with_context(|| format!("Invalid from: {}", self.from))?,
            to,
            value: parse_decimal(&self.value, "value")?,
            nonce: parse_storable(&self.nonce, "nonce")?,
            gas_price: parse_decimal(&self.gas_price, "gasPrice")?,
            gas_limit: parse_storable(&self.gas, "gas")?,
            input: self.input,
            timestamp: self
                .time_stamp
                .as_deref()
                .map(|ts| parse_storable(ts, "timeStamp"))
                .transpose()?,
            state,
        })
    }
}

fn parse_decimal(value: &str, field: &str) -> Result<U256> {
    parse_balance(value).with_context(|| format!("Invalid {field}: {value}"))
}

/// Parse a `txlist` result. Any entry that fails to parse rejects the whole batch.
pub fn parse_transactions(
    result: &Value,
    network: &NetworkDefinition,
) -> Result<ParsedTransactions> {
    if !result.is_array() {
        anyhow::bail!("expected a transaction array, got {}", result);
    }

    let raw: Vec<EtherscanTransaction> =
        serde_json::from_value(result.clone()).context("Invalid transaction entry")?;

    let transactions = raw
        .into_iter()
        .map(|tx| tx.into_entity(network))
        .collect::<Result<Vec<_>>>()?;

    let highest_block = transactions
        .iter()
        .filter_map(|tx| tx.state.block_number)
        .max()
        .unwrap_or(0);

    Ok(ParsedTransactions {
        transactions,
        highest_block,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::Chain;
    use crate::repository::TransactionRepository;
    use crate::test_utils::{
        DAI, MockTransport, OTHER, WALLET, confirmed_tx, dai_token, envelope, hash, pending_tx,
        txlist_entry,
    };
    use rstest::rstest;
    use serde_json::json;

    fn client(transport: MockTransport) -> EtherscanClient<MockTransport> {
        EtherscanClient::new(
            transport,
            Database::in_memory().unwrap(),
            "TESTKEY",
            NetworkDefinition::for_chain(Chain::MAINNET),
            Token::root(Chain::MAINNET),
        )
    }

    #[tokio::test]
    async fn test_query_transactions_advances_last_seen_block() {
        let transport = MockTransport::new().respond(envelope(json!([
            txlist_entry(1, OTHER, WALLET, 5),
            txlist_entry(2, WALLET, OTHER, 9),
        ])));
        let mut client = client(transport);

        let written = client.query_transactions(&WALLET).await.unwrap();

        assert_eq!(written, 2);
        assert_eq!(client.last_seen_transactions_block(), 9);

        let repo = TransactionRepository::new(&client.db().conn);
        let first = repo.get_by_hash(&hash(1)).unwrap().unwrap();
        assert_eq!(first.state.block_number, Some(5));
        assert!(!first.state.is_pending);
        assert!(repo.get_by_hash(&hash(2)).unwrap().is_some());

        let requests = client.transport().requests();
        assert_eq!(
            requests[0],
            format!(
                "https://api.etherscan.io/api?module=account&action=txlist&address={WALLET:?}&startblock=0&endblock=1&sort=asc&apikey=TESTKEY"
            )
        );
    }

    #[tokio::test]
    async fn test_query_transactions_continues_from_last_seen_block() {
        let transport = MockTransport::new()
            .respond(envelope(json!("0x14")))
            .respond(envelope(json!("0")))
            .respond(envelope(json!([txlist_entry(1, OTHER, WALLET, 9)])))
            .respond(envelope(json!([])));
        let mut client = client(transport);

        client.query_balance(&WALLET).await.unwrap();
        client.query_transactions(&WALLET).await.unwrap();
        client.query_transactions(&WALLET).await.unwrap();

        assert_eq!(client.last_seen_transactions_block(), 9);
        let requests = client.transport().requests();
        assert!(requests[2].contains("&startblock=0&endblock=21&"));
        assert!(requests[3].contains("&startblock=9&endblock=21&"));
    }

    #[rstest]
    #[case::not_json("<html>502 Bad Gateway</html>")]
    #[case::rate_limited(r#"{"status":"0","message":"NOTOK","result":"Max rate limit reached"}"#)]
    #[case::bad_entry(r#"{"status":"1","message":"OK","result":[{"hash":"0x01"}]}"#)]
    #[case::no_result(r#"{"status":"1","message":"OK"}"#)]
    #[case::not_object("[1, 2, 3]")]
    #[tokio::test]
    async fn test_malformed_transactions_response_changes_nothing(#[case] body: &str) {
        let mut client = client(MockTransport::new().respond(body));

        let written = client.query_transactions(&WALLET).await.unwrap();

        assert_eq!(written, 0);
        assert_eq!(client.last_seen_transactions_block(), 0);
        let repo = TransactionRepository::new(&client.db().conn);
        assert_eq!(repo.count_for_chain(Chain::MAINNET).unwrap(), 0);
    }

    #[tokio::test]
    async fn test_query_transactions_keeps_confirmed_history() {
        let transport = MockTransport::new().respond(envelope(json!([
            txlist_entry(1, WALLET, OTHER, 5),
            txlist_entry(2, WALLET, OTHER, 6),
        ])));
        let mut client = client(transport);

        let mut confirmed = confirmed_tx(1, WALLET, OTHER, 4);
        confirmed.value = U256::from(123);
        {
            let repo = TransactionRepository::new(&client.db().conn);
            repo.upsert(&confirmed).unwrap();
            repo.upsert(&pending_tx(2, WALLET, OTHER)).unwrap();
        }

        let written = client.query_transactions(&WALLET).await.unwrap();

        assert_eq!(written, 1);
        let repo = TransactionRepository::new(&client.db().conn);
        assert_eq!(repo.get_by_hash(&hash(1)).unwrap(), Some(confirmed));
        let replaced = repo.get_by_hash(&hash(2)).unwrap().unwrap();
        assert!(!replaced.state.is_pending);
        assert_eq!(replaced.state.block_number, Some(6));
    }

    #[tokio::test]
    async fn test_query_balance_for_root_token() {
        let transport = MockTransport::new()
            .respond(envelope(json!("0x2a")))
            .respond(envelope(json!("1000000000000000000")));
        let mut client = client(transport);

        assert!(client.query_balance(&WALLET).await.unwrap());
        assert_eq!(client.last_seen_balance_block(), 42);

        let stored = BalanceRepository::new(&client.db().conn)
            .get(&WALLET, &Address::ZERO, Chain::MAINNET)
            .unwrap()
            .unwrap();
        assert_eq!(stored.block, 42);
        assert_eq!(stored.balance, U256::from(1_000_000_000_000_000_000u64));

        let requests = client.transport().requests();
        assert!(requests[0].contains("module=proxy&action=eth_blockNumber"));
        assert!(requests[1].contains(&format!(
            "module=account&action=balance&address={WALLET:?}&tag=latest"
        )));
    }

    #[tokio::test]
    async fn test_query_balance_for_token_uses_contract_address() {
        let transport = MockTransport::new()
            .respond(envelope(json!("0x2a")))
            .respond(envelope(json!("500")));
        let mut client = client(transport);
        client.set_current_token(dai_token());

        assert!(client.query_balance(&WALLET).await.unwrap());

        let requests = client.transport().requests();
        assert!(requests[1].contains(&format!(
            "module=account&action=tokenbalance&contractaddress={DAI:?}&address={WALLET:?}&tag=latest"
        )));
        assert!(!requests[1].contains("action=balance&"));

        let stored = BalanceRepository::new(&client.db().conn)
            .get(&WALLET, &DAI, Chain::MAINNET)
            .unwrap()
            .unwrap();
        assert_eq!(stored.balance, U256::from(500));
    }

    #[tokio::test]
    async fn test_query_balance_aborts_on_unparsable_block_number() {
        let mut client = client(MockTransport::new().respond(envelope(json!("latest"))));

        assert!(!client.query_balance(&WALLET).await.unwrap());
        assert_eq!(client.last_seen_balance_block(), 0);
        assert_eq!(client.transport().requests().len(), 1);
    }

    #[rstest]
    #[case::error_message("Error! Invalid address format")]
    #[case::empty("")]
    #[case::blank(" ")]
    #[case::separators("1_000")]
    #[case::signed("+5")]
    #[case::padded(" 5")]
    #[case::hex("0x10")]
    #[tokio::test]
    async fn test_query_balance_drops_non_numeric_balance(#[case] payload: &str) {
        let transport = MockTransport::new()
            .respond(envelope(json!("0x2a")))
            .respond(envelope(json!(payload)));
        let mut client = client(transport);

        assert!(!client.query_balance(&WALLET).await.unwrap());
        assert_eq!(client.last_seen_balance_block(), 42);
        assert!(
            BalanceRepository::new(&client.db().conn)
                .get_all_for_address(&WALLET)
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_empty_balance_does_not_overwrite_stored_balance() {
        let transport = MockTransport::new()
            .respond(envelope(json!("0x2a")))
            .respond(envelope(json!("")));
        let mut client = client(transport);
        BalanceRepository::new(&client.db().conn)
            .upsert(&Balance {
                address: WALLET,
                token_address: Address::ZERO,
                chain: Chain::MAINNET,
                block: 10,
                balance: U256::from(5),
            })
            .unwrap();

        assert!(!client.query_balance(&WALLET).await.unwrap());

        let stored = BalanceRepository::new(&client.db().conn)
            .get(&WALLET, &Address::ZERO, Chain::MAINNET)
            .unwrap()
            .unwrap();
        assert_eq!(stored.block, 10);
        assert_eq!(stored.balance, U256::from(5));
    }

    #[rstest]
    #[case::max_u64("0xffffffffffffffff")]
    #[case::above_i64("0x8000000000000000")]
    #[tokio::test]
    async fn test_unstorable_block_number_is_ignored(#[case] block: &str) {
        let transport = MockTransport::new()
            .respond(envelope(json!(block)))
            .respond(envelope(json!([])));
        let mut client = client(transport);

        assert!(!client.query_balance(&WALLET).await.unwrap());
        assert_eq!(client.last_seen_balance_block(), 0);
        assert_eq!(client.transport().requests().len(), 1);

        assert_eq!(client.query_transactions(&WALLET).await.unwrap(), 0);
        assert!(client.transport().requests()[1].contains("&startblock=0&endblock=1&"));
    }

    #[tokio::test]
    async fn test_highest_storable_block_number_is_accepted() {
        let transport = MockTransport::new()
            .respond(envelope(json!("0x7fffffffffffffff")))
            .respond(envelope(json!("9")))
            .respond(envelope(json!([])));
        let mut client = client(transport);

        assert!(client.query_balance(&WALLET).await.unwrap());
        assert_eq!(client.last_seen_balance_block(), i64::MAX as u64);

        assert_eq!(client.query_transactions(&WALLET).await.unwrap(), 0);
        assert!(
            client.transport().requests()[2]
                .contains(&format!("&endblock={}&", i64::MAX as u64 + 1))
        );
    }

    #[tokio::test]
    async fn test_unstorable_transaction_block_rejects_response() {
        let mut entry = txlist_entry(1, OTHER, WALLET, 5);
        entry["blockNumber"] = json!(u64::MAX.to_string());
        let transport = MockTransport::new().respond(envelope(json!([entry])));
        let mut client = client(transport);

        assert_eq!(client.query_transactions(&WALLET).await.unwrap(), 0);
        assert_eq!(client.last_seen_transactions_block(), 0);
    }

    #[tokio::test]
    async fn test_query_balance_keeps_newer_stored_block() {
        let transport = MockTransport::new()
            .respond(envelope(json!("0x2a")))
            .respond(envelope(json!("7")));
        let mut client = client(transport);
        BalanceRepository::new(&client.db().conn)
            .upsert(&Balance {
                address: WALLET,
                token_address: Address::ZERO,
                chain: Chain::MAINNET,
                block: 100,
                balance: U256::from(1),
            })
            .unwrap();

        assert!(!client.query_balance(&WALLET).await.unwrap());

        let stored = BalanceRepository::new(&client.db().conn)
            .get(&WALLET, &Address::ZERO, Chain::MAINNET)
            .unwrap()
            .unwrap();
        assert_eq!(stored.block, 100);
        assert_eq!(stored.balance, U256::from(1));
    }

    #[tokio::test]
    async fn test_certificate_failure_retries_once_over_http() {
        let transport = MockTransport::new()
            .fail(TransportError::Certificate("invalid peer certificate".into()))
            .respond(envelope(json!([txlist_entry(1, OTHER, WALLET, 3)])));
        let mut client = client(transport);

        assert_eq!(client.query_transactions(&WALLET).await.unwrap(), 1);

        let requests = client.transport().requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].starts_with("https://api.etherscan.io/api?"));
        assert!(requests[1].starts_with("http://api.etherscan.io/api?"));
        assert_eq!(
            requests[0].trim_start_matches("https://"),
            requests[1].trim_start_matches("http://")
        );
    }

    #[tokio::test]
    async fn test_certificate_failure_without_fallback() {
        let transport = MockTransport::new()
            .fail(TransportError::Certificate("invalid peer certificate".into()));
        let mut client = client(transport).with_http_fallback(false);

        assert_eq!(client.query_transactions(&WALLET).await.unwrap(), 0);
        assert_eq!(client.transport().requests().len(), 1);
    }

    #[tokio::test]
    async fn test_fallback_is_attempted_only_once() {
        let transport = MockTransport::new()
            .fail(TransportError::Certificate("invalid peer certificate".into()))
            .fail(TransportError::Certificate("invalid peer certificate".into()));
        let mut client = client(transport);

        assert!(!client.query_balance(&WALLET).await.unwrap());
        assert_eq!(client.transport().requests().len(), 2);
    }

    #[tokio::test]
    async fn test_network_errors_are_not_retried() {
        let transport =
            MockTransport::new().fail(TransportError::Network("connection refused".into()));
        let mut client = client(transport);

        assert_eq!(client.query_transactions(&WALLET).await.unwrap(), 0);
        assert_eq!(client.transport().requests().len(), 1);
    }

    #[tokio::test]
    async fn test_queries_without_explorer_are_skipped() {
        let mut client = client(MockTransport::new());

        client.set_network(None);
        assert_eq!(client.query_transactions(&WALLET).await.unwrap(), 0);

        client.set_network(Some(NetworkDefinition::for_chain(Chain(1337))));
        assert!(!client.query_balance(&WALLET).await.unwrap());

        assert!(client.transport().requests().is_empty());
    }

    #[tokio::test]
    async fn test_switching_network_resets_counters() {
        let transport = MockTransport::new()
            .respond(envelope(json!("0x2a")))
            .respond(envelope(json!("1")))
            .respond(envelope(json!([txlist_entry(1, OTHER, WALLET, 9)])));
        let mut client = client(transport);

        client.query_balance(&WALLET).await.unwrap();
        client.query_transactions(&WALLET).await.unwrap();
        assert_eq!(client.last_seen_balance_block(), 42);
        assert_eq!(client.last_seen_transactions_block(), 9);

        client.set_network(Some(NetworkDefinition::for_chain(Chain::GOERLI)));
        assert_eq!(client.last_seen_balance_block(), 0);
        assert_eq!(client.last_seen_transactions_block(), 0);
    }

    #[rstest]
    #[case(json!("0x2a"), Some(42))]
    #[case(json!("0x0"), Some(0))]
    #[case(json!("ff"), Some(255))]
    #[case(json!("0xzz"), None)]
    #[case(json!(42), None)]
    #[case(json!("0x"), None)]
    #[case(json!("0x7fffffffffffffff"), Some(i64::MAX as u64))]
    #[case(json!("0x8000000000000000"), None)]
    fn test_parse_block_number(#[case] result: Value, #[case] expected: Option<u64>) {
        assert_eq!(parse_block_number(&result), expected);
    }

    #[rstest]
    #[case("0", Some(U256::ZERO))]
    #[case("1000000000000000000", Some(U256::from(1_000_000_000_000_000_000u64)))]
    #[case("", None)]
    #[case("1_000", None)]
    #[case("-1", None)]
    #[case("12 ", None)]
    fn test_parse_balance(#[case] input: &str, #[case] expected: Option<U256>) {
        assert_eq!(parse_balance(input), expected);
    }

    #[test]
    fn test_parse_failed_and_contract_creation_transactions() {
        let mut failed = txlist_entry(1, WALLET, OTHER, 5);
        failed["isError"] = json!("1");
        let mut creation = txlist_entry(2, WALLET, OTHER, 7);
        creation["to"] = json!("");

        let parsed = parse_transactions(
            &json!([failed, creation]),
            &NetworkDefinition::for_chain(Chain::MAINNET),
        )
        .unwrap();

        assert_eq!(parsed.highest_block, 7);
        assert!(parsed.transactions[0].state.error.is_some());
        assert_eq!(parsed.transactions[1].to, None);
        assert_eq!(parsed.transactions[1].state.error, None);
    }
}
