use crate::network::{Chain, Token};
use crate::repository::{BalanceRepository, Database, TransactionRepository};
use alloy_primitives::{Address, U256};
use anyhow::Result;

/// What the wallet's main screen shows for an address, derived from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletOverview {
    pub address: Address,
    pub token: Token,
    /// Balance of the selected token, zero when none has been fetched yet.
    pub displayed_balance: U256,
    pub native_balance: U256,
    /// Sending needs native currency for fees, whatever token is selected.
    pub send_enabled: bool,
    pub show_empty_state: bool,
    pub show_incoming: bool,
    pub show_outgoing: bool,
    pub incoming_count: usize,
    pub outgoing_count: usize,
}

impl WalletOverview {
    pub fn load(db: &Database, address: &Address, token: &Token, chain: Chain) -> Result<Self> {
        let balances = BalanceRepository::new(&db.conn);
        let balance_of = |token_address: &Address| -> Result<U256> {
            Ok(balances
                .get(address, token_address, chain)?
                .map(|b| b.balance)
                .unwrap_or(U256::ZERO))
        };

        let displayed_balance = balance_of(&token.address)?;
        let native_balance = if token.is_root_token() {
            displayed_balance
        } else {
            balance_of(&Address::ZERO)?
        };

        let transactions = TransactionRepository::new(&db.conn);
        let incoming_count = transactions.get_incoming(address, chain)?.len();
        let outgoing_count = transactions.get_outgoing(address, chain)?.len();

        Ok(WalletOverview {
            address: *address,
            token: token.clone(),
            displayed_balance,
            native_balance,
            send_enabled: native_balance > U256::ZERO,
            show_empty_state: incoming_count == 0 && outgoing_count == 0,
            show_incoming: incoming_count > 0,
            show_outgoing: outgoing_count > 0,
            incoming_count,
            outgoing_count,
        })
    }
}
