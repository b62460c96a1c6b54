use crate::network::{Chain, Token};
use crate::overview::WalletOverview;
use crate::query::formatters::{
    OutputFormat, format_balances, format_overview, format_transactions,
};
use crate::repository::{BalanceRepository, Database, TransactionRepository};
use alloy_primitives::Address;
use anyhow::Result;
use std::str::FromStr;

fn parse_address(address: &str) -> Result<Address> {
    Address::from_str(address).map_err(|_| anyhow::anyhow!("Invalid address format: {}", address))
}

pub fn cmd_balances(
    balance_repo: &BalanceRepository,
    known_tokens: &[Token],
    address: &str,
    format: &OutputFormat,
) -> Result<String> {
    let address = parse_address(address)?;

    let balances = balance_repo
        .get_all_for_address(&address)?
        .into_iter()
        .map(|balance| {
            let decimals = known_tokens
                .iter()
                .find(|t| t.address == balance.token_address && t.chain == balance.chain)
                .map_or(18, |t| t.decimals);
            (balance, decimals)
        })
        .collect::<Vec<_>>();

    Ok(format_balances(&balances, format))
}

pub struct TransactionQuery {
    pub address: String,
    pub chain: Chain,
    pub limit: usize,
    pub offset: usize,
}

pub fn cmd_transactions(
    transaction_repo: &TransactionRepository,
    query: TransactionQuery,
    format: &OutputFormat,
) -> Result<String> {
    let address = parse_address(&query.address)?;

    let transactions =
        transaction_repo.get_for_address(&address, query.chain, query.limit, query.offset)?;

    Ok(format_transactions(&transactions, &address, format))
}

pub fn cmd_overview(
    db: &Database,
    token: &Token,
    address: &str,
    format: &OutputFormat,
) -> Result<String> {
    let address = parse_address(address)?;
    let overview = WalletOverview::load(db, &address, token, token.chain)?;
    Ok(format_overview(&overview, format))
}
