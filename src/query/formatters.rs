use crate::overview::WalletOverview;
use crate::repository::{Balance, TransactionEntity};
use alloy_primitives::utils::format_units;
use alloy_primitives::{Address, U256};
use comfy_table::{Cell, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};
use csv::Writer;
use serde_json::json;

#[derive(Debug, Clone)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            "csv" => OutputFormat::Csv,
            _ => OutputFormat::Table,
        }
    }
}

fn format_amount(value: U256, decimals: u8) -> String {
    format_units(value, decimals).unwrap_or_else(|_| value.to_string())
}

/// Balances paired with the decimals of their token.
pub fn format_balances(balances: &[(Balance, u8)], format: &OutputFormat) -> String {
    match format {
        OutputFormat::Table => {
            if balances.is_empty() {
                return "No balances found.".to_string();
            }

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_header(vec!["Chain", "Token", "Block", "Balance", "Balance (Wei)"]);

            for (balance, decimals) in balances {
                table.add_row(vec![
                    Cell::new(balance.chain),
                    Cell::new(token_label(&balance.token_address)),
                    Cell::new(balance.block),
                    Cell::new(format_amount(balance.balance, *decimals)),
                    Cell::new(balance.balance.to_string()),
                ]);
            }

            table.to_string()
        }
        OutputFormat::Json => {
            let json_balances: Vec<_> = balances
                .iter()
                .map(|(balance, decimals)| {
                    json!({
                        "chain": balance.chain.id(),
                        "token_address": format!("{:?}", balance.token_address),
                        "block": balance.block,
                        "balance": format_amount(balance.balance, *decimals),
                        "balance_wei": balance.balance.to_string(),
                    })
                })
                .collect();

            serde_json::to_string_pretty(&json_balances).unwrap_or_else(|_| "[]".to_string())
        }
        OutputFormat::Csv => {
            let mut wtr = Writer::from_writer(vec![]);
            let _ = wtr.write_record(["chain", "token_address", "block", "balance", "balance_wei"]);

            for (balance, decimals) in balances {
                let _ = wtr.write_record([
                    &balance.chain.to_string(),
                    &format!("{:?}", balance.token_address),
                    &balance.block.to_string(),
                    &format_amount(balance.balance, *decimals),
                    &balance.balance.to_string(),
                ]);
            }

            String::from_utf8(wtr.into_inner().unwrap_or_default()).unwrap_or_default()
        }
    }
}

/// Transactions as seen from `owner`, so each row carries a direction.
pub fn format_transactions(
    transactions: &[TransactionEntity],
    owner: &Address,
    format: &OutputFormat,
) -> String {
    match format {
        OutputFormat::Table => format_transactions_table(transactions, owner),
        OutputFormat::Json => format_transactions_json(transactions, owner),
        OutputFormat::Csv => format_transactions_csv(transactions, owner),
    }
}

fn direction(tx: &TransactionEntity, owner: &Address) -> &'static str {
    match (tx.from == *owner, tx.to.as_ref() == Some(owner)) {
        (true, true) => "self",
        (true, false) => "out",
        _ => "in",
    }
}

fn status(tx: &TransactionEntity) -> String {
    if tx.state.is_pending {
        "pending".to_string()
    } else if tx.state.error.is_some() {
        "failed".to_string()
    } else {
        "confirmed".to_string()
    }
}

fn format_transactions_table(transactions: &[TransactionEntity], owner: &Address) -> String {
    if transactions.is_empty() {
        return "No transactions found.".to_string();
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            "Block",
            "Direction",
            "From",
            "To",
            "Value (ETH)",
            "Status",
            "Tx Hash",
        ]);

    for tx in transactions {
        table.add_row(vec![
            Cell::new(
                tx.state
                    .block_number
                    .map_or("-".to_string(), |b| b.to_string()),
            ),
            Cell::new(direction(tx, owner)),
            Cell::new(format!("{:#}", tx.from)),
            Cell::new(tx.to.map_or("(contract creation)".to_string(), |to| format!("{to:#}"))),
            Cell::new(format_amount(tx.value, 18)),
            Cell::new(status(tx)),
            Cell::new(format_tx_hash(&format!("{:?}", tx.hash))),
        ]);
    }

    table.to_string()
}

fn format_transactions_json(transactions: &[TransactionEntity], owner: &Address) -> String {
    let json_transactions: Vec<_> = transactions
        .iter()
        .map(|tx| {
            json!({
                "hash": format!("{:?}", tx.hash),
                "chain": tx.chain.id(),
                "block_number": tx.state.block_number,
                "direction": direction(tx, owner),
                "from": format!("{:?}", tx.from),
                "to": tx.to.map(|to| format!("{to:?}")),
                "value": format_amount(tx.value, 18),
                "value_wei": tx.value.to_string(),
                "nonce": tx.nonce,
                "status": status(tx),
                "source": tx.state.source.to_string(),
            })
        })
        .collect();

    serde_json::to_string_pretty(&json_transactions).unwrap_or_else(|_| "[]".to_string())
}

fn format_transactions_csv(transactions: &[TransactionEntity], owner: &Address) -> String {
    let mut wtr = Writer::from_writer(vec![]);

    let _ = wtr.write_record([
        "block_number",
        "direction",
        "from",
        "to",
        "value",
        "value_wei",
        "status",
        "hash",
    ]);

    for tx in transactions {
        let _ = wtr.write_record([
            &tx.state
                .block_number
                .map_or(String::new(), |b| b.to_string()),
            &direction(tx, owner).to_string(),
            &format!("{:?}", tx.from),
            &tx.to.map_or(String::new(), |to| format!("{to:?}")),
            &format_amount(tx.value, 18),
            &tx.value.to_string(),
            &status(tx),
            &format!("{:?}", tx.hash),
        ]);
    }

    String::from_utf8(wtr.into_inner().unwrap_or_default()).unwrap_or_default()
}

pub fn format_overview(overview: &WalletOverview, format: &OutputFormat) -> String {
    let displayed = format_amount(overview.displayed_balance, overview.token.decimals);
    let native = format_amount(overview.native_balance, 18);

    let rows = [
        ("address", format!("{:?}", overview.address)),
        ("token", overview.token.symbol.clone()),
        ("balance", displayed),
        ("native_balance", native),
        ("send_enabled", overview.send_enabled.to_string()),
        ("incoming_transactions", overview.incoming_count.to_string()),
        ("outgoing_transactions", overview.outgoing_count.to_string()),
    ];

    match format {
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_header(vec!["Metric", "Value"]);

            for (metric, value) in &rows {
                table.add_row(vec![Cell::new(metric), Cell::new(value)]);
            }

            let mut output = table.to_string();
            if overview.show_empty_state {
                output.push_str("\nNo transactions yet.");
            }
            output
        }
        OutputFormat::Json => serde_json::to_string_pretty(&json!({
            "address": format!("{:?}", overview.address),
            "token": overview.token.symbol,
            "token_address": format!("{:?}", overview.token.address),
            "balance": rows[2].1,
            "balance_wei": overview.displayed_balance.to_string(),
            "native_balance": rows[3].1,
            "native_balance_wei": overview.native_balance.to_string(),
            "send_enabled": overview.send_enabled,
            "show_empty_state": overview.show_empty_state,
            "show_incoming": overview.show_incoming,
            "show_outgoing": overview.show_outgoing,
            "incoming_count": overview.incoming_count,
            "outgoing_count": overview.outgoing_count,
        }))
        .unwrap_or_else(|_| "{}".to_string()),
        OutputFormat::Csv => {
            let mut wtr = Writer::from_writer(vec![]);
            let _ = wtr.write_record(["metric", "value"]);
            for (metric, value) in &rows {
                let _ = wtr.write_record([*metric, value.as_str()]);
            }
            String::from_utf8(wtr.into_inner().unwrap_or_default()).unwrap_or_default()
        }
    }
}

fn token_label(token_address: &Address) -> String {
    if *token_address == Address::ZERO {
        "ETH".to_string()
    } else {
        format!("{token_address:#}")
    }
}

fn format_tx_hash(hash: &str) -> String {
    format!("{}...{}", &hash[..6], &hash[hash.len() - 4..])
}
