use crate::network::Chain;
use crate::repository::Balance;
use alloy_primitives::{Address, U256};
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::str::FromStr;

pub struct BalanceRepository<'a> {
    conn: &'a Connection,
}

impl<'a> BalanceRepository<'a> {
    const UPSERT_BALANCE: &'static str =
        "INSERT OR REPLACE INTO balances (address, token_address, chain, block, balance)
         VALUES (?1, ?2, ?3, ?4, ?5)";

    // A row keyed the same way is only replaced by a strictly newer block.
    const UPSERT_BALANCE_IF_NEWER: &'static str =
        "INSERT INTO balances (address, token_address, chain, block, balance)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(address, token_address, chain) DO UPDATE
         SET block = excluded.block, balance = excluded.balance
         WHERE excluded.block > balances.block";

    const SELECT_BALANCE: &'static str =
        "SELECT address, token_address, chain, block, balance FROM balances";

    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn upsert(&self, balance: &Balance) -> Result<()> {
        self.conn.execute(
            Self::UPSERT_BALANCE,
            params![
                format!("{:?}", balance.address),
                format!("{:?}", balance.token_address),
                balance.chain.id(),
                balance.block,
                balance.balance.to_string(),
            ],
        )?;
        Ok(())
    }

    /// Store `balance` unless a row for the same owner, token and chain already
    /// carries the same or a higher block. Returns whether the row was written.
    pub fn upsert_if_newer_block(&self, balance: &Balance) -> Result<bool> {
        let changed = self.conn.execute(
            Self::UPSERT_BALANCE_IF_NEWER,
            params![
                format!("{:?}", balance.address),
                format!("{:?}", balance.token_address),
                balance.chain.id(),
                balance.block,
                balance.balance.to_string(),
            ],
        )?;
        Ok(changed > 0)
    }

    pub fn get(
        &self,
        address: &Address,
        token_address: &Address,
        chain: Chain,
    ) -> Result<Option<Balance>> {
        let query = format!(
            "{} WHERE address = ?1 AND token_address = ?2 AND chain = ?3",
            Self::SELECT_BALANCE
        );
        let balance = self
            .conn
            .query_row(
                &query,
                params![
                    format!("{address:?}"),
                    format!("{token_address:?}"),
                    chain.id()
                ],
                Self::row_to_balance,
            )
            .optional()?;
        Ok(balance)
    }

    pub fn get_all_for_address(&self, address: &Address) -> Result<Vec<Balance>> {
        let query = format!(
            "{} WHERE address = ?1 ORDER BY chain, token_address",
            Self::SELECT_BALANCE
        );
        let mut stmt = self.conn.prepare(&query)?;
        let balances = stmt
            .query_map(params![format!("{address:?}")], Self::row_to_balance)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(balances)
    }

    pub fn delete_all(&self) -> Result<usize> {
        Ok(self.conn.execute("DELETE FROM balances", [])?)
    }

    fn row_to_balance(row: &Row) -> rusqlite::Result<Balance> {
        let address = Address::from_str(&row.get::<_, String>(0)?).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?;
        let token_address = Address::from_str(&row.get::<_, String>(1)?).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
        })?;
        let balance = U256::from_str(&row.get::<_, String>(4)?).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(Balance {
            address,
            token_address,
            chain: Chain(row.get(2)?),
            block: row.get(3)?,
            balance,
        })
    }
}
