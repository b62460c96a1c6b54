use super::models::{TransactionEntity, TransactionSource, TransactionState};
use crate::network::Chain;
use alloy_primitives::{Address, B256, U256};
use anyhow::Result;
use rusqlite::{OptionalExtension, Row, ToSql, params, params_from_iter};
use std::str::FromStr;

pub struct TransactionRepository<'a> {
    conn: &'a rusqlite::Connection,
}

impl<'a> TransactionRepository<'a> {
    const UPSERT_TRANSACTION: &'static str = "INSERT OR REPLACE INTO transactions (
            hash, chain, from_address, to_address, value, nonce, gas_price,
            gas_limit, input, timestamp, is_pending, block_number, error, source
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)";

    const SELECT_TRANSACTION: &'static str = "SELECT hash, chain, from_address, to_address, value, nonce, gas_price, gas_limit, input, timestamp, is_pending, block_number, error, source FROM transactions";

    const ORDER_NEWEST_FIRST: &'static str =
        " ORDER BY is_pending DESC, block_number DESC, nonce DESC";

    pub fn new(conn: &'a rusqlite::Connection) -> Self {
        Self { conn }
    }

    pub fn upsert(&self, tx: &TransactionEntity) -> Result<()> {
        self.conn.execute(
            Self::UPSERT_TRANSACTION,
            params![
                format!("{:?}", tx.hash),
                tx.chain.id(),
                format!("{:?}", tx.from),
                tx.to.map(|to| format!("{to:?}")),
                tx.value.to_string(),
                tx.nonce,
                tx.gas_price.to_string(),
                tx.gas_limit,
                tx.input,
                tx.timestamp,
                tx.state.is_pending,
                tx.state.block_number,
                tx.state.error,
                tx.state.source.to_string(),
            ],
        )?;
        Ok(())
    }

    /// Write `tx` unless a confirmed record with the same hash is already stored.
    /// Returns whether the row was written.
    pub fn upsert_unless_confirmed(&self, tx: &TransactionEntity) -> Result<bool> {
        match self.get_by_hash(&tx.hash)? {
            Some(existing) if !existing.state.is_pending => Ok(false),
            _ => {
                self.upsert(tx)?;
                Ok(true)
            }
        }
    }

    pub fn get_by_hash(&self, hash: &B256) -> Result<Option<TransactionEntity>> {
        let query = format!("{} WHERE hash = ?1", Self::SELECT_TRANSACTION);
        let tx = self
            .conn
            .query_row(&query, params![format!("{hash:?}")], Self::row_to_transaction)
            .optional()?;
        Ok(tx)
    }

    pub fn get_incoming(&self, address: &Address, chain: Chain) -> Result<Vec<TransactionEntity>> {
        self.execute_query(
            vec!["chain = ?", "to_address = ?"],
            vec![Box::new(chain.id()), Box::new(format!("{address:?}"))],
            None,
        )
    }

    pub fn get_outgoing(&self, address: &Address, chain: Chain) -> Result<Vec<TransactionEntity>> {
        self.execute_query(
            vec!["chain = ?", "from_address = ?"],
            vec![Box::new(chain.id()), Box::new(format!("{address:?}"))],
            None,
        )
    }

    pub fn get_for_address(
        &self,
        address: &Address,
        chain: Chain,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<TransactionEntity>> {
        let address_str = format!("{address:?}");
        self.execute_query(
            vec!["chain = ?", "(from_address = ? OR to_address = ?)"],
            vec![
                Box::new(chain.id()),
                Box::new(address_str.clone()),
                Box::new(address_str),
            ],
            Some((limit, offset)),
        )
    }

    pub fn count_for_chain(&self, chain: Chain) -> Result<usize> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM transactions WHERE chain = ?1",
            params![chain.id()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn delete_all(&self) -> Result<usize> {
        Ok(self.conn.execute("DELETE FROM transactions", [])?)
    }

    fn execute_query(
        &self,
        conditions: Vec<&str>,
        params: Vec<Box<dyn ToSql>>,
        page: Option<(usize, usize)>,
    ) -> Result<Vec<TransactionEntity>> {
        let mut query = Self::SELECT_TRANSACTION.to_string();

        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }

        query.push_str(Self::ORDER_NEWEST_FIRST);

        if let Some((limit, offset)) = page {
            query.push_str(&format!(" LIMIT {limit} OFFSET {offset}"));
        }

        let mut stmt = self.conn.prepare(&query)?;
        let transactions = stmt
            .query_map(params_from_iter(params), Self::row_to_transaction)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    fn row_to_transaction(row: &Row) -> rusqlite::Result<TransactionEntity> {
        let hash = row
            .get::<_, String>(0)?
            .parse::<B256>()
            .map_err(|e| conversion_error(0, e))?;
        let from = Address::from_str(&row.get::<_, String>(2)?).map_err(|e| conversion_error(2, e))?;
        let to = row
            .get::<_, Option<String>>(3)?
            .map(|to| Address::from_str(&to))
            .transpose()
            .map_err(|e| conversion_error(3, e))?;
        let value = U256::from_str(&row.get::<_, String>(4)?).map_err(|e| conversion_error(4, e))?;
        let gas_price = U256::from_str(&row.get::<_, String>(6)?).map_err(|e| conversion_error(6, e))?;
        let source = TransactionSource::from_str(&row.get::<_, String>(13)?).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(13, rusqlite::types::Type::Text, e.into())
        })?;

        Ok(TransactionEntity {
            hash,
            chain: Chain(row.get(1)?),
            from,
            to,
            value,
            nonce: row.get(5)?,
            gas_price,
            gas_limit: row.get(7)?,
            input: row.get(8)?,
            timestamp: row.get(9)?,
            state: TransactionState {
                is_pending: row.get(10)?,
                block_number: row.get(11)?,
                error: row.get(12)?,
                source,
            },
        })
    }
}

fn conversion_error<E>(idx: usize, e: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
}
