use anyhow::{Context, Result};
use rusqlite::Connection;

pub struct Database {
    pub conn: Connection,
}

impl Database {
    pub fn new(db_path: &str) -> Result<Self> {
        let db_path = db_path.strip_prefix("sqlite:").unwrap_or(db_path);
        let conn = Connection::open(db_path).context("Failed to open database")?;

        let db = Database { conn };
        db.create_tables()?;
        Ok(db)
    }

    pub fn in_memory() -> Result<Self> {
        Self::new(":memory:")
    }

    fn create_tables(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS balances (
                address TEXT NOT NULL,
                token_address TEXT NOT NULL,
                chain INTEGER NOT NULL,
                block INTEGER NOT NULL,
                balance TEXT NOT NULL,
                PRIMARY KEY (address, token_address, chain)
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS transactions (
                hash TEXT PRIMARY KEY,
                chain INTEGER NOT NULL,
                from_address TEXT NOT NULL,
                to_address TEXT,
                value TEXT NOT NULL,
                nonce INTEGER NOT NULL,
                gas_price TEXT NOT NULL,
                gas_limit INTEGER NOT NULL,
                input TEXT NOT NULL,
                timestamp INTEGER,
                is_pending INTEGER NOT NULL,
                block_number INTEGER,
                error TEXT,
                source TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_transactions_from
             ON transactions(chain, from_address)",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_transactions_to
             ON transactions(chain, to_address)",
            [],
        )?;

        Ok(())
    }
}
