pub mod balance_repository;
pub mod database;
pub mod models;
pub mod transaction_repository;

pub use balance_repository::BalanceRepository;
pub use database::Database;
pub use models::{Balance, TransactionEntity, TransactionSource, TransactionState};
pub use transaction_repository::TransactionRepository;
