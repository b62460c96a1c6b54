use anyhow::Result;
use clap::{Parser, Subcommand};
use walleth_sync::config::Config;
use walleth_sync::network::Token;
use walleth_sync::query::commands::{
    TransactionQuery, cmd_balances, cmd_overview, cmd_transactions,
};
use walleth_sync::query::formatters::OutputFormat;
use walleth_sync::repository::{BalanceRepository, Database, TransactionRepository};

#[derive(Parser)]
#[command(name = "query")]
#[command(about = "Query balances and transactions mirrored from Etherscan", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "table")]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stored balances of an address, one row per chain and token
    Balances { address: String },
    /// Transaction history of an address on the configured chain
    Transactions {
        address: String,
        #[arg(long, default_value = "100")]
        limit: usize,
        #[arg(long, default_value = "0")]
        offset: usize,
    },
    /// Wallet summary for the configured token
    Overview { address: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let format = OutputFormat::from(cli.format.as_str());

    let config = Config::from_env()?;

    let db = Database::new(&config.database_url)?;

    let root = Token::root(config.chain);
    let current_token = config.current_token();

    let output = match cli.command {
        Commands::Balances { address } => {
            let balance_repo = BalanceRepository::new(&db.conn);
            cmd_balances(&balance_repo, &[root, current_token], &address, &format)?
        }
        Commands::Transactions {
            address,
            limit,
            offset,
        } => {
            let transaction_repo = TransactionRepository::new(&db.conn);
            let query = TransactionQuery {
                address,
                chain: config.chain,
                limit,
                offset,
            };
            cmd_transactions(&transaction_repo, query, &format)?
        }
        Commands::Overview { address } => cmd_overview(&db, &current_token, &address, &format)?,
    };

    println!("{output}");

    Ok(())
}
