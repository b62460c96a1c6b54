use anyhow::Result;
use walleth_sync::config::Config;
use walleth_sync::repository::Database;

fn main() -> Result<()> {
    tracing_subscriber::fmt().init();

    let config = Config::from_env()?;

    println!("Running migrations on database: {}", config.database_url);

    let _db = Database::new(&config.database_url)?;

    println!("Migrations completed successfully!");

    Ok(())
}
