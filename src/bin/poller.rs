use anyhow::{Context, Result};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use walleth_sync::config::Config;
use walleth_sync::etherscan::EtherscanClient;
use walleth_sync::network::NetworkDefinition;
use walleth_sync::poller::Poller;
use walleth_sync::repository::Database;
use walleth_sync::transport::HttpTransport;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    info!("Starting Etherscan poller");

    let config = Config::from_env()?;
    let address = config.require_wallet_address()?;
    info!("Configuration loaded");
    info!("Wallet address: {:?}", address);

    let network = NetworkDefinition::for_chain(config.chain);
    if config.chain.etherscan_api_base_url().is_none() {
        warn!("Chain {} has no Etherscan instance, nothing will be fetched", config.chain);
    }

    let token = config.current_token();
    info!("Tracking {} balance on {}", token.symbol, network.name);

    if !config.http_fallback {
        info!("Plain http fallback on certificate errors is disabled");
    }

    let db = Database::new(&config.database_url)?;
    info!("Database initialized");

    let transport = HttpTransport::new(config.http_timeout).context("Failed to build HTTP client")?;
    let client = EtherscanClient::new(transport, db, config.etherscan_api_key, network, token)
        .with_http_fallback(config.http_fallback);

    let mut poller = Poller::new(client, address, config.poll_interval);

    if let Err(e) = poller.run().await {
        error!("Poller error: {}", e);
        return Err(e);
    }

    Ok(())
}
