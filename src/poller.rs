use crate::etherscan::EtherscanClient;
use crate::transport::Transport;
use alloy_primitives::Address;
use anyhow::Result;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::info;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(12); // roughly one mainnet block

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PollSummary {
    pub balance_updated: bool,
    pub transactions_written: usize,
}

pub struct Poller<T: Transport> {
    client: EtherscanClient<T>,
    address: Address,
    interval: Duration,
}

impl<T: Transport> Poller<T> {
    pub fn new(client: EtherscanClient<T>, address: Address, interval: Duration) -> Self {
        Poller {
            client,
            address,
            interval,
        }
    }

    pub fn client(&self) -> &EtherscanClient<T> {
        &self.client
    }

    /// Refresh the balance first so the transaction query knows how far the chain has moved.
    pub async fn poll_once(&mut self) -> Result<PollSummary> {
        let balance_updated = self.client.query_balance(&self.address).await?;
        let transactions_written = self.client.query_transactions(&self.address).await?;

        Ok(PollSummary {
            balance_updated,
            transactions_written,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        info!(
            "Polling Etherscan for {:?} every {} seconds",
            self.address,
            self.interval.as_secs()
        );

        loop {
            let cycle_start = Instant::now();

            let summary = self.poll_once().await?;
            info!(
                "Poll finished: balance updated = {}, {} transactions stored, last seen block {}",
                summary.balance_updated,
                summary.transactions_written,
                self.client.last_seen_balance_block()
            );

            let elapsed = cycle_start.elapsed();
            if elapsed < self.interval {
                sleep(self.interval - elapsed).await;
            }
        }
    }
}
