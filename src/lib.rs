pub mod config;
pub mod etherscan;
pub mod network;
pub mod overview;
pub mod poller;
pub mod query;
pub mod repository;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_utils;
