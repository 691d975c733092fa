use log::{debug, info, warn};
use web3::types::{Address, H256, U256};

use crate::address::{abbreviate, to_checksum};
use crate::config::FetcherConfig;
use crate::error::FetchError;
use crate::provider::WalletProvider;
use crate::units::format_ether;

/// Hash and inclusion block of one account transaction. `block_number` is
/// `None` while the transaction is pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionRef {
    pub hash: H256,
    pub block_number: Option<u64>,
}

impl TransactionRef {
    pub fn display_hash(&self) -> String {
        format!("0x{}", hex::encode(self.hash.as_bytes()))
    }

    pub fn display_block(&self) -> String {
        match self.block_number {
            Some(number) => number.to_string(),
            None => "pending".to_string(),
        }
    }
}

/// Account data gathered by one successful fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSnapshot {
    pub(crate) address: Address,
    pub(crate) balance_wei: U256,
    pub(crate) transactions: Vec<TransactionRef>,
}

impl AccountSnapshot {
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn balance_wei(&self) -> U256 {
        self.balance_wei
    }

    /// Most recent first.
    pub fn transactions(&self) -> &[TransactionRef] {
        &self.transactions
    }

    pub fn display_address(&self) -> String {
        to_checksum(&self.address)
    }

    pub fn display_short_address(&self) -> String {
        abbreviate(&self.address)
    }

    pub fn display_balance(&self) -> String {
        format_ether(self.balance_wei)
    }
}

/// Runs the connect sequence against a wallet provider: authorize, read the
/// balance, read the transaction count, then walk the most recent
/// transactions one by one.
#[derive(Debug, Clone, Default)]
pub struct AccountSnapshotFetcher {
    config: FetcherConfig,
}

impl AccountSnapshotFetcher {
    pub fn new(config: FetcherConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// Produces a snapshot, or the first error hit along the way. Nothing is
    /// retried and no partially filled snapshot is ever returned.
    pub async fn fetch<P>(&self, provider: Option<&P>) -> Result<AccountSnapshot, FetchError>
    where
        P: WalletProvider + ?Sized,
    {
        let provider = provider.ok_or_else(|| {
            warn!("no wallet provider detected");
            FetchError::NoProviderDetected
        })?;

        self.fetch_from(provider).await.map_err(|err| {
            warn!("account snapshot fetch failed: {err}");
            err
        })
    }

    async fn fetch_from<P>(&self, provider: &P) -> Result<AccountSnapshot, FetchError>
    where
        P: WalletProvider + ?Sized,
    {
        let address = provider.authorize().await?;
        debug!("authorized account {}", to_checksum(&address));

        let balance_wei = provider.balance(address).await?;
        debug!("balance {balance_wei} wei");

        let count = provider.transaction_count(address).await?;
        let limit = recent_window(count, self.config.transaction_limit());
        debug!("transaction count {count}, fetching {limit} most recent");

        let mut transactions = Vec::with_capacity(limit);
        for index in 0..limit {
            let tx = provider.transaction_by_index(address, index).await?;
            transactions.push(tx);
        }

        info!(
            "fetched snapshot for {} with {} transactions",
            to_checksum(&address),
            transactions.len()
        );
        Ok(AccountSnapshot {
            address,
            balance_wei,
            transactions,
        })
    }
}

/// `min(count, limit)` without overflowing on huge counts.
fn recent_window(count: U256, limit: usize) -> usize {
    if count < U256::from(limit) {
        count.as_usize()
    } else {
        limit
    }
}
