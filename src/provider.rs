use async_trait::async_trait;
use web3::types::{Address, U256};

use crate::error::FetchError;
use crate::fetcher::TransactionRef;

/// Read access to one wallet-authorized account.
///
/// Implementations run on the browser event loop, so the futures are not
/// required to be `Send`.
#[async_trait(?Send)]
pub trait WalletProvider {
    /// Asks the wallet for access and returns the authorized account.
    /// May wait for the user to approve the request in the wallet UI.
    async fn authorize(&self) -> Result<Address, FetchError>;

    /// Native-currency balance in wei.
    async fn balance(&self, address: Address) -> Result<U256, FetchError>;

    /// Total number of transactions sent from `address`.
    async fn transaction_count(&self, address: Address) -> Result<U256, FetchError>;

    /// The `index`-th most recent transaction of `address`, where index 0 is
    /// the latest one. Callers request indices in ascending order.
    async fn transaction_by_index(
        &self,
        address: Address,
        index: usize,
    ) -> Result<TransactionRef, FetchError>;
}
