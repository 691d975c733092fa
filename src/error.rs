use thiserror::Error;

/// EIP-1193 error code a wallet returns when the user declines a request.
pub const USER_REJECTED_CODE: i64 = 4001;

/// Why a snapshot could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// No wallet provider is injected into the page.
    #[error("no Ethereum wallet detected, install a browser wallet such as MetaMask")]
    NoProviderDetected,
    /// The user declined the authorization request in the wallet.
    #[error("connection request rejected in the wallet")]
    UserRejected,
    /// Any other provider or network failure, with the provider's message.
    #[error("error connecting to wallet: {0}")]
    TransportFailure(String),
}

impl FetchError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::TransportFailure(message.into())
    }
}

impl From<web3::Error> for FetchError {
    fn from(err: web3::Error) -> Self {
        match err {
            web3::Error::Rpc(ref rpc) if rpc.code.code() == USER_REJECTED_CODE => {
                Self::UserRejected
            }
            other => Self::TransportFailure(other.to_string()),
        }
    }
}
