mod account_details;
mod account_label;
mod wallet_connector;
mod wallet_session_provider;

pub use account_details::AccountDetails;
pub use account_label::AccountLabel;
pub use wallet_connector::WalletConnector;
pub use wallet_session_provider::{WalletSessionProvider, WalletSessionProviderProps};
