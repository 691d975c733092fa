mod use_wallet_session;

pub use use_wallet_session::{use_wallet_session, UseWalletSessionHandle};
