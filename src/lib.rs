//! Yew components that connect to a browser-injected Ethereum wallet and
//! render a snapshot of the connected account: its address, its balance and
//! its most recent transactions.
//!
//! The data path is independent of Yew: [`AccountSnapshotFetcher`] drives any
//! [`WalletProvider`] through the fetch sequence, and [`WalletSession`] holds
//! the resulting connection state. The [`components`] and [`hooks`] modules
//! wire both into a Yew app on top of the EIP-1193 provider found at
//! `window.ethereum`.

pub mod address;
pub mod components;
pub mod config;
pub mod eip1193;
pub mod error;
pub mod fetcher;
pub mod hooks;
pub mod provider;
pub mod session;
pub mod units;

pub use config::FetcherConfig;
pub use eip1193::Eip1193Wallet;
pub use error::FetchError;
pub use fetcher::{AccountSnapshot, AccountSnapshotFetcher, TransactionRef};
pub use provider::WalletProvider;
pub use session::{ConnectTicket, ConnectionState, SessionAction, TicketIssuer, WalletSession};

pub use web3::types::{Address, H256, U256};
