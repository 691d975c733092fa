use std::rc::Rc;

use log::{debug, info};
use web3::types::{Address, U256};
use yew::Reducible;

use crate::error::FetchError;
use crate::fetcher::{AccountSnapshot, TransactionRef};

/// Sequence token identifying one `connect` attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectTicket(u64);

/// Hands out strictly increasing connect tickets.
#[derive(Debug, Default)]
pub struct TicketIssuer {
    last: u64,
}

impl TicketIssuer {
    pub fn issue(&mut self) -> ConnectTicket {
        self.last += 1;
        ConnectTicket(self.last)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected(AccountSnapshot),
    Failed(FetchError),
}

/// Connection state of the wallet UI plus the ticket of the attempt it is
/// waiting on, if any.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WalletSession {
    state: ConnectionState,
    pending: Option<ConnectTicket>,
}

impl WalletSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    /// Enters `Connecting` for `ticket`. Any earlier attempt still in flight
    /// is superseded and its result will be dropped.
    pub fn begin(&mut self, ticket: ConnectTicket) {
        if let Some(previous) = self.pending.replace(ticket) {
            debug!("connect attempt {:?} superseded by {:?}", previous, ticket);
        }
        self.state = ConnectionState::Connecting;
    }

    /// Applies the outcome of the attempt identified by `ticket`. Returns
    /// `false` and leaves the session untouched when the ticket is stale.
    pub fn resolve(
        &mut self,
        ticket: ConnectTicket,
        result: Result<AccountSnapshot, FetchError>,
    ) -> bool {
        if self.pending != Some(ticket) {
            debug!("discarding stale result of connect attempt {:?}", ticket);
            return false;
        }
        self.pending = None;
        self.state = match result {
            Ok(snapshot) => ConnectionState::Connected(snapshot),
            Err(err) => ConnectionState::Failed(err),
        };
        true
    }

    /// Drops the snapshot, the error and any in-flight attempt. Never talks
    /// to the wallet; the grant on the wallet side stays as it is.
    pub fn disconnect(&mut self) {
        if self.state != ConnectionState::Disconnected {
            info!("wallet disconnected");
        }
        self.pending = None;
        self.state = ConnectionState::Disconnected;
    }

    pub fn is_connecting(&self) -> bool {
        matches!(self.state, ConnectionState::Connecting)
    }

    pub fn snapshot(&self) -> Option<&AccountSnapshot> {
        match &self.state {
            ConnectionState::Connected(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    pub fn address(&self) -> Option<Address> {
        self.snapshot().map(AccountSnapshot::address)
    }

    pub fn balance_wei(&self) -> Option<U256> {
        self.snapshot().map(AccountSnapshot::balance_wei)
    }

    pub fn transactions(&self) -> &[TransactionRef] {
        self.snapshot().map(AccountSnapshot::transactions).unwrap_or(&[])
    }

    pub fn error(&self) -> Option<&FetchError> {
        match &self.state {
            ConnectionState::Failed(err) => Some(err),
            _ => None,
        }
    }
}

pub enum SessionAction {
    Begin(ConnectTicket),
    Resolve(ConnectTicket, Result<AccountSnapshot, FetchError>),
    Disconnect,
}

impl Reducible for WalletSession {
    type Action = SessionAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            SessionAction::Begin(ticket) => next.begin(ticket),
            SessionAction::Resolve(ticket, result) => {
                if !next.resolve(ticket, result) {
                    return self;
                }
            }
            SessionAction::Disconnect => next.disconnect(),
        }
        Rc::new(next)
    }
}
