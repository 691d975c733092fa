use std::cell::RefCell;
use std::rc::Rc;

use log::info;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::config::FetcherConfig;
use crate::eip1193::Eip1193Wallet;
use crate::fetcher::AccountSnapshotFetcher;
use crate::session::{SessionAction, TicketIssuer, WalletSession};

#[derive(Clone)]
pub struct UseWalletSessionHandle {
    session: UseReducerHandle<WalletSession>,
    issuer: Rc<RefCell<TicketIssuer>>,
    config: Rc<FetcherConfig>,
}

impl PartialEq for UseWalletSessionHandle {
    fn eq(&self, other: &Self) -> bool {
        self.session == other.session && self.config == other.config
    }
}

impl UseWalletSessionHandle {
    pub fn session(&self) -> &WalletSession {
        &self.session
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    pub fn connected(&self) -> bool {
        self.session.snapshot().is_some()
    }

    pub fn display_address(&self) -> String {
        self.session
            .snapshot()
            .map(|snapshot| snapshot.display_address())
            .unwrap_or_default()
    }

    pub fn display_short_address(&self) -> String {
        self.session
            .snapshot()
            .map(|snapshot| snapshot.display_short_address())
            .unwrap_or_default()
    }

    /// Starts a fetch against `window.ethereum`. A connect issued while
    /// another one is in flight supersedes it.
    pub fn connect(&self) {
        let ticket = self.issuer.borrow_mut().issue();
        self.session.dispatch(SessionAction::Begin(ticket));

        let session = self.session.clone();
        let fetcher = AccountSnapshotFetcher::new((*self.config).clone());
        spawn_local(async move {
            let result = match Eip1193Wallet::detect() {
                Ok(wallet) => fetcher.fetch(wallet.as_ref()).await,
                Err(err) => Err(err),
            };
            session.dispatch(SessionAction::Resolve(ticket, result));
        });
    }

    pub fn disconnect(&self) {
        info!("disconnect requested");
        self.session.dispatch(SessionAction::Disconnect);
    }
}

#[hook]
pub fn use_wallet_session(config: FetcherConfig) -> UseWalletSessionHandle {
    let session = use_reducer(WalletSession::new);
    let issuer = use_mut_ref(TicketIssuer::default);
    let config = use_memo(|config| config.clone(), config);

    UseWalletSessionHandle {
        session,
        issuer,
        config,
    }
}
