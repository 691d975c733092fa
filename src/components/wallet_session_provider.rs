use yew::prelude::*;

use crate::config::FetcherConfig;
use crate::hooks::{use_wallet_session, UseWalletSessionHandle};

#[derive(Properties, PartialEq)]
pub struct WalletSessionProviderProps {
    #[prop_or_default]
    pub config: FetcherConfig,
    #[prop_or_default]
    pub children: Children,
}

/// Shares one wallet session with every component below it.
#[function_component]
pub fn WalletSessionProvider(props: &WalletSessionProviderProps) -> Html {
    let session = use_wallet_session(props.config.clone());

    html! {
        <ContextProvider<UseWalletSessionHandle> context={session}>
            { for props.children.iter() }
        </ContextProvider<UseWalletSessionHandle>>
    }
}
