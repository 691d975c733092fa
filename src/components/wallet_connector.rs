use crate::components::AccountDetails;
use crate::hooks::UseWalletSessionHandle;
use crate::session::{ConnectionState, WalletSession};
use yew::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Connect,
    /// Disabled placeholder while the wallet has not answered yet.
    Connecting,
    /// Drops the in-flight attempt so a hung wallet prompt cannot lock the UI.
    Cancel,
    Disconnect,
}

fn controls(session: &WalletSession) -> &'static [Control] {
    match session.state() {
        ConnectionState::Disconnected | ConnectionState::Failed(_) => &[Control::Connect],
        ConnectionState::Connecting => &[Control::Connecting, Control::Cancel],
        ConnectionState::Connected(_) => &[Control::Disconnect],
    }
}

fn title(session: &WalletSession) -> &'static str {
    if session.snapshot().is_some() {
        "Ethereum"
    } else {
        "Connect Your Ethereum Wallet"
    }
}

/// Connect/disconnect button, the last error and the connected account.
#[function_component]
pub fn WalletConnector() -> Html {
    let wallet = use_context::<UseWalletSessionHandle>().expect(
        "no wallet session found. you must wrap your components in a <WalletSessionProvider/>",
    );
    let session = wallet.session();

    let onconnect = {
        let wallet = wallet.clone();
        Callback::from(move |_: MouseEvent| wallet.connect())
    };
    let ondisconnect = {
        let wallet = wallet.clone();
        Callback::from(move |_: MouseEvent| wallet.disconnect())
    };

    let button = |control: &Control| match control {
        Control::Connect => html! {
            <button onclick={onconnect.clone()} class="wallet-button">{"Connect Wallet"}</button>
        },
        Control::Connecting => html! {
            <button class="wallet-button" disabled=true>{"Connecting…"}</button>
        },
        Control::Cancel => html! {
            <button onclick={ondisconnect.clone()} class="wallet-button cancel">{"Cancel"}</button>
        },
        Control::Disconnect => html! {
            <button onclick={ondisconnect.clone()} class="wallet-button disconnect">
                {"Disconnect Wallet"}
            </button>
        },
    };

    html! {
        <div class="wallet-connector">
            <h1 class="title">{title(session)}</h1>
            { for controls(session).iter().map(button) }

            if let Some(error) = session.error() {
                <p class="error">{error.to_string()}</p>
            }

            <AccountDetails />
        </div>
    }
}
