use yew::prelude::*;
use yew_wallet_snapshot::components::{AccountLabel, WalletConnector, WalletSessionProvider};

#[function_component]
fn App() -> Html {
    html! {
        <WalletSessionProvider>
            <AccountLabel />
            <WalletConnector />
        </WalletSessionProvider>
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    yew::Renderer::<App>::new().render();
}
