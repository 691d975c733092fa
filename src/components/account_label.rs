use crate::hooks::UseWalletSessionHandle;
use yew::prelude::*;

#[function_component]
pub fn AccountLabel() -> Html {
    let wallet = use_context::<UseWalletSessionHandle>().expect(
        "no wallet session found. you must wrap your components in a <WalletSessionProvider/>",
    );

    html! {
        <div class="account-label" title={wallet.display_address()}>
            if wallet.connected() {
                {wallet.display_short_address()}
            } else if wallet.session().is_connecting() {
                {"Connecting…"}
            } else {
                {"Disconnected"}
            }
        </div>
    }
}
