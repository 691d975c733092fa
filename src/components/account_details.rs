use crate::hooks::UseWalletSessionHandle;
use yew::prelude::*;

#[function_component]
pub fn AccountDetails() -> Html {
    let wallet = use_context::<UseWalletSessionHandle>().expect(
        "no wallet session found. you must wrap your components in a <WalletSessionProvider/>",
    );
    let Some(snapshot) = wallet.session().snapshot() else {
        return html! {};
    };
    let balance = format!(
        "{} {}",
        snapshot.display_balance(),
        wallet.config().currency_symbol
    );

    html! {
        <div class="wallet-info">
            <div class="wallet-details">
                <p><strong>{"Wallet Address: "}</strong>{snapshot.display_address()}</p>
                <p><strong>{"Balance: "}</strong>{balance}</p>
            </div>

            <div class="transactions-section">
                <h3>{format!("Last {} Transactions:", wallet.config().transaction_limit())}</h3>
                if snapshot.transactions().is_empty() {
                    <p>{"No recent transactions found."}</p>
                } else {
                    <ul class="transactions">
                        { for snapshot.transactions().iter().map(|tx| html! {
                            <li key={tx.display_hash()}>
                                <p><strong>{"Tx Hash: "}</strong>{tx.display_hash()}</p>
                                <p><strong>{"Block Number: "}</strong>{tx.display_block()}</p>
                            </li>
                        }) }
                    </ul>
                }
            </div>
        </div>
    }
}
