//! [`WalletProvider`] backed by the EIP-1193 provider a browser wallet
//! injects at `window.ethereum`.
//!
//! JSON-RPC cannot look up "the n-th transaction of an account", so
//! [`Eip1193Wallet::transaction_by_index`] maps a recency index to a nonce
//! (`count - 1 - index`) and bisects over block numbers with
//! `eth_getTransactionCount` to find the first block whose post-state count
//! exceeds that nonce. That block holds the transaction, so a single
//! `eth_getBlockByNumber` finishes the lookup. Each lookup searches only
//! below the block where the previous, more recent one was found.

use std::cell::Cell;

use async_trait::async_trait;
use log::{debug, trace};
use wasm_bindgen::JsValue;
use web3::transports::eip_1193::{Eip1193, Provider};
use web3::types::{Address, BlockId, BlockNumber, Transaction, U256, U64};
use web3::{Transport, Web3};

use crate::error::FetchError;
use crate::fetcher::TransactionRef;
use crate::provider::WalletProvider;

/// Bounds of an ongoing most-recent-first walk over one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WalkCursor {
    address: Address,
    total: u64,
    /// Highest block that can still hold the next, older transaction.
    upper: u64,
}

pub struct Eip1193Wallet<T: Transport = Eip1193> {
    web3: Web3<T>,
    last_count: Cell<Option<(Address, u64)>>,
    cursor: Cell<Option<WalkCursor>>,
}

impl Eip1193Wallet {
    /// Looks for an injected provider. A page without a wallet is an ordinary
    /// situation and yields `Ok(None)`.
    pub fn detect() -> Result<Option<Self>, FetchError> {
        let provider = Provider::default().map_err(js_failure)?;
        Ok(provider.map(Self::new))
    }

    pub fn new(provider: Provider) -> Self {
        Self::with_transport(Eip1193::new(provider))
    }
}

impl<T: Transport> Eip1193Wallet<T> {
    pub fn with_transport(transport: T) -> Self {
        Self {
            web3: Web3::new(transport),
            last_count: Cell::new(None),
            cursor: Cell::new(None),
        }
    }

    async fn start_walk(&self, address: Address) -> Result<WalkCursor, FetchError> {
        let total = match self.last_count.get() {
            Some((counted, total)) if counted == address => total,
            _ => saturating_u64(self.web3.eth().transaction_count(address, None).await?),
        };
        let head = self.web3.eth().block_number().await?.as_u64();
        debug!("walking {total} transactions below block {head}");
        Ok(WalkCursor {
            address,
            total,
            upper: head,
        })
    }

    async fn count_at(&self, address: Address, block: u64) -> Result<u64, FetchError> {
        let block = BlockNumber::Number(U64::from(block));
        let count = self.web3.eth().transaction_count(address, Some(block)).await?;
        Ok(saturating_u64(count))
    }

    /// First block in `0..=upper` after which `address` has sent more than
    /// `nonce` transactions. `upper` itself must satisfy that.
    async fn locate(&self, address: Address, nonce: u64, upper: u64) -> Result<u64, FetchError> {
        let (mut low, mut high) = (0, upper);
        while low < high {
            let mid = low + (high - low) / 2;
            trace!("nonce {nonce}: probing block {mid} in {low}..={high}");
            if self.count_at(address, mid).await? > nonce {
                high = mid;
            } else {
                low = mid + 1;
            }
        }
        Ok(low)
    }

    async fn block_transactions(&self, number: u64) -> Result<Vec<Transaction>, FetchError> {
        let id = BlockId::Number(BlockNumber::Number(U64::from(number)));
        let block = self.web3.eth().block_with_txs(id).await?;
        Ok(block.map(|block| block.transactions).unwrap_or_default())
    }
}

#[async_trait(?Send)]
impl<T: Transport> WalletProvider for Eip1193Wallet<T> {
    async fn authorize(&self) -> Result<Address, FetchError> {
        let accounts = self.web3.eth().request_accounts().await?;
        accounts
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::transport("wallet returned no accounts"))
    }

    async fn balance(&self, address: Address) -> Result<U256, FetchError> {
        Ok(self.web3.eth().balance(address, None).await?)
    }

    async fn transaction_count(&self, address: Address) -> Result<U256, FetchError> {
        let count = self.web3.eth().transaction_count(address, None).await?;
        self.last_count.set(Some((address, saturating_u64(count))));
        Ok(count)
    }

    async fn transaction_by_index(
        &self,
        address: Address,
        index: usize,
    ) -> Result<TransactionRef, FetchError> {
        let (mut cursor, fresh) = match self.cursor.take() {
            Some(cursor) if index > 0 && cursor.address == address => (cursor, false),
            _ => (self.start_walk(address).await?, true),
        };

        let index = index as u64;
        if index >= cursor.total {
            return Err(FetchError::transport(format!(
                "account has only {} transactions",
                cursor.total
            )));
        }
        let nonce = cursor.total - 1 - index;

        if fresh && self.count_at(address, cursor.upper).await? <= nonce {
            return Err(FetchError::transport(format!(
                "transaction with nonce {nonce} is not mined as of block {}",
                cursor.upper
            )));
        }

        let number = self.locate(address, nonce, cursor.upper).await?;
        let tx = find_by_nonce(&self.block_transactions(number).await?, address, nonce)
            .ok_or_else(|| {
                FetchError::transport(format!(
                    "block {number} does not contain transaction with nonce {nonce}"
                ))
            })?;

        cursor.upper = number;
        self.cursor.set(Some(cursor));
        Ok(tx)
    }
}

fn find_by_nonce(
    transactions: &[Transaction],
    address: Address,
    nonce: u64,
) -> Option<TransactionRef> {
    let nonce = U256::from(nonce);
    transactions
        .iter()
        .find(|tx| tx.from == Some(address) && tx.nonce == nonce)
        .map(|tx| TransactionRef {
            hash: tx.hash,
            block_number: tx.block_number.map(|number| number.as_u64()),
        })
}

fn saturating_u64(value: U256) -> u64 {
    if value > U256::from(u64::MAX) {
        u64::MAX
    } else {
        value.as_u64()
    }
}

fn js_failure(value: JsValue) -> FetchError {
    FetchError::transport(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use futures::executor::block_on;
    use futures::future::{ready, Ready};
    use serde_json::{json, Value};
    use jsonrpc_core::{Call, Params};
    use web3::types::{Block, H256};
    use web3::RequestId;

    use super::*;
    use crate::fetcher::AccountSnapshotFetcher;

    const HEAD: u64 = 1_000_000;

    /// In-memory chain answering the handful of calls the wallet makes.
    #[derive(Debug, Default)]
    struct Chain {
        account: Address,
        /// `(block, nonce)` of every transaction the account sent, in nonce order.
        sent: Vec<(u64, u64)>,
        /// Extra transactions counted at `latest` but not yet in a block.
        pending: u64,
        calls: RefCell<Vec<(String, Vec<Value>)>>,
    }

    impl Chain {
        fn count_at(&self, block: u64) -> u64 {
            self.sent.iter().filter(|(mined, _)| *mined <= block).count() as u64
        }

        fn block(&self, number: u64) -> Value {
            let other = Transaction {
                hash: H256::repeat_byte(0xee),
                nonce: U256::from(self.sent.len()),
                from: Some(Address::repeat_byte(0x77)),
                block_number: Some(U64::from(number)),
                ..Default::default()
            };
            let mut transactions = vec![other];
            transactions.extend(self.sent.iter().filter(|(mined, _)| *mined == number).map(
                |(_, nonce)| Transaction {
                    hash: H256::from_low_u64_be(nonce + 1),
                    nonce: U256::from(*nonce),
                    from: Some(self.account),
                    block_number: Some(U64::from(number)),
                    ..Default::default()
                },
            ));
            let block = Block {
                number: Some(U64::from(number)),
                transactions,
                ..Default::default()
            };
            serde_json::to_value(block).unwrap()
        }

        fn answer(&self, method: &str, params: &[Value]) -> Value {
            match method {
                "eth_requestAccounts" => json!([self.account]),
                "eth_getBalance" => json!(U256::exp10(18)),
                "eth_blockNumber" => json!(U64::from(HEAD)),
                "eth_getTransactionCount" => match block_param(&params[1]) {
                    Some(block) => json!(U256::from(self.count_at(block))),
                    None => json!(U256::from(self.sent.len() as u64 + self.pending)),
                },
                "eth_getBlockByNumber" => {
                    let number = block_param(&params[0]).expect("numbered block");
                    self.block(number)
                }
                other => panic!("unexpected call {other}"),
            }
        }

        fn methods(&self) -> Vec<String> {
            self.calls.borrow().iter().map(|(method, _)| method.clone()).collect()
        }

        fn fetched_blocks(&self) -> Vec<u64> {
            self.calls
                .borrow()
                .iter()
                .filter(|(method, _)| method == "eth_getBlockByNumber")
                .filter_map(|(_, params)| block_param(&params[0]))
                .collect()
        }

        fn counted_blocks(&self) -> Vec<u64> {
            self.calls
                .borrow()
                .iter()
                .filter(|(method, _)| method == "eth_getTransactionCount")
                .filter_map(|(_, params)| block_param(&params[1]))
                .collect()
        }
    }

    fn block_param(value: &Value) -> Option<u64> {
        let hex = value.as_str()?.strip_prefix("0x")?;
        u64::from_str_radix(hex, 16).ok()
    }

    #[derive(Debug, Clone)]
    struct ChainTransport(Rc<Chain>);

    impl Transport for ChainTransport {
        type Out = Ready<web3::Result<Value>>;

        fn prepare(&self, method: &str, params: Vec<Value>) -> (RequestId, Call) {
            (1, web3::helpers::build_request(1, method, params))
        }

        fn send(&self, _id: RequestId, request: Call) -> Self::Out {
            let Call::MethodCall(call) = request else {
                panic!("expected a method call");
            };
            let params = match call.params {
                Params::Array(params) => params,
                _ => Vec::new(),
            };
            let answer = self.0.answer(&call.method, &params);
            self.0.calls.borrow_mut().push((call.method, params));
            ready(Ok(answer))
        }
    }

    fn wallet(chain: Chain) -> (Rc<Chain>, Eip1193Wallet<ChainTransport>) {
        let chain = Rc::new(chain);
        let wallet = Eip1193Wallet::with_transport(ChainTransport(Rc::clone(&chain)));
        (chain, wallet)
    }

    fn account() -> Address {
        Address::repeat_byte(0x11)
    }

    fn tx_ref(block: u64, nonce: u64) -> TransactionRef {
        TransactionRef {
            hash: H256::from_low_u64_be(nonce + 1),
            block_number: Some(block),
        }
    }

    #[test]
    fn walks_history_far_below_the_head() {
        let (chain, wallet) = wallet(Chain {
            account: account(),
            sent: vec![(120, 0), (40_000, 1), (40_000, 2), (999_990, 3)],
            ..Default::default()
        });

        let snapshot = block_on(AccountSnapshotFetcher::default().fetch(Some(&wallet))).unwrap();

        assert_eq!(
            snapshot.transactions(),
            &[
                tx_ref(999_990, 3),
                tx_ref(40_000, 2),
                tx_ref(40_000, 1),
                tx_ref(120, 0),
            ]
        );
        assert_eq!(chain.fetched_blocks(), vec![999_990, 40_000, 40_000, 120]);

        let methods = chain.methods();
        assert_eq!(
            methods[..3],
            ["eth_requestAccounts", "eth_getBalance", "eth_getTransactionCount"]
        );
        assert_eq!(methods.iter().filter(|m| *m == "eth_blockNumber").count(), 1);
        // one `latest` count from the fetcher, everything else is a bisection step
        let latest_counts = methods.iter().filter(|m| *m == "eth_getTransactionCount").count()
            - chain.counted_blocks().len();
        assert_eq!(latest_counts, 1);
        assert!(chain.counted_blocks().len() <= 4 * 21);
    }

    #[test]
    fn later_lookups_stay_below_the_previous_hit() {
        let (chain, wallet) = wallet(Chain {
            account: account(),
            sent: vec![(10, 0), (500, 1), (700_000, 2)],
            ..Default::default()
        });

        block_on(wallet.transaction_count(account())).unwrap();
        block_on(wallet.transaction_by_index(account(), 0)).unwrap();
        let before = chain.counted_blocks().len();

        let older = block_on(wallet.transaction_by_index(account(), 1)).unwrap();
        assert_eq!(older, tx_ref(500, 1));
        assert!(chain.counted_blocks()[before..].iter().all(|block| *block <= 700_000));
        assert_eq!(chain.methods().iter().filter(|m| *m == "eth_blockNumber").count(), 1);
    }

    #[test]
    fn index_zero_restarts_the_walk() {
        let (chain, wallet) = wallet(Chain {
            account: account(),
            sent: vec![(3, 0)],
            ..Default::default()
        });

        for _ in 0..2 {
            let latest = block_on(wallet.transaction_by_index(account(), 0)).unwrap();
            assert_eq!(latest, tx_ref(3, 0));
        }
        assert_eq!(chain.methods().iter().filter(|m| *m == "eth_blockNumber").count(), 2);
    }

    #[test]
    fn unmined_transaction_fails_without_fetching_blocks() {
        let (chain, wallet) = wallet(Chain {
            account: account(),
            sent: vec![(42, 0)],
            pending: 1,
            ..Default::default()
        });

        let err = block_on(AccountSnapshotFetcher::default().fetch(Some(&wallet))).unwrap_err();

        assert!(matches!(err, FetchError::TransportFailure(m) if m.contains("not mined")));
        assert!(chain.fetched_blocks().is_empty());
    }

    #[test]
    fn index_beyond_the_count_is_rejected() {
        let (_, wallet) = wallet(Chain {
            account: account(),
            sent: vec![(42, 0)],
            ..Default::default()
        });

        block_on(wallet.transaction_by_index(account(), 0)).unwrap();
        let err = block_on(wallet.transaction_by_index(account(), 1)).unwrap_err();
        assert_eq!(err, FetchError::transport("account has only 1 transactions"));
    }

    #[test]
    fn finds_the_transaction_with_the_wanted_nonce() {
        let me = account();
        let tx = |from: Address, nonce: u64| Transaction {
            hash: H256::from_low_u64_be(nonce + 1),
            nonce: U256::from(nonce),
            from: Some(from),
            block_number: Some(U64::from(100)),
            ..Default::default()
        };
        let block = vec![tx(Address::repeat_byte(2), 4), tx(me, 3), tx(me, 4)];

        assert_eq!(find_by_nonce(&block, me, 4), Some(tx_ref(100, 4)));
        assert_eq!(find_by_nonce(&block, me, 7), None);
        assert_eq!(find_by_nonce(&[], me, 3), None);
    }

    #[test]
    fn huge_counts_saturate() {
        assert_eq!(saturating_u64(U256::MAX), u64::MAX);
        assert_eq!(saturating_u64(U256::from(12u64)), 12);
    }
}
