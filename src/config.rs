use serde::{Deserialize, Serialize};

/// Hard upper bound on how many recent transactions a snapshot carries.
pub const MAX_RECENT_TRANSACTIONS: usize = 10;

/// Settings for fetching and displaying an account snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Number of recent transactions to fetch, never more than
    /// [`MAX_RECENT_TRANSACTIONS`].
    pub max_transactions: usize,
    /// Symbol shown next to the formatted balance.
    pub currency_symbol: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            max_transactions: MAX_RECENT_TRANSACTIONS,
            currency_symbol: "ETH".to_string(),
        }
    }
}

impl FetcherConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn transaction_limit(&self) -> usize {
        self.max_transactions.min(MAX_RECENT_TRANSACTIONS)
    }
}
