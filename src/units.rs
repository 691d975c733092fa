use web3::types::U256;

/// Decimals of the native currency: 1 ether = 10^18 wei.
pub const ETHER_DECIMALS: usize = 18;

/// Formats a base-unit integer as a decimal string with `decimals` fractional
/// digits. Trailing zeros are trimmed but at least one fractional digit is
/// kept, so one ether renders as `1.0`.
pub fn format_units(value: U256, decimals: usize) -> String {
    let (whole, fraction) = value.div_mod(U256::exp10(decimals));
    let digits = fraction.to_string();
    let mut fraction = "0".repeat(decimals.saturating_sub(digits.len())) + &digits;
    while fraction.len() > 1 && fraction.ends_with('0') {
        fraction.pop();
    }
    format!("{whole}.{fraction}")
}

/// Formats a wei amount in ether.
pub fn format_ether(wei: U256) -> String {
    format_units(wei, ETHER_DECIMALS)
}
