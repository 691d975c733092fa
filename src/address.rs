use tiny_keccak::{Hasher, Keccak};
use web3::types::Address;

/// Renders an address in its EIP-55 mixed-case checksummed form.
pub fn to_checksum(address: &Address) -> String {
    let lower = hex::encode(address.as_bytes());

    let mut digest = [0u8; 32];
    let mut hasher = Keccak::v256();
    hasher.update(lower.as_bytes());
    hasher.finalize(&mut digest);

    let mut checksummed = String::with_capacity(42);
    checksummed.push_str("0x");
    for (i, ch) in lower.chars().enumerate() {
        let nibble = if i % 2 == 0 { digest[i / 2] >> 4 } else { digest[i / 2] & 0x0f };
        if nibble >= 8 {
            checksummed.push(ch.to_ascii_uppercase());
        } else {
            checksummed.push(ch);
        }
    }
    checksummed
}

/// Shortened `0x1234…abcd` form for compact labels.
pub fn abbreviate(address: &Address) -> String {
    let full = to_checksum(address);
    format!("{}…{}", &full[..6], &full[full.len() - 4..])
}
