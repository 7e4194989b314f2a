//! Domain primitives: Address, TxHash.

use ethers::types::{H160, H256};
use std::str::FromStr;
use thiserror::Error;

/// Hash of a submitted ledger transaction.
pub type TxHash = H256;

/// Render a transaction hash as `0x` followed by 64 lowercase hex digits.
pub fn format_tx_hash(hash: &TxHash) -> String {
    format!("0x{}", hex::encode(hash.as_bytes()))
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressParseError {
    #[error("invalid address format: {0}")]
    InvalidFormat(String),
    #[error("address checksum mismatch: {0}")]
    BadChecksum(String),
}

/// A validated 20-byte ledger account address.
///
/// Displayed canonically as lowercase hex with a `0x` prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(H160);

impl Address {
    /// Parse and validate an address string.
    ///
    /// Accepts `0x` followed by 40 hex digits. All-lowercase and all-uppercase
    /// digits are accepted as is; mixed case must match the EIP-55 checksum.
    pub fn parse(s: &str) -> Result<Self, AddressParseError> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| AddressParseError::InvalidFormat(s.to_string()))?;

        if digits.len() != 40 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(AddressParseError::InvalidFormat(s.to_string()));
        }

        let raw = H160::from_str(digits)
            .map_err(|_| AddressParseError::InvalidFormat(s.to_string()))?;

        let has_lower = digits.bytes().any(|b| b.is_ascii_lowercase());
        let has_upper = digits.bytes().any(|b| b.is_ascii_uppercase());
        if has_lower && has_upper {
            let checksummed = ethers::utils::to_checksum(&raw, None);
            if checksummed[2..] != *digits {
                return Err(AddressParseError::BadChecksum(s.to_string()));
            }
        }

        Ok(Address(raw))
    }

    /// Wrap an already-decoded address.
    pub fn from_h160(raw: H160) -> Self {
        Address(raw)
    }

    /// Get the underlying ethers address.
    pub fn as_h160(&self) -> H160 {
        self.0
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::parse(s)
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0.as_bytes()))
    }
}
