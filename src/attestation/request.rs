//! Ledger-native attestation request structures.

use super::submitter::SubmitError;
use crate::domain::Address;
use chrono::{DateTime, Utc};
use ethers::abi::Token;
use ethers::types::{H256, U256};

/// One attestation data tuple:
/// `(recipient, expirationTime, revocable, refUID, data, value)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttestationRequest {
    pub recipient: Address,
    /// Unix seconds; sub-second precision is dropped.
    pub expiration_time: u64,
    pub revocable: bool,
    /// Always zero: attestations are not chained.
    pub ref_uid: H256,
    pub data: Vec<u8>,
    pub value: U256,
}

impl AttestationRequest {
    /// Build a revocable, unchained, zero-value request.
    ///
    /// # Errors
    /// Returns [`SubmitError::InvalidExpiration`] if `expiration` is at or
    /// before the unix epoch; an expiration time of zero means "never expires"
    /// on-chain.
    pub fn new(
        recipient: Address,
        expiration: DateTime<Utc>,
        data: Vec<u8>,
    ) -> Result<Self, SubmitError> {
        let expiration_time = u64::try_from(expiration.timestamp())
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or(SubmitError::InvalidExpiration(expiration))?;
        Ok(Self {
            recipient,
            expiration_time,
            revocable: true,
            ref_uid: H256::zero(),
            data,
            value: U256::zero(),
        })
    }

    pub fn into_token(self) -> Token {
        Token::Tuple(vec![
            Token::Address(self.recipient.as_h160()),
            Token::Uint(U256::from(self.expiration_time)),
            Token::Bool(self.revocable),
            Token::FixedBytes(self.ref_uid.as_bytes().to_vec()),
            Token::Bytes(self.data),
            Token::Uint(self.value),
        ])
    }
}

/// A schema id with the attestation tuples submitted under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiAttestationRequest {
    pub schema: H256,
    pub data: Vec<AttestationRequest>,
}

impl MultiAttestationRequest {
    /// Envelope holding exactly one request.
    pub fn single(schema: H256, request: AttestationRequest) -> Self {
        Self {
            schema,
            data: vec![request],
        }
    }

    pub fn into_token(self) -> Token {
        Token::Tuple(vec![
            Token::FixedBytes(self.schema.as_bytes().to_vec()),
            Token::Array(
                self.data
                    .into_iter()
                    .map(AttestationRequest::into_token)
                    .collect(),
            ),
        ])
    }
}
