//! Mock submitter for testing without a ledger.

use super::submitter::{SubmitError, Submitter};
use crate::domain::{Address, TxHash};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ethers::types::H256;
use std::collections::HashMap;
use std::sync::Mutex;

/// A submission captured by [`MockSubmitter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedSubmission {
    pub recipient: Address,
    pub payload: Vec<u8>,
    pub expiration: DateTime<Utc>,
    pub schema: H256,
}

/// Mock submitter that records every call.
///
/// Addresses without a configured response succeed with a hash derived from
/// the call sequence number (1, 2, ...).
#[derive(Debug, Default)]
pub struct MockSubmitter {
    responses: HashMap<Address, Result<TxHash, SubmitError>>,
    submissions: Mutex<Vec<RecordedSubmission>>,
}

impl MockSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Succeed for `address` with `tx_hash`.
    pub fn with_tx_hash(mut self, address: Address, tx_hash: TxHash) -> Self {
        self.responses.insert(address, Ok(tx_hash));
        self
    }

    /// Fail the submission for `address`.
    pub fn with_failure(mut self, address: Address, error: SubmitError) -> Self {
        self.responses.insert(address, Err(error));
        self
    }

    /// Submissions received so far, in call order.
    pub fn submissions(&self) -> Vec<RecordedSubmission> {
        self.submissions
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Submitter for MockSubmitter {
    async fn submit(
        &self,
        recipient: &Address,
        payload: Vec<u8>,
        expiration: DateTime<Utc>,
        schema: H256,
    ) -> Result<TxHash, SubmitError> {
        let sequence = match self.submissions.lock() {
            Ok(mut submissions) => {
                submissions.push(RecordedSubmission {
                    recipient: *recipient,
                    payload,
                    expiration,
                    schema,
                });
                submissions.len() as u64
            }
            Err(_) => return Err(SubmitError::Rpc("mock submitter poisoned".to_string())),
        };

        match self.responses.get(recipient) {
            Some(response) => response.clone(),
            None => Ok(TxHash::from_low_u64_be(sequence)),
        }
    }
}
