//! Per-address pipeline outcomes.

use crate::domain::{format_tx_hash, Address, TxHash};
use crate::error::PipelineError;

/// Terminal state reached by one address.
#[derive(Debug)]
pub enum Outcome {
    /// Attestation included on-chain.
    Success { tx_hash: TxHash },
    /// The scoring service reported a logical error; nothing was submitted.
    ZeroScore { reason: String },
    /// Fetching, encoding or submitting failed.
    Failure { error: PipelineError },
}

/// Reported result for one input address.
#[derive(Debug)]
pub struct AttestationOutcome {
    pub address: Address,
    /// Raw decimal score as reported by the service (`"0"` for zero-score
    /// outcomes, empty when no score was obtained).
    pub score: String,
    pub outcome: Outcome,
}

impl AttestationOutcome {
    pub fn success(address: Address, score: String, tx_hash: TxHash) -> Self {
        Self {
            address,
            score,
            outcome: Outcome::Success { tx_hash },
        }
    }

    pub fn zero_score(address: Address, reason: String) -> Self {
        Self {
            address,
            score: "0".to_string(),
            outcome: Outcome::ZeroScore { reason },
        }
    }

    pub fn failure(address: Address, score: String, error: PipelineError) -> Self {
        Self {
            address,
            score,
            outcome: Outcome::Failure { error },
        }
    }

    /// Transaction hash, set only for successful submissions.
    pub fn tx_hash(&self) -> Option<String> {
        match &self.outcome {
            Outcome::Success { tx_hash } => Some(format_tx_hash(tx_hash)),
            _ => None,
        }
    }

    /// Error text, set for every outcome that is not a success.
    pub fn error(&self) -> Option<String> {
        match &self.outcome {
            Outcome::Success { .. } => None,
            Outcome::ZeroScore { reason } => Some(reason.clone()),
            Outcome::Failure { error } => Some(error.reason()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success { .. })
    }
}

/// Counts of terminal states across a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: usize,
    pub zero_score: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn from_outcomes(outcomes: &[AttestationOutcome]) -> Self {
        outcomes
            .iter()
            .fold(RunSummary::default(), |mut acc, o| {
                match o.outcome {
                    Outcome::Success { .. } => acc.succeeded += 1,
                    Outcome::ZeroScore { .. } => acc.zero_score += 1,
                    Outcome::Failure { .. } => acc.failed += 1,
                }
                acc
            })
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.zero_score + self.failed
    }
}
