use crate::attestation::{EncodeError, SubmitError};
use crate::domain::Address;
use crate::scorer::ScoreSourceError;
use thiserror::Error;

/// Per-address failure taxonomy.
///
/// Every variant is caught at the per-address boundary and turned into an
/// [`AttestationOutcome`](crate::domain::AttestationOutcome); none of them
/// stops the run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Score fetch failed for {address}: {cause}")]
    ScoreFetchFailed {
        address: Address,
        cause: ScoreSourceError,
    },
    #[error("Encoding failed: {cause}")]
    EncodingFailed { cause: EncodeError },
    #[error("Submission failed for {address}: {cause}")]
    SubmissionFailed { address: Address, cause: SubmitError },
}

impl PipelineError {
    /// The underlying cause without the address prefix, as shown in reports.
    pub fn reason(&self) -> String {
        match self {
            PipelineError::ScoreFetchFailed { cause, .. } => cause.to_string(),
            PipelineError::EncodingFailed { cause } => cause.to_string(),
            PipelineError::SubmissionFailed { cause, .. } => cause.to_string(),
        }
    }
}
