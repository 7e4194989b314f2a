//! Attestation payload encoding and on-chain submission.

pub mod encoder;
pub mod mock;
pub mod request;
pub mod submitter;

pub use encoder::{encode_score, AttestationEncoder, EncodeError};
pub use mock::{MockSubmitter, RecordedSubmission};
pub use request::{AttestationRequest, MultiAttestationRequest};
pub use submitter::{EasSubmitter, SubmitError, Submitter};
