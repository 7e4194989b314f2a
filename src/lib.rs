pub mod attestation;
pub mod config;
pub mod domain;
pub mod error;
pub mod io;
pub mod orchestration;
pub mod scorer;

pub use attestation::{AttestationEncoder, EasSubmitter, MockSubmitter, SubmitError, Submitter};
pub use config::Config;
pub use domain::{
    to_scaled, Address, AttestationOutcome, DecimalError, FixedPoint, Outcome, RunSummary,
    ScoreRecord, StampContribution, TxHash,
};
pub use error::PipelineError;
pub use orchestration::{Pipeline, PipelineSettings};
pub use scorer::{MockScoreSource, ScoreFetch, ScoreSource, ScoreSourceError, ScorerApiClient};
