//! Scoring-service abstraction for fetching per-address score records.

use crate::domain::{Address, ScoreRecord};
use async_trait::async_trait;
use std::fmt;

pub mod http;
pub mod mock;

pub use http::ScorerApiClient;
pub use mock::MockScoreSource;

/// Result of a successful exchange with the scoring service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreFetch {
    /// A complete score record.
    Scored(ScoreRecord),
    /// The service answered but reported a logical error for this address.
    /// Recorded as a zero score; nothing is submitted on-chain.
    Reported(String),
}

/// Source of score records.
///
/// One call issues one request for one address; implementations do not batch
/// or retry.
#[async_trait]
pub trait ScoreSource: Send + Sync + fmt::Debug {
    /// Fetch the score record for `address` under `scorer_id`.
    async fn fetch_score(
        &self,
        address: &Address,
        scorer_id: u128,
    ) -> Result<ScoreFetch, ScoreSourceError>;
}

/// Error type for score source operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreSourceError {
    /// Network error (e.g., connection timeout, DNS failure)
    NetworkError(String),
    /// Non-2xx response (e.g., 401 bad credential, 429 rate limit)
    HttpError { status: u16, message: String },
    /// Parsing error (invalid JSON or missing required field)
    ParseError(String),
}

impl fmt::Display for ScoreSourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreSourceError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            ScoreSourceError::HttpError { status, message } => {
                write!(f, "HTTP error {}: {}", status, message)
            }
            ScoreSourceError::ParseError(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for ScoreSourceError {}
