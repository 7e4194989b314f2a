//! Score records returned by the scoring service.

use chrono::{DateTime, Utc};

/// One provider's contribution to an aggregate score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StampContribution {
    /// Decimal string as reported by the service.
    pub score: String,
    /// Set when the stamp was already counted for another address.
    pub deduplicated: bool,
    pub expiration: Option<DateTime<Utc>>,
}

/// A scoring-service response for one address.
///
/// `stamps` keeps the order in which the service listed the providers; the
/// attestation payload is encoded in that same order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreRecord {
    pub score: String,
    pub threshold: String,
    pub passing_score: bool,
    pub expiration_timestamp: DateTime<Utc>,
    pub stamps: Vec<(String, StampContribution)>,
}

impl ScoreRecord {
    /// Look up a stamp by provider name.
    pub fn stamp(&self, provider: &str) -> Option<&StampContribution> {
        self.stamps
            .iter()
            .find(|(name, _)| name == provider)
            .map(|(_, stamp)| stamp)
    }
}
