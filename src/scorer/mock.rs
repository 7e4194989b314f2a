//! Mock score source for testing without network calls.

use super::{ScoreFetch, ScoreSource, ScoreSourceError};
use crate::domain::{Address, ScoreRecord};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Mock score source that returns predefined responses and records every call.
#[derive(Debug, Default)]
pub struct MockScoreSource {
    responses: HashMap<Address, Result<ScoreFetch, ScoreSourceError>>,
    fallback: Option<ScoreRecord>,
    calls: Mutex<Vec<Address>>,
}

impl MockScoreSource {
    /// Create a new mock score source with no responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `record` for `address`.
    pub fn with_record(mut self, address: Address, record: ScoreRecord) -> Self {
        self.responses
            .insert(address, Ok(ScoreFetch::Scored(record)));
        self
    }

    /// Return a service-reported error for `address`.
    pub fn with_reported_error(mut self, address: Address, error: &str) -> Self {
        self.responses
            .insert(address, Ok(ScoreFetch::Reported(error.to_string())));
        self
    }

    /// Fail the request for `address`.
    pub fn with_failure(mut self, address: Address, error: ScoreSourceError) -> Self {
        self.responses.insert(address, Err(error));
        self
    }

    /// Return `record` for any address without an explicit response.
    pub fn with_fallback(mut self, record: ScoreRecord) -> Self {
        self.fallback = Some(record);
        self
    }

    /// Addresses requested so far, in call order.
    pub fn calls(&self) -> Vec<Address> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ScoreSource for MockScoreSource {
    async fn fetch_score(
        &self,
        address: &Address,
        _scorer_id: u128,
    ) -> Result<ScoreFetch, ScoreSourceError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(*address);
        }

        match self.responses.get(address) {
            Some(response) => response.clone(),
            None => match &self.fallback {
                Some(record) => Ok(ScoreFetch::Scored(record.clone())),
                None => Err(ScoreSourceError::HttpError {
                    status: 404,
                    message: "Not Found".to_string(),
                }),
            },
        }
    }
}
