use crate::attestation::{AttestationEncoder, Submitter};
use crate::config::Config;
use crate::domain::{format_tx_hash, Address, AttestationOutcome, RunSummary, ScoreRecord, TxHash};
use crate::error::PipelineError;
use crate::scorer::{ScoreFetch, ScoreSource};
use ethers::types::H256;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Immutable settings for one pipeline run.
#[derive(Debug, Clone, Copy)]
pub struct PipelineSettings {
    pub scorer_id: u128,
    pub schema_uid: H256,
    pub score_decimals: u32,
    /// Throttling unit only; addresses inside a batch still run one at a time.
    pub batch_size: usize,
    pub request_delay: Duration,
}

impl From<&Config> for PipelineSettings {
    fn from(config: &Config) -> Self {
        Self {
            scorer_id: config.scorer_id,
            schema_uid: config.schema_uid,
            score_decimals: config.score_decimals,
            batch_size: config.batch_size,
            request_delay: config.request_delay,
        }
    }
}

/// Fixed pause between consecutive addresses.
#[derive(Debug, Clone, Copy)]
pub struct Throttle {
    delay: Duration,
}

impl Throttle {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

/// Drives fetch -> encode -> submit for each address, strictly in sequence.
#[derive(Clone)]
pub struct Pipeline {
    scorer: Arc<dyn ScoreSource>,
    submitter: Arc<dyn Submitter>,
    encoder: AttestationEncoder,
    throttle: Throttle,
    settings: PipelineSettings,
}

impl Pipeline {
    pub fn new(
        scorer: Arc<dyn ScoreSource>,
        submitter: Arc<dyn Submitter>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            scorer,
            submitter,
            encoder: AttestationEncoder::new(settings.scorer_id, settings.score_decimals),
            throttle: Throttle::new(settings.request_delay),
            settings,
        }
    }

    /// Process every address and return one outcome per address, in input order.
    ///
    /// Per-address failures are recorded in the outcome and never stop the run.
    pub async fn run(&self, addresses: &[Address]) -> Vec<AttestationOutcome> {
        let batch_size = self.settings.batch_size.max(1);
        let batch_count = addresses.len().div_ceil(batch_size);
        let mut outcomes = Vec::with_capacity(addresses.len());

        info!(
            addresses = addresses.len(),
            batches = batch_count,
            scorer_id = self.settings.scorer_id,
            "Starting attestation run"
        );

        for (batch_index, batch) in addresses.chunks(batch_size).enumerate() {
            info!(
                batch = batch_index + 1,
                of = batch_count,
                size = batch.len(),
                "Processing batch"
            );
            for address in batch {
                if !outcomes.is_empty() {
                    self.throttle.pause().await;
                }
                outcomes.push(self.process_address(address).await);
            }
        }

        let summary = RunSummary::from_outcomes(&outcomes);
        info!(
            succeeded = summary.succeeded,
            zero_score = summary.zero_score,
            failed = summary.failed,
            "Attestation run finished"
        );
        outcomes
    }

    /// Run the state machine for a single address.
    pub async fn process_address(&self, address: &Address) -> AttestationOutcome {
        debug!(address = %address, "Fetching score");
        let record = match self
            .scorer
            .fetch_score(address, self.settings.scorer_id)
            .await
        {
            Ok(ScoreFetch::Scored(record)) => record,
            Ok(ScoreFetch::Reported(reason)) => {
                warn!(
                    address = %address,
                    reason = %reason,
                    "Scorer reported an error; recording zero score"
                );
                return AttestationOutcome::zero_score(*address, reason);
            }
            Err(cause) => {
                let err = PipelineError::ScoreFetchFailed {
                    address: *address,
                    cause,
                };
                error!(address = %address, error = %err, "Score fetch failed");
                return AttestationOutcome::failure(*address, String::new(), err);
            }
        };

        match self.attest(address, &record).await {
            Ok(tx_hash) => {
                info!(
                    address = %address,
                    score = %record.score,
                    tx_hash = %format_tx_hash(&tx_hash),
                    "Attestation confirmed"
                );
                AttestationOutcome::success(*address, record.score, tx_hash)
            }
            Err(err) => {
                error!(address = %address, error = %err, "Attestation failed");
                AttestationOutcome::failure(*address, record.score, err)
            }
        }
    }

    async fn attest(
        &self,
        address: &Address,
        record: &ScoreRecord,
    ) -> Result<TxHash, PipelineError> {
        let payload = self
            .encoder
            .encode(record)
            .map_err(|cause| PipelineError::EncodingFailed { cause })?;

        self.submitter
            .submit(
                address,
                payload,
                record.expiration_timestamp,
                self.settings.schema_uid,
            )
            .await
            .map_err(|cause| PipelineError::SubmissionFailed {
                address: *address,
                cause,
            })
    }
}
