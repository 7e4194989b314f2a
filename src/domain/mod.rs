//! Domain types for the score-to-attestation pipeline.
//!
//! This module provides:
//! - Exact fixed-point conversion of decimal score strings
//! - Validated ledger addresses and transaction hashes
//! - Score records as returned by the scoring service
//! - Per-address outcomes and run summaries

pub mod decimal;
pub mod outcome;
pub mod primitives;
pub mod score;

pub use decimal::{to_scaled, DecimalError, FixedPoint, MAX_SCALE};
pub use outcome::{AttestationOutcome, Outcome, RunSummary};
pub use primitives::{format_tx_hash, Address, AddressParseError, TxHash};
pub use score::{ScoreRecord, StampContribution};
