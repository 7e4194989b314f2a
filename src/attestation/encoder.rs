//! ABI encoding of score records into the attestation schema payload.
//!
//! Payload layout (head-tail ABI encoding of a parameter list):
//!
//! ```text
//! bool     passing_score
//! uint8    score_decimals
//! uint128  scorer_id
//! uint32   score
//! uint32   threshold
//! (string provider, uint32 score)[] stamps
//! ```
//!
//! Readers of the attestation decode exactly this layout, so the byte output
//! is pinned by golden tests.

use crate::domain::{DecimalError, FixedPoint, ScoreRecord};
use ethers::abi::{encode, Token};
use ethers::types::U256;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error(transparent)]
    Decimal(#[from] DecimalError),
    #[error("{field} value {value} does not fit in uint{bits}")]
    OutOfRange {
        field: String,
        value: i128,
        bits: u32,
    },
}

/// Encoder bound to one scorer id and one fixed-point scale.
#[derive(Debug, Clone, Copy)]
pub struct AttestationEncoder {
    scorer_id: u128,
    scale: u32,
}

impl AttestationEncoder {
    pub fn new(scorer_id: u128, scale: u32) -> Self {
        Self { scorer_id, scale }
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Stamps that carry attestable weight, in service order.
    ///
    /// Deduplicated stamps are skipped without looking at their score. Of the
    /// rest, only those whose truncated score is strictly positive are kept.
    pub fn attestable_stamps(
        &self,
        record: &ScoreRecord,
    ) -> Result<Vec<(String, FixedPoint)>, EncodeError> {
        let mut kept = Vec::new();
        for (provider, stamp) in &record.stamps {
            if stamp.deduplicated {
                continue;
            }
            let score = FixedPoint::parse(&stamp.score, self.scale)?;
            if score.is_positive() {
                kept.push((provider.clone(), score));
            }
        }
        Ok(kept)
    }

    /// Encode `record` into the schema payload.
    pub fn encode(&self, record: &ScoreRecord) -> Result<Vec<u8>, EncodeError> {
        let score = FixedPoint::parse(&record.score, self.scale)?;
        let threshold = FixedPoint::parse(&record.threshold, self.scale)?;
        let decimals = u8::try_from(self.scale).map_err(|_| EncodeError::OutOfRange {
            field: "score_decimals".to_string(),
            value: i128::from(self.scale),
            bits: 8,
        })?;

        let stamps = self
            .attestable_stamps(record)?
            .into_iter()
            .map(|(provider, score)| {
                let scaled = uint32(&format!("stamps.{}", provider), &score)?;
                Ok(Token::Tuple(vec![
                    Token::String(provider),
                    Token::Uint(U256::from(scaled)),
                ]))
            })
            .collect::<Result<Vec<_>, EncodeError>>()?;

        Ok(encode(&[
            Token::Bool(record.passing_score),
            Token::Uint(U256::from(decimals)),
            Token::Uint(U256::from(self.scorer_id)),
            Token::Uint(U256::from(uint32("score", &score)?)),
            Token::Uint(U256::from(uint32("threshold", &threshold)?)),
            Token::Array(stamps),
        ]))
    }
}

/// Encode `record` for `scorer_id` at `scale` fractional digits.
pub fn encode_score(
    record: &ScoreRecord,
    scorer_id: u128,
    scale: u32,
) -> Result<Vec<u8>, EncodeError> {
    AttestationEncoder::new(scorer_id, scale).encode(record)
}

fn uint32(field: &str, value: &FixedPoint) -> Result<u32, EncodeError> {
    let scaled = value.scaled();
    u32::try_from(scaled).map_err(|_| EncodeError::OutOfRange {
        field: field.to_string(),
        value: scaled,
        bits: 32,
    })
}
