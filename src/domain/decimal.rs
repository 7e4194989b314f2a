//! Exact decimal-string to fixed-point conversion backed by rust_decimal.
//!
//! Scores arrive from the scoring service as decimal strings. They are cut
//! down to a fixed number of fractional digits (truncation toward zero, never
//! rounding) and carried as a scaled integer. No binary floating-point value is
//! produced at any step.

use rust_decimal::Decimal as RustDecimal;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Largest scale accepted for fixed-point conversion.
pub const MAX_SCALE: u32 = 18;

/// Error raised when a decimal string does not follow the accepted grammar.
///
/// Grammar: `[+-]? digits ( "." digits? )?` or `[+-]? "." digits`.
/// Exponents, separators and surrounding whitespace are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecimalError {
    #[error("malformed decimal {input:?}: {reason}")]
    Malformed { input: String, reason: String },
}

impl DecimalError {
    fn malformed(input: &str, reason: impl Into<String>) -> Self {
        DecimalError::Malformed {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// A decimal value truncated to a fixed number of fractional digits.
///
/// The value always carries exactly `scale` fractional digits, so its
/// mantissa is the scaled integer written on-chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FixedPoint {
    value: RustDecimal,
}

impl FixedPoint {
    /// Parse `input` and truncate it to `scale` fractional digits.
    ///
    /// # Errors
    /// Returns [`DecimalError::Malformed`] if the string does not match the
    /// grammar, if `scale` exceeds [`MAX_SCALE`], or if the value does not fit
    /// in 96 bits once scaled.
    pub fn parse(input: &str, scale: u32) -> Result<Self, DecimalError> {
        if scale > MAX_SCALE {
            return Err(DecimalError::malformed(
                input,
                format!("scale {} exceeds maximum of {}", scale, MAX_SCALE),
            ));
        }

        let parts = split_decimal(input)?;

        // Drop excess fractional digits before rust_decimal sees them; its
        // parser rounds once precision runs out, which must never happen here.
        let keep = parts.fraction.len().min(scale as usize);
        let fraction = &parts.fraction[..keep];
        let integer = if parts.integer.is_empty() {
            "0"
        } else {
            parts.integer
        };
        let sign = if parts.negative { "-" } else { "" };
        let truncated = if fraction.is_empty() {
            format!("{}{}", sign, integer)
        } else {
            format!("{}{}.{}", sign, integer, fraction)
        };

        let mut value = RustDecimal::from_str(&truncated)
            .map_err(|e| DecimalError::malformed(input, e.to_string()))?;
        value.rescale(scale);
        if value.scale() != scale {
            return Err(DecimalError::malformed(
                input,
                format!("value does not fit with {} fractional digits", scale),
            ));
        }

        Ok(FixedPoint { value })
    }

    /// The scaled integer, i.e. the value multiplied by `10^scale`.
    pub fn scaled(&self) -> i128 {
        self.value.mantissa()
    }

    /// Number of fractional digits carried.
    pub fn scale(&self) -> u32 {
        self.value.scale()
    }

    /// Returns true if the value is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Returns true if the value is > 0.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.value.is_sign_positive()
    }

    /// Get the underlying RustDecimal.
    pub fn inner(&self) -> RustDecimal {
        self.value
    }
}

impl fmt::Display for FixedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Convert a decimal string into an integer scaled by `10^scale`.
///
/// Excess fractional digits are discarded, so `to_scaled("2.12345", 4)` and
/// `to_scaled("2.1234", 4)` both yield `21234`.
pub fn to_scaled(input: &str, scale: u32) -> Result<i128, DecimalError> {
    FixedPoint::parse(input, scale).map(|fp| fp.scaled())
}

struct DecimalParts<'a> {
    negative: bool,
    integer: &'a str,
    fraction: &'a str,
}

fn split_decimal(input: &str) -> Result<DecimalParts<'_>, DecimalError> {
    let (negative, unsigned) = match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        Some(_) => (false, input),
        None => return Err(DecimalError::malformed(input, "empty string")),
    };

    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, fraction),
        None => (unsigned, ""),
    };

    if integer.is_empty() && fraction.is_empty() {
        return Err(DecimalError::malformed(input, "no digits"));
    }
    if !integer.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DecimalError::malformed(input, "invalid integer part"));
    }
    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DecimalError::malformed(input, "invalid fractional part"));
    }

    Ok(DecimalParts {
        negative,
        integer,
        fraction,
    })
}
