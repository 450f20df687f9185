//! Monetary amount with fixed two-decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! This type wraps `rust_decimal::Decimal` for exact arithmetic.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

/// Number of decimal places every stored amount carries.
pub const AMOUNT_SCALE: u32 = 2;

/// Reasons a raw value is not an acceptable transaction amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// The input is not a decimal number.
    #[error("Amount is not a valid number")]
    Malformed,

    /// The amount is zero or negative.
    #[error("Amount must be greater than zero")]
    NotPositive,

    /// The amount has more than two decimal places.
    #[error("Amount must have at most 2 decimal places")]
    TooManyDecimals,

    /// The amount is above the configured ceiling.
    #[error("Amount must not exceed {ceiling}")]
    ExceedsCeiling {
        /// The inclusive upper bound.
        ceiling: Decimal,
    },
}

/// A validated, strictly positive amount with two decimal places.
///
/// Construction goes through [`Amount::new`] or [`Amount::parse`], so any
/// `Amount` value already satisfies the ledger's amount rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Amount(Decimal);

impl Amount {
    /// Validates a decimal against the amount rules.
    ///
    /// # Errors
    ///
    /// Returns an [`AmountError`] describing the first rule the value breaks.
    pub fn new(value: Decimal, ceiling: Decimal) -> Result<Self, AmountError> {
        if value <= Decimal::ZERO {
            return Err(AmountError::NotPositive);
        }
        if value.normalize().scale() > AMOUNT_SCALE {
            return Err(AmountError::TooManyDecimals);
        }
        if value > ceiling {
            return Err(AmountError::ExceedsCeiling { ceiling });
        }

        let mut scaled = value;
        scaled.rescale(AMOUNT_SCALE);
        Ok(Self(scaled))
    }

    /// Parses and validates a textual amount such as `"250.50"`.
    ///
    /// # Errors
    ///
    /// Returns `AmountError::Malformed` for non-numeric input, otherwise the
    /// same errors as [`Amount::new`].
    pub fn parse(raw: &str, ceiling: Decimal) -> Result<Self, AmountError> {
        let value = Decimal::from_str(raw.trim()).map_err(|_| AmountError::Malformed)?;
        Self::new(value, ceiling)
    }

    /// Returns the inner decimal value.
    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}
