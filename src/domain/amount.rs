//! Money types
//!
//! Domain primitives for the per-day fine rate and assessed fines.
//! Both are validated at construction time, so an invalid rate or a
//! negative fine cannot exist in the system.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;
use std::str::FromStr;

/// Maximum decimal places for a rate (cents)
const MAX_SCALE: u32 = 2;

/// Maximum allowed daily rate
const MAX_RATE: i64 = 10_000;

/// DailyRate is the flat fine charged per overdue day.
///
/// # Invariants
/// - Value is always positive (> 0)
/// - Maximum 2 decimal places
/// - Maximum value is 10 000 currency units
///
/// # Example
/// ```
/// use rust_decimal::Decimal;
/// use library_lending::domain::DailyRate;
///
/// let rate = DailyRate::new(Decimal::new(150, 2)).unwrap();
/// assert_eq!(rate.value(), Decimal::new(150, 2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DailyRate(Decimal);

/// Errors that can occur when creating a money value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("Rate must be positive (got {0})")]
    NotPositive(Decimal),

    #[error("Fine cannot be negative (got {0})")]
    Negative(Decimal),

    #[error("Amount has too many decimal places (max {MAX_SCALE}, got {0})")]
    TooManyDecimals(u32),

    #[error("Rate exceeds maximum allowed value ({MAX_RATE})")]
    Overflow,

    #[error("Invalid amount format: {0}")]
    ParseError(String),
}

impl DailyRate {
    /// Create a new DailyRate with validation.
    ///
    /// # Errors
    /// - `AmountError::NotPositive` if value <= 0
    /// - `AmountError::TooManyDecimals` if more than 2 decimal places
    /// - `AmountError::Overflow` if value > 10 000
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        if value <= Decimal::ZERO {
            return Err(AmountError::NotPositive(value));
        }

        if value.scale() > MAX_SCALE {
            return Err(AmountError::TooManyDecimals(value.scale()));
        }

        if value > Decimal::from(MAX_RATE) {
            return Err(AmountError::Overflow);
        }

        Ok(Self(value))
    }

    /// Get the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Fine owed for the given number of overdue days.
    pub fn times(&self, days: u32) -> Fine {
        Fine(self.0 * Decimal::from(days))
    }
}

impl Default for DailyRate {
    /// One currency unit per day.
    fn default() -> Self {
        Self(Decimal::ONE)
    }
}

impl fmt::Display for DailyRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for DailyRate {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s.trim())
            .map_err(|e| AmountError::ParseError(e.to_string()))?;
        DailyRate::new(decimal)
    }
}

impl TryFrom<String> for DailyRate {
    type Error = AmountError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        DailyRate::from_str(&value)
    }
}

impl From<DailyRate> for String {
    fn from(rate: DailyRate) -> Self {
        format!("{:.2}", rate.0)
    }
}

/// Fine assessed on a returned loan. Unlike DailyRate, a Fine can be zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal")]
pub struct Fine(Decimal);

impl Fine {
    /// Create a fine (zero or positive)
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        if value < Decimal::ZERO {
            return Err(AmountError::Negative(value));
        }
        Ok(Self(value))
    }

    /// No fine owed
    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Get the underlying value
    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl TryFrom<Decimal> for Fine {
    type Error = AmountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Fine::new(value)
    }
}

impl Default for Fine {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Fine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

// Sum of two non-negative fines stays non-negative, so Add is total here.
impl Add for Fine {
    type Output = Fine;

    fn add(self, rhs: Self) -> Self::Output {
        Fine(self.0 + rhs.0)
    }
}

impl std::iter::Sum for Fine {
    fn sum<I: Iterator<Item = Fine>>(iter: I) -> Self {
        iter.fold(Fine::zero(), Add::add)
    }
}
