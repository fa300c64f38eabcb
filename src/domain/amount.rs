//! Amount types
//!
//! Domain primitives for signed transfer amounts and account balances.
//! A `TransferAmount` can only be built from a value that passes the
//! business rules, so the ledger never sees a zero or over-precise amount.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum absolute value of a single transfer (1 billion)
const MAX_TRANSFER: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Maximum decimal places (currency minor unit)
pub const MAX_SCALE: u32 = 2;

/// A validated, signed transfer amount.
///
/// # Invariants
/// - Value is never zero
/// - Maximum 2 decimal places
/// - Absolute value is at most 1 billion
///
/// Positive values are credits (money received), negative values are
/// debits (money sent).
///
/// # Example
/// ```
/// use rust_decimal::Decimal;
/// use bank_transfers::domain::TransferAmount;
///
/// let amount = TransferAmount::new(Decimal::new(-5000, 2)).unwrap();
/// assert!(amount.is_debit());
/// assert_eq!(amount.magnitude(), Decimal::new(5000, 2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct TransferAmount(Decimal);

/// Errors that can occur when creating an amount or applying it to a balance
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("Amount must not be zero")]
    Zero,

    #[error("Amount has too many decimal places (max {MAX_SCALE}, got {0})")]
    TooManyDecimals(u32),

    #[error("Amount exceeds maximum allowed magnitude ({MAX_TRANSFER})")]
    Overflow,

    #[error("Invalid amount format: {0}")]
    ParseError(String),
}

impl TransferAmount {
    /// Create a new TransferAmount with validation.
    ///
    /// # Errors
    /// - `AmountError::Zero` if value == 0
    /// - `AmountError::TooManyDecimals` if more than 2 decimal places
    /// - `AmountError::Overflow` if |value| > 1 billion
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        if value.is_zero() {
            return Err(AmountError::Zero);
        }

        // Trailing zeros ("50.000") are not extra precision
        let normalized = value.normalize();
        if normalized.scale() > MAX_SCALE {
            return Err(AmountError::TooManyDecimals(normalized.scale()));
        }

        if value.abs() > MAX_TRANSFER {
            return Err(AmountError::Overflow);
        }

        Ok(Self(value))
    }

    /// Get the underlying signed value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Absolute value, as shown to the account owner.
    pub fn magnitude(&self) -> Decimal {
        self.0.abs()
    }

    /// Money received into the account.
    pub fn is_credit(&self) -> bool {
        self.0.is_sign_positive()
    }

    /// Money sent out of the account.
    pub fn is_debit(&self) -> bool {
        self.0.is_sign_negative()
    }
}

impl fmt::Display for TransferAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for TransferAmount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s.trim())
            .map_err(|e| AmountError::ParseError(e.to_string()))?;
        TransferAmount::new(decimal)
    }
}

impl TryFrom<Decimal> for TransferAmount {
    type Error = AmountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        TransferAmount::new(value)
    }
}

impl From<TransferAmount> for Decimal {
    fn from(amount: TransferAmount) -> Self {
        amount.0
    }
}

/// Balance represents an account balance.
///
/// Unlike `TransferAmount` it can be zero or negative: this ledger has no
/// overdraft rule, it only keeps the sum of applied transfers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Balance(Decimal);

impl Balance {
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Apply a signed transfer amount to the balance
    pub fn apply(&self, amount: &TransferAmount) -> Result<Balance, AmountError> {
        self.0
            .checked_add(amount.value())
            .map(Balance)
            .ok_or(AmountError::Overflow)
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_credit_and_debit() {
        let credit = TransferAmount::new(dec!(50.00)).unwrap();
        assert!(credit.is_credit());
        assert!(!credit.is_debit());

        let debit = TransferAmount::new(dec!(-50.00)).unwrap();
        assert!(debit.is_debit());
        assert_eq!(debit.magnitude(), dec!(50.00));
    }

    #[test]
    fn test_amount_zero_rejected() {
        assert_eq!(TransferAmount::new(Decimal::ZERO), Err(AmountError::Zero));
        assert_eq!(TransferAmount::new(dec!(0.00)), Err(AmountError::Zero));
    }

    #[test]
    fn test_amount_too_many_decimals() {
        let amount = TransferAmount::new(dec!(10.001));
        assert!(matches!(amount, Err(AmountError::TooManyDecimals(3))));
    }

    #[test]
    fn test_amount_trailing_zeros_ok() {
        assert!(TransferAmount::new(dec!(10.1000)).is_ok());
    }

    #[test]
    fn test_amount_overflow() {
        assert_eq!(
            TransferAmount::new(dec!(1000000000.01)),
            Err(AmountError::Overflow)
        );
        assert_eq!(
            TransferAmount::new(dec!(-1000000001)),
            Err(AmountError::Overflow)
        );
        assert!(TransferAmount::new(dec!(-1000000000)).is_ok());
    }

    #[test]
    fn test_amount_from_str() {
        let amount: TransferAmount = " -12.5 ".parse().unwrap();
        assert_eq!(amount.value(), dec!(-12.5));
        assert_eq!(amount.to_string(), "-12.50");

        let bad: Result<TransferAmount, _> = "twelve".parse();
        assert!(matches!(bad, Err(AmountError::ParseError(_))));
    }

    #[test]
    fn test_amount_deserialize_validates() {
        let ok: TransferAmount = serde_json::from_str(r#""25.10""#).unwrap();
        assert_eq!(ok.value(), dec!(25.10));

        let zero: Result<TransferAmount, _> = serde_json::from_str(r#""0""#);
        assert!(zero.is_err());
    }

    #[test]
    fn test_balance_apply() {
        let balance = Balance::new(dec!(100.00));
        let balance = balance
            .apply(&TransferAmount::new(dec!(-150.00)).unwrap())
            .unwrap();
        assert_eq!(balance.value(), dec!(-50.00));
        assert_eq!(balance.to_string(), "-50.00");
    }
}
