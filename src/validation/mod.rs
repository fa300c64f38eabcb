//! Transfer validation
//!
//! Structural checks run before a transfer request touches the ledger.
//! The validator collects every violation instead of stopping at the first,
//! so callers can report all problems with a request at once.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::{AmountError, TransferAmount, TransferMetadata, TransferRequest};

pub const MAX_DESCRIPTION_LEN: usize = 150;
pub const MAX_NAME_LEN: usize = 100;
pub const MAX_ACCOUNT_REFERENCE_LEN: usize = 34;

/// A single failed rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Outcome of validating a request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    violations: Vec<Violation>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }

    fn push(&mut self, field: &str, message: impl Into<String>) {
        self.violations.push(Violation::new(field, message));
    }
}

/// Side-effect free checker for `TransferRequest`s
#[derive(Debug, Clone, Copy, Default)]
pub struct TransferValidator;

impl TransferValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, request: &TransferRequest) -> ValidationResult {
        let mut result = ValidationResult::default();

        if request.account_id.is_nil() {
            result.push("account_id", "must reference an account");
        }

        // Zero is rejected: it is neither a credit nor a debit
        if let Err(e) = TransferAmount::new(request.amount) {
            let message = match e {
                AmountError::Zero => "must not be zero".to_string(),
                other => other.to_string(),
            };
            result.push("amount", message);
        }

        validate_metadata(&request.metadata, &mut result);

        result
    }
}

fn validate_metadata(metadata: &TransferMetadata, result: &mut ValidationResult) {
    let description = metadata.description.trim();
    if description.is_empty() {
        result.push("metadata.description", "must not be blank");
    }
    check_text(
        "metadata.description",
        &metadata.description,
        MAX_DESCRIPTION_LEN,
        result,
    );

    let optional = [
        ("metadata.source", &metadata.source, MAX_ACCOUNT_REFERENCE_LEN),
        ("metadata.sender_name", &metadata.sender_name, MAX_NAME_LEN),
        ("metadata.recipient_name", &metadata.recipient_name, MAX_NAME_LEN),
        (
            "metadata.destination",
            &metadata.destination,
            MAX_ACCOUNT_REFERENCE_LEN,
        ),
    ];

    for (field, value, max_len) in optional {
        if let Some(value) = value {
            if value.trim().is_empty() {
                result.push(field, "must not be blank when present");
            }
            check_text(field, value, max_len, result);
        }
    }
}

fn check_text(field: &str, value: &str, max_len: usize, result: &mut ValidationResult) {
    let len = value.chars().count();
    if len > max_len {
        result.push(field, format!("must be at most {max_len} characters (got {len})"));
    }
    if value.chars().any(char::is_control) {
        result.push(field, "must not contain control characters");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn request(amount: Decimal) -> TransferRequest {
        TransferRequest::new(Uuid::new_v4(), amount, TransferMetadata::new("Salary"))
    }

    fn fields(result: &ValidationResult) -> Vec<&str> {
        result.violations().iter().map(|v| v.field.as_str()).collect()
    }

    #[test]
    fn test_valid_credit_and_debit() {
        let validator = TransferValidator::new();
        assert!(validator.validate(&request(dec!(50.00))).is_valid());
        assert!(validator.validate(&request(dec!(-50.00))).is_valid());
    }

    #[test]
    fn test_zero_amount_rejected() {
        let result = TransferValidator::new().validate(&request(Decimal::ZERO));

        assert!(!result.is_valid());
        assert_eq!(result.violations(), &[Violation::new("amount", "must not be zero")]);
    }

    #[test]
    fn test_amount_precision_and_limit() {
        let validator = TransferValidator::new();

        let result = validator.validate(&request(dec!(1.234)));
        assert_eq!(fields(&result), vec!["amount"]);

        let result = validator.validate(&request(dec!(-2000000000)));
        assert_eq!(fields(&result), vec!["amount"]);
    }

    #[test]
    fn test_nil_account_rejected() {
        let request = TransferRequest::new(Uuid::nil(), dec!(10), TransferMetadata::new("x"));
        let result = TransferValidator::new().validate(&request);
        assert_eq!(fields(&result), vec!["account_id"]);
    }

    #[test]
    fn test_collects_every_violation() {
        let metadata = TransferMetadata::new("   ")
            .with_sender_name("a".repeat(MAX_NAME_LEN + 1))
            .with_destination("NL91\nABNA");
        let request = TransferRequest::new(Uuid::nil(), Decimal::ZERO, metadata);

        let result = TransferValidator::new().validate(&request);
        assert_eq!(
            fields(&result),
            vec![
                "account_id",
                "amount",
                "metadata.description",
                "metadata.sender_name",
                "metadata.destination",
            ]
        );
    }

    #[test]
    fn test_description_length_counts_chars() {
        let exact = TransferMetadata::new("€".repeat(MAX_DESCRIPTION_LEN));
        let request = TransferRequest::new(Uuid::new_v4(), dec!(1), exact);
        assert!(TransferValidator::new().validate(&request).is_valid());

        let over = TransferMetadata::new("€".repeat(MAX_DESCRIPTION_LEN + 1));
        let request = TransferRequest::new(Uuid::new_v4(), dec!(1), over);
        let result = TransferValidator::new().validate(&request);
        assert_eq!(fields(&result), vec!["metadata.description"]);
    }

    #[test]
    fn test_blank_optional_field_rejected() {
        let metadata = TransferMetadata::new("Rent").with_source("  ");
        let request = TransferRequest::new(Uuid::new_v4(), dec!(-700), metadata);

        let result = TransferValidator::new().validate(&request);
        assert_eq!(fields(&result), vec!["metadata.source"]);
    }
}
