//! Domain Error Types
//!
//! Pure domain errors that don't depend on infrastructure.

use thiserror::Error;
use uuid::Uuid;

use crate::validation::Violation;

/// Reasons a transfer request is turned down before anything is written.
///
/// These are expected outcomes, returned inside `TransferOutcome::Rejected`
/// rather than propagated as failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The request failed one or more validation rules
    #[error("Invalid transfer: {}", summarize(.violations))]
    InvalidTransfer { violations: Vec<Violation> },

    /// No account exists with the requested identifier
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),
}

fn summarize(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl DomainError {
    pub fn invalid(violations: Vec<Violation>) -> Self {
        Self::InvalidTransfer { violations }
    }

    /// Violations carried by an invalid-transfer rejection
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::InvalidTransfer { violations } => violations,
            Self::AccountNotFound(_) => &[],
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::AccountNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_transfer_message_lists_violations() {
        let err = DomainError::invalid(vec![
            Violation::new("amount", "must not be zero"),
            Violation::new("metadata.description", "must not be blank"),
        ]);

        let message = err.to_string();
        assert!(message.contains("amount: must not be zero"));
        assert!(message.contains("metadata.description: must not be blank"));
        assert_eq!(err.violations().len(), 2);
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_account_not_found() {
        let id = Uuid::new_v4();
        let err = DomainError::AccountNotFound(id);

        assert!(err.is_not_found());
        assert!(err.violations().is_empty());
        assert!(err.to_string().contains(&id.to_string()));
    }
}
