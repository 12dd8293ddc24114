//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant carries enough context (entity, field, offending value) to
/// render a user-facing message. None of these are transient, so callers
/// should never retry them automatically. Infrastructure concerns belong
/// elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A globally unique or sibling-scoped unique field collided with an
    /// existing record.
    #[error("{entity} with {field} '{value}' already exists")]
    UniquenessViolation {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    /// A reference points at a record that does not exist, or a delete is
    /// blocked by dependents under a reject-on-delete policy.
    #[error("{entity} {id}: {reason}")]
    ReferentialIntegrityViolation {
        entity: &'static str,
        id: String,
        reason: String,
    },

    /// A value is outside its permitted range (negative quantity or money,
    /// string length beyond the field maximum, blank required field).
    #[error("{field} '{value}' out of range: {reason}")]
    RangeViolation {
        field: &'static str,
        value: String,
        reason: String,
    },

    /// A requested record does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// A value is syntactically malformed (e.g. an email address or an
    /// unknown enumeration code).
    #[error("{field} '{value}' is not valid")]
    InvalidFormat { field: &'static str, value: String },

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn duplicate(entity: &'static str, field: &'static str, value: impl Into<String>) -> Self {
        Self::UniquenessViolation {
            entity,
            field,
            value: value.into(),
        }
    }

    pub fn integrity(
        entity: &'static str,
        id: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::ReferentialIntegrityViolation {
            entity,
            id: id.to_string(),
            reason: reason.into(),
        }
    }

    pub fn out_of_range(
        field: &'static str,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::RangeViolation {
            field,
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn invalid_format(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidFormat {
            field,
            value: value.into(),
        }
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    /// Name of the offending field, when the error is about a single field.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::UniquenessViolation { field, .. }
            | Self::RangeViolation { field, .. }
            | Self::InvalidFormat { field, .. } => Some(field),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_field_and_value() {
        let err = DomainError::duplicate("supplier", "name", "Acme Inc.");
        assert_eq!(err.to_string(), "supplier with name 'Acme Inc.' already exists");
        assert_eq!(err.field(), Some("name"));

        let err = DomainError::out_of_range("quantity", -1, "must not be negative");
        assert_eq!(err.to_string(), "quantity '-1' out of range: must not be negative");
    }

    #[test]
    fn not_found_has_no_field() {
        let err = DomainError::not_found("item", "abc");
        assert_eq!(err.field(), None);
        assert_eq!(err.to_string(), "item abc not found");
    }
}
