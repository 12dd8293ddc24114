//! Field-level validation shared by every domain crate.
//!
//! Length limits are counted in characters, not bytes.

use crate::error::{DomainError, DomainResult};

/// Validate a required text field: trimmed, non-blank, at most `max` chars.
pub fn required_text(field: &'static str, value: &str, max: usize) -> DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::out_of_range(field, value, "must not be blank"));
    }
    ensure_max_chars(field, trimmed, max)?;
    Ok(trimmed.to_string())
}

/// Validate an optional text field. Blank input is normalised to `None`.
pub fn optional_text(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> DomainResult<Option<String>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => {
            ensure_max_chars(field, v, max)?;
            Ok(Some(v.to_string()))
        }
    }
}

/// Optional free text without a length bound. Blank input becomes `None`.
pub fn optional_free_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub fn ensure_max_chars(field: &'static str, value: &str, max: usize) -> DomainResult<()> {
    let len = value.chars().count();
    if len > max {
        return Err(DomainError::out_of_range(
            field,
            value,
            format!("at most {max} characters allowed (got {len})"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_accepts_exact_maximum() {
        let name = "A".repeat(250);
        assert_eq!(required_text("name", &name, 250).unwrap(), name);
    }

    #[test]
    fn required_text_rejects_one_past_maximum() {
        let name = "B".repeat(251);
        let err = required_text("name", &name, 250).unwrap_err();
        match err {
            DomainError::RangeViolation { field, .. } => assert_eq!(field, "name"),
            _ => panic!("Expected RangeViolation"),
        }
    }

    #[test]
    fn required_text_trims_and_rejects_blank() {
        assert_eq!(required_text("name", "  Zone 1 ", 100).unwrap(), "Zone 1");
        assert!(matches!(
            required_text("name", "   ", 100),
            Err(DomainError::RangeViolation { .. })
        ));
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let name = "é".repeat(10);
        assert!(required_text("item_code", &name, 10).is_ok());
    }

    #[test]
    fn optional_text_normalises_blank_to_none() {
        assert_eq!(optional_text("email", None, 254).unwrap(), None);
        assert_eq!(optional_text("email", Some("  "), 254).unwrap(), None);
        assert_eq!(
            optional_text("contact_number", Some("01234 567890"), 20).unwrap(),
            Some("01234 567890".to_string())
        );
        assert!(optional_text("contact_number", Some(&"1".repeat(21)), 20).is_err());
    }
}
