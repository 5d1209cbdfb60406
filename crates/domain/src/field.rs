//! Field-level constraints shared by every record's `validate`.

use crate::error::ValidationError;

/// Reject negative, NaN and infinite hectare values.
pub(crate) fn check_hectares(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NegativeArea { field })
    }
}

pub(crate) fn check_not_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::EmptyField { field })
    } else {
        Ok(())
    }
}

/// Length is counted in characters, not bytes.
pub(crate) fn check_length(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), ValidationError> {
    let len = value.trim().chars().count();
    if (min..=max).contains(&len) {
        Ok(())
    } else {
        Err(ValidationError::FieldLength { field, min, max })
    }
}

/// Patched text with surrounding whitespace removed, or `current` when absent.
pub(crate) fn patched(patch: Option<String>, current: &str) -> String {
    patch.map_or_else(|| current.to_string(), |value| value.trim().to_string())
}
