//! Crop — something that can be planted (soy, corn, coffee, …).

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::field::check_not_empty;
use crate::id::CropId;
use crate::time::{Timestamp, now};

/// A crop. `name` is unique across all crops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crop {
    pub id: CropId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Crop {
    /// Create a new crop with a fresh id.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Validation`] when `name` is empty.
    pub fn new(name: impl Into<String>) -> Result<Self, LedgerError> {
        let ts = now();
        let crop = Self {
            id: CropId::new(),
            name: name.into().trim().to_string(),
            created_at: ts,
            updated_at: ts,
        };
        crop.validate()?;
        Ok(crop)
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Validation`] when `name` is empty.
    pub fn validate(&self) -> Result<(), LedgerError> {
        check_not_empty("name", &self.name)?;
        Ok(())
    }

    /// Produce the complete candidate record for a partial update.
    #[must_use]
    pub fn merge(&self, patch: CropPatch) -> Self {
        Self {
            id: self.id,
            name: patch
                .name
                .map_or_else(|| self.name.clone(), |name| name.trim().to_string()),
            created_at: self.created_at,
            updated_at: now(),
        }
    }
}

/// Partial update of a [`Crop`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CropPatch {
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    #[test]
    fn should_create_crop_with_trimmed_name() {
        let crop = Crop::new("  Soja ").unwrap();
        assert_eq!(crop.name, "Soja");
    }

    #[test]
    fn should_reject_empty_name() {
        assert!(matches!(
            Crop::new(""),
            Err(LedgerError::Validation(ValidationError::EmptyField { field: "name" }))
        ));
    }

    #[test]
    fn should_keep_name_when_patch_is_empty() {
        let crop = Crop::new("Milho").unwrap();
        let merged = crop.merge(CropPatch::default());
        assert_eq!(merged.name, "Milho");
        assert_eq!(merged.id, crop.id);
    }
}
