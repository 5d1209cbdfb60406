//! Harvest — a named crop cycle (e.g. "Safra 2024").

use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, ValidationError};
use crate::field::check_not_empty;
use crate::id::HarvestId;
use crate::time::{Timestamp, now};

pub const MIN_YEAR: i32 = 2000;
pub const MAX_YEAR: i32 = 2100;

/// A harvest cycle. `name` is unique across all harvests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Harvest {
    pub id: HarvestId,
    pub name: String,
    pub year: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Harvest {
    /// Create a new harvest with a fresh id.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Validation`] when `name` is empty or `year` is
    /// outside `2000..=2100`.
    pub fn new(name: impl Into<String>, year: i32) -> Result<Self, LedgerError> {
        let ts = now();
        let harvest = Self {
            id: HarvestId::new(),
            name: name.into().trim().to_string(),
            year,
            created_at: ts,
            updated_at: ts,
        };
        harvest.validate()?;
        Ok(harvest)
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Validation`] when `name` is empty or `year` is
    /// out of range.
    pub fn validate(&self) -> Result<(), LedgerError> {
        check_not_empty("name", &self.name)?;
        if !(MIN_YEAR..=MAX_YEAR).contains(&self.year) {
            return Err(ValidationError::YearOutOfRange {
                year: self.year,
                min: MIN_YEAR,
                max: MAX_YEAR,
            }
            .into());
        }
        Ok(())
    }

    /// Produce the complete candidate record for a partial update.
    #[must_use]
    pub fn merge(&self, patch: HarvestPatch) -> Self {
        Self {
            id: self.id,
            name: patch
                .name
                .map_or_else(|| self.name.clone(), |name| name.trim().to_string()),
            year: patch.year.unwrap_or(self.year),
            created_at: self.created_at,
            updated_at: now(),
        }
    }
}

/// Partial update of a [`Harvest`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct HarvestPatch {
    pub name: Option<String>,
    pub year: Option<i32>,
}
