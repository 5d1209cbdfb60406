//! Crop planting — an area of a farm allocated to a crop for one harvest.
//!
//! Capacity accounting is keyed by `(farm_id, harvest_id)`: the areas of all
//! plantings sharing that pair must fit in the farm's cultivable area.

use serde::{Deserialize, Serialize};

use crate::error::{CapacityError, LedgerError};
use crate::field::check_hectares;
use crate::id::{CropId, FarmId, HarvestId, PlantingId};
use crate::time::{Timestamp, now};

/// Fail when `proposed` alone, or together with `siblings`, exceeds `capacity`.
///
/// `siblings` are the areas of the *other* plantings on the same farm for the
/// same harvest. The single-allocation check runs first, so an oversized
/// planting is always reported as such, whatever its siblings.
///
/// # Errors
///
/// Returns [`CapacityError::SingleAllocationExceedsCapacity`] or
/// [`CapacityError::AggregateAllocationExceedsCapacity`].
pub fn check_capacity(capacity: f64, proposed: f64, siblings: &[f64]) -> Result<(), CapacityError> {
    if proposed > capacity {
        return Err(CapacityError::SingleAllocationExceedsCapacity { proposed, capacity });
    }
    let aggregate = siblings.iter().sum::<f64>() + proposed;
    if aggregate > capacity {
        return Err(CapacityError::AggregateAllocationExceedsCapacity {
            aggregate,
            capacity,
        });
    }
    Ok(())
}

/// Fail when any harvest's committed plantings no longer fit in `capacity`.
///
/// Used when a farm's cultivable area shrinks: `harvest_totals` holds the
/// summed planting area of each harvest on that farm.
///
/// # Errors
///
/// Returns [`CapacityError::AggregateAllocationExceedsCapacity`] carrying the
/// largest offending total.
pub fn check_allocated(capacity: f64, harvest_totals: &[f64]) -> Result<(), CapacityError> {
    let largest = harvest_totals.iter().copied().fold(0.0, f64::max);
    if largest > capacity {
        return Err(CapacityError::AggregateAllocationExceedsCapacity {
            aggregate: largest,
            capacity,
        });
    }
    Ok(())
}

/// Area held by an existing planting, as loaded for a capacity check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Allocation {
    pub id: PlantingId,
    pub area: f64,
}

/// Areas of `allocations`, minus the planting being updated (if any).
#[must_use]
pub fn sibling_areas(allocations: &[Allocation], exclude: Option<PlantingId>) -> Vec<f64> {
    allocations
        .iter()
        .filter(|alloc| Some(alloc.id) != exclude)
        .map(|alloc| alloc.area)
        .collect()
}

/// A planting of one crop on one farm for one harvest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropPlanting {
    pub id: PlantingId,
    pub farm_id: FarmId,
    pub crop_id: CropId,
    pub harvest_id: HarvestId,
    pub area: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CropPlanting {
    /// Create a new planting with a fresh id.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Validation`] when `area` is negative or not finite.
    pub fn new(
        farm_id: FarmId,
        crop_id: CropId,
        harvest_id: HarvestId,
        area: f64,
    ) -> Result<Self, LedgerError> {
        let ts = now();
        let planting = Self {
            id: PlantingId::new(),
            farm_id,
            crop_id,
            harvest_id,
            area,
            created_at: ts,
            updated_at: ts,
        };
        planting.validate()?;
        Ok(planting)
    }

    /// Check field constraints. Capacity is checked against storage, not here.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Validation`] when `area` is negative or not finite.
    pub fn validate(&self) -> Result<(), LedgerError> {
        check_hectares("area", self.area)?;
        Ok(())
    }

    /// Produce the complete candidate record for a partial update.
    ///
    /// The candidate's `farm_id` / `harvest_id` are the effective pair whose
    /// siblings must be checked.
    #[must_use]
    pub fn merge(&self, patch: PlantingPatch) -> Self {
        Self {
            id: self.id,
            farm_id: patch.farm_id.unwrap_or(self.farm_id),
            crop_id: patch.crop_id.unwrap_or(self.crop_id),
            harvest_id: patch.harvest_id.unwrap_or(self.harvest_id),
            area: patch.area.unwrap_or(self.area),
            created_at: self.created_at,
            updated_at: now(),
        }
    }
}

/// Partial update of a [`CropPlanting`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlantingPatch {
    pub farm_id: Option<FarmId>,
    pub crop_id: Option<CropId>,
    pub harvest_id: Option<HarvestId>,
    pub area: Option<f64>,
}
