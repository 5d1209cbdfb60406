//! Farm — a rural property owned by a producer, with its land-area breakdown.

use serde::{Deserialize, Serialize};

use crate::error::{AreaInvariantViolation, LedgerError, ValidationError};
use crate::field::{check_hectares, check_not_empty, patched};
use crate::id::{FarmId, ProducerId};
use crate::time::{Timestamp, now};

/// Fail when the declared sub-areas add up to more than the total.
///
/// Inputs are assumed non-negative; [`Farm::validate`] checks that first.
///
/// # Errors
///
/// Returns [`AreaInvariantViolation`] when `cultivable + vegetation > total`.
pub fn check_areas(
    total: f64,
    cultivable: f64,
    vegetation: f64,
) -> Result<(), AreaInvariantViolation> {
    if cultivable + vegetation > total {
        return Err(AreaInvariantViolation {
            total,
            cultivable,
            vegetation,
        });
    }
    Ok(())
}

/// A farm and its declared areas, in hectares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Farm {
    pub id: FarmId,
    pub producer_id: ProducerId,
    pub name: String,
    pub city: String,
    pub state: String,
    pub total_area: f64,
    pub cultivable_area: f64,
    pub vegetation_area: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Farm {
    /// Create a builder for constructing a [`Farm`].
    #[must_use]
    pub fn builder() -> FarmBuilder {
        FarmBuilder::default()
    }

    /// Check field constraints, then the land-area invariant.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Validation`] when a text field is empty, an
    /// area is negative or not finite, or the sub-areas exceed the total.
    pub fn validate(&self) -> Result<(), LedgerError> {
        check_not_empty("name", &self.name)?;
        check_not_empty("city", &self.city)?;
        check_not_empty("state", &self.state)?;
        check_hectares("total_area", self.total_area)?;
        check_hectares("cultivable_area", self.cultivable_area)?;
        check_hectares("vegetation_area", self.vegetation_area)?;
        check_areas(self.total_area, self.cultivable_area, self.vegetation_area)?;
        Ok(())
    }

    /// Produce the complete candidate record for a partial update.
    ///
    /// Fields absent from `patch` keep their current value. The result must
    /// be validated as a whole before it is persisted.
    #[must_use]
    pub fn merge(&self, patch: FarmPatch) -> Self {
        Self {
            id: self.id,
            producer_id: patch.producer_id.unwrap_or(self.producer_id),
            name: patched(patch.name, &self.name),
            city: patched(patch.city, &self.city),
            state: patched(patch.state, &self.state),
            total_area: patch.total_area.unwrap_or(self.total_area),
            cultivable_area: patch.cultivable_area.unwrap_or(self.cultivable_area),
            vegetation_area: patch.vegetation_area.unwrap_or(self.vegetation_area),
            created_at: self.created_at,
            updated_at: now(),
        }
    }
}

/// Partial update of a [`Farm`]; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FarmPatch {
    pub producer_id: Option<ProducerId>,
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub total_area: Option<f64>,
    pub cultivable_area: Option<f64>,
    pub vegetation_area: Option<f64>,
}

/// Step-by-step builder for [`Farm`].
#[derive(Debug, Default)]
pub struct FarmBuilder {
    id: Option<FarmId>,
    producer_id: Option<ProducerId>,
    name: Option<String>,
    city: Option<String>,
    state: Option<String>,
    total_area: f64,
    cultivable_area: f64,
    vegetation_area: f64,
}

impl FarmBuilder {
    #[must_use]
    pub fn id(mut self, id: FarmId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn producer_id(mut self, producer_id: ProducerId) -> Self {
        self.producer_id = Some(producer_id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into().trim().to_string());
        self
    }

    #[must_use]
    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into().trim().to_string());
        self
    }

    #[must_use]
    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into().trim().to_string());
        self
    }

    /// Set total, cultivable and vegetation area in one call.
    #[must_use]
    pub fn areas(mut self, total: f64, cultivable: f64, vegetation: f64) -> Self {
        self.total_area = total;
        self.cultivable_area = cultivable;
        self.vegetation_area = vegetation;
        self
    }

    /// Consume the builder, validate, and return a [`Farm`].
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Validation`] if any field constraint or the
    /// land-area invariant fails. A missing producer id is reported as
    /// [`ValidationError::InvalidId`].
    pub fn build(self) -> Result<Farm, LedgerError> {
        let producer_id = self
            .producer_id
            .ok_or_else(|| ValidationError::InvalidId("producer_id".to_string()))?;
        let ts = now();
        let farm = Farm {
            id: self.id.unwrap_or_default(),
            producer_id,
            name: self.name.unwrap_or_default(),
            city: self.city.unwrap_or_default(),
            state: self.state.unwrap_or_default(),
            total_area: self.total_area,
            cultivable_area: self.cultivable_area,
            vegetation_area: self.vegetation_area,
            created_at: ts,
            updated_at: ts,
        };
        farm.validate()?;
        Ok(farm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn farm(total: f64, cultivable: f64, vegetation: f64) -> Result<Farm, LedgerError> {
        Farm::builder()
            .producer_id(ProducerId::new())
            .name("Boa Esperança")
            .city("Uberlândia")
            .state("MG")
            .areas(total, cultivable, vegetation)
            .build()
    }

    #[test]
    fn should_accept_sub_areas_equal_to_total() {
        assert_eq!(check_areas(1000.0, 700.0, 300.0), Ok(()));
    }

    #[test]
    fn should_reject_sub_areas_above_total() {
        let err = check_areas(1000.0, 700.0, 301.0).unwrap_err();
        assert_eq!(err.total, 1000.0);
        assert_eq!(err.vegetation, 301.0);
    }

    #[test]
    fn should_accept_all_zero_areas() {
        assert!(check_areas(0.0, 0.0, 0.0).is_ok());
    }

    #[test]
    fn should_build_valid_farm() {
        let farm = farm(1000.0, 700.0, 300.0).unwrap();
        assert_eq!(farm.state, "MG");
        assert_eq!(farm.created_at, farm.updated_at);
    }

    #[test]
    fn should_return_area_violation_when_building_oversized_farm() {
        let result = farm(100.0, 80.0, 30.0);
        assert!(matches!(
            result,
            Err(LedgerError::Validation(ValidationError::AreaInvariant(_)))
        ));
    }

    #[test]
    fn should_reject_negative_area() {
        let result = farm(100.0, -1.0, 30.0);
        assert!(matches!(
            result,
            Err(LedgerError::Validation(ValidationError::NegativeArea {
                field: "cultivable_area"
            }))
        ));
    }

    #[test]
    fn should_reject_nan_area() {
        assert!(farm(f64::NAN, 1.0, 1.0).is_err());
    }

    #[test]
    fn should_reject_empty_city() {
        let result = Farm::builder()
            .producer_id(ProducerId::new())
            .name("X")
            .state("MG")
            .build();
        assert!(matches!(
            result,
            Err(LedgerError::Validation(ValidationError::EmptyField { field: "city" }))
        ));
    }

    #[test]
    fn should_keep_unpatched_fields_when_merging() {
        let original = farm(1000.0, 700.0, 300.0).unwrap();
        let merged = original.merge(FarmPatch {
            vegetation_area: Some(200.0),
            ..FarmPatch::default()
        });
        assert_eq!(merged.id, original.id);
        assert_eq!(merged.total_area, 1000.0);
        assert_eq!(merged.cultivable_area, 700.0);
        assert_eq!(merged.vegetation_area, 200.0);
        assert_eq!(merged.created_at, original.created_at);
    }

    #[test]
    fn should_trim_text_fields_on_build_and_merge() {
        let built = Farm::builder()
            .producer_id(ProducerId::new())
            .name(" Boa Vista ")
            .city("Uberlândia  ")
            .state(" MG")
            .areas(1000.0, 700.0, 300.0)
            .build()
            .unwrap();
        assert_eq!(built.name, "Boa Vista");
        assert_eq!(built.city, "Uberlândia");
        assert_eq!(built.state, "MG");

        let merged = built.merge(FarmPatch {
            city: Some("  Sorriso ".to_string()),
            ..FarmPatch::default()
        });
        assert_eq!(merged.city, "Sorriso");
        assert_eq!(merged.name, "Boa Vista");
    }

    #[test]
    fn should_catch_cross_field_violation_after_merge() {
        let original = farm(1000.0, 700.0, 300.0).unwrap();
        let merged = original.merge(FarmPatch {
            total_area: Some(900.0),
            ..FarmPatch::default()
        });
        assert!(merged.validate().is_err());
    }

    #[test]
    fn should_deserialize_patch_with_missing_fields() {
        let patch: FarmPatch = serde_json::from_str(r#"{"total_area": 50.5}"#).unwrap();
        assert_eq!(patch.total_area, Some(50.5));
        assert!(patch.name.is_none());
    }
}
