//! Planting service — allocates farm area to a crop for a harvest.
//!
//! References are checked here; the capacity check itself runs inside the
//! repository's [`reserve`](crate::ports::PlantingRepository::reserve), where
//! it is serialized against every other writer on the same farm and harvest.

use farmledger_domain::error::{LedgerError, NotFoundError};
use farmledger_domain::id::PlantingId;
use farmledger_domain::page::{Page, PageRequest};
use farmledger_domain::planting::{CropPlanting, PlantingPatch};

use crate::ports::{
    CropRepository, FarmRepository, HarvestRepository, PlantingFilter, PlantingRepository,
    Reservation,
};

/// Application service for crop plantings.
pub struct PlantingService<PL, F, C, H> {
    plantings: PL,
    farms: F,
    crops: C,
    harvests: H,
}

impl<PL, F, C, H> PlantingService<PL, F, C, H>
where
    PL: PlantingRepository,
    F: FarmRepository,
    C: CropRepository,
    H: HarvestRepository,
{
    /// Create a new service backed by the given repositories.
    pub fn new(plantings: PL, farms: F, crops: C, harvests: H) -> Self {
        Self {
            plantings,
            farms,
            crops,
            harvests,
        }
    }

    /// Record a new planting if it fits in the farm's cultivable area.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Validation`] for a negative area,
    /// [`LedgerError::NotFound`] if the farm, crop or harvest is missing,
    /// [`LedgerError::Capacity`] if the allocation does not fit, or a storage
    /// error.
    #[tracing::instrument(skip(self, planting), fields(planting_id = %planting.id))]
    pub async fn create_planting(&self, planting: CropPlanting) -> Result<CropPlanting, LedgerError> {
        planting.validate()?;
        self.ensure_references(&planting).await?;
        let created = self
            .plantings
            .reserve(planting, Reservation::Insert)
            .await
            .inspect_err(|err| {
                tracing::warn!(%err, "planting rejected");
            })?;
        tracing::info!(area = created.area, "planting created");
        Ok(created)
    }

    /// Look up a planting by id.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] when no planting with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_planting(&self, id: PlantingId) -> Result<CropPlanting, LedgerError> {
        self.plantings.get_by_id(id).await?.ok_or_else(|| {
            tracing::warn!("planting not found");
            NotFoundError {
                entity: "CropPlanting",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List plantings, newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_plantings(
        &self,
        filter: PlantingFilter,
        page: PageRequest,
    ) -> Result<Page<CropPlanting>, LedgerError> {
        self.plantings.list(filter, page).await
    }

    /// Apply a partial update to an existing planting.
    ///
    /// The merged record is checked against its effective farm and harvest,
    /// with the planting's own stored area left out of the sibling sum.
    ///
    /// # Errors
    ///
    /// Same as [`create_planting`](Self::create_planting), plus
    /// [`LedgerError::NotFound`] if the planting itself is missing.
    #[tracing::instrument(skip(self, patch))]
    pub async fn update_planting(
        &self,
        id: PlantingId,
        patch: PlantingPatch,
    ) -> Result<CropPlanting, LedgerError> {
        let existing = self.get_planting(id).await?;
        let candidate = existing.merge(patch);
        candidate.validate()?;
        self.ensure_references(&candidate).await?;
        let updated = self
            .plantings
            .reserve(candidate, Reservation::Update)
            .await
            .inspect_err(|err| {
                tracing::warn!(%err, "planting update rejected");
            })?;
        tracing::info!(area = updated.area, "planting updated");
        Ok(updated)
    }

    /// Delete a planting by id, releasing its area.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if the planting does not exist,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn delete_planting(&self, id: PlantingId) -> Result<(), LedgerError> {
        self.get_planting(id).await?;
        self.plantings.delete(id).await?;
        tracing::info!("planting deleted");
        Ok(())
    }

    async fn ensure_references(&self, planting: &CropPlanting) -> Result<(), LedgerError> {
        if self.farms.get_by_id(planting.farm_id).await?.is_none() {
            return Err(missing("Farm", planting.farm_id));
        }
        if self.crops.get_by_id(planting.crop_id).await?.is_none() {
            return Err(missing("Crop", planting.crop_id));
        }
        if self.harvests.get_by_id(planting.harvest_id).await?.is_none() {
            return Err(missing("Harvest", planting.harvest_id));
        }
        Ok(())
    }
}

fn missing(entity: &'static str, id: impl std::fmt::Display) -> LedgerError {
    tracing::warn!(entity, %id, "planting references unknown record");
    NotFoundError {
        entity,
        id: id.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::ProducerRepository;
    use crate::testing::MemoryStore;
    use farmledger_domain::crop::Crop;
    use farmledger_domain::error::CapacityError;
    use farmledger_domain::farm::Farm;
    use farmledger_domain::harvest::Harvest;
    use farmledger_domain::id::{CropId, FarmId, HarvestId};
    use farmledger_domain::producer::Producer;

    type Service = PlantingService<MemoryStore, MemoryStore, MemoryStore, MemoryStore>;

    struct Fixture {
        svc: Service,
        store: MemoryStore,
        farm_id: FarmId,
        crop_id: CropId,
        harvest_id: HarvestId,
    }

    /// One farm with 700 ha cultivable, one crop, one harvest.
    async fn fixture() -> Fixture {
        let store = MemoryStore::default();
        let producer = Producer::builder()
            .document("52998224725")
            .name("Maria Souza")
            .build()
            .unwrap();
        let farm = Farm::builder()
            .producer_id(producer.id)
            .name("Boa Vista")
            .city("Rio Verde")
            .state("GO")
            .areas(1000.0, 700.0, 300.0)
            .build()
            .unwrap();
        let crop = Crop::new("Soja").unwrap();
        let harvest = Harvest::new("Safra 2024", 2024).unwrap();
        let (farm_id, crop_id, harvest_id) = (farm.id, crop.id, harvest.id);

        ProducerRepository::create(&store, producer).await.unwrap();
        FarmRepository::create(&store, farm).await.unwrap();
        CropRepository::create(&store, crop).await.unwrap();
        HarvestRepository::create(&store, harvest).await.unwrap();

        Fixture {
            svc: PlantingService::new(store.clone(), store.clone(), store.clone(), store.clone()),
            store,
            farm_id,
            crop_id,
            harvest_id,
        }
    }

    impl Fixture {
        fn planting(&self, area: f64) -> CropPlanting {
            CropPlanting::new(self.farm_id, self.crop_id, self.harvest_id, area).unwrap()
        }
    }

    #[tokio::test]
    async fn should_accept_planting_within_capacity() {
        let fx = fixture().await;
        fx.svc.create_planting(fx.planting(150.0)).await.unwrap();
        assert_eq!(fx.store.planting_count(), 1);
    }

    #[tokio::test]
    async fn should_reject_aggregate_above_capacity() {
        let fx = fixture().await;
        fx.svc.create_planting(fx.planting(600.0)).await.unwrap();

        let result = fx.svc.create_planting(fx.planting(150.0)).await;
        assert!(matches!(
            result,
            Err(LedgerError::Capacity(
                CapacityError::AggregateAllocationExceedsCapacity { .. }
            ))
        ));
        assert_eq!(fx.store.planting_count(), 1);
    }

    #[tokio::test]
    async fn should_reject_single_allocation_above_capacity() {
        let fx = fixture().await;
        let result = fx.svc.create_planting(fx.planting(701.0)).await;
        assert!(matches!(
            result,
            Err(LedgerError::Capacity(
                CapacityError::SingleAllocationExceedsCapacity { .. }
            ))
        ));
    }

    #[tokio::test]
    async fn should_accept_allocation_that_fills_capacity_exactly() {
        let fx = fixture().await;
        fx.svc.create_planting(fx.planting(500.0)).await.unwrap();
        fx.svc.create_planting(fx.planting(200.0)).await.unwrap();
        assert_eq!(fx.store.planting_count(), 2);
    }

    #[tokio::test]
    async fn should_count_capacity_per_harvest() {
        let fx = fixture().await;
        let other = Harvest::new("Safra 2025", 2025).unwrap();
        let other_id = other.id;
        HarvestRepository::create(&fx.store, other).await.unwrap();

        fx.svc.create_planting(fx.planting(600.0)).await.unwrap();
        let next_season = CropPlanting::new(fx.farm_id, fx.crop_id, other_id, 600.0).unwrap();
        fx.svc.create_planting(next_season).await.unwrap();
    }

    #[tokio::test]
    async fn should_exclude_own_area_when_updating() {
        let fx = fixture().await;
        let p = fx.svc.create_planting(fx.planting(150.0)).await.unwrap();
        fx.svc.create_planting(fx.planting(200.0)).await.unwrap();

        // 300 + 200 fits in 700 once P's old 150 is not double-counted.
        let updated = fx
            .svc
            .update_planting(
                p.id,
                PlantingPatch {
                    area: Some(300.0),
                    ..PlantingPatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.area, 300.0);
        assert_eq!(fx.store.planting_count(), 2);
    }

    #[tokio::test]
    async fn should_reject_update_that_overflows_siblings() {
        let fx = fixture().await;
        let p = fx.svc.create_planting(fx.planting(150.0)).await.unwrap();
        fx.svc.create_planting(fx.planting(500.0)).await.unwrap();

        let result = fx
            .svc
            .update_planting(
                p.id,
                PlantingPatch {
                    area: Some(250.0),
                    ..PlantingPatch::default()
                },
            )
            .await;
        assert!(matches!(result, Err(LedgerError::Capacity(_))));
        assert_eq!(fx.svc.get_planting(p.id).await.unwrap().area, 150.0);
    }

    #[tokio::test]
    async fn should_return_not_found_for_unknown_crop() {
        let fx = fixture().await;
        let planting =
            CropPlanting::new(fx.farm_id, CropId::new(), fx.harvest_id, 10.0).unwrap();

        let result = fx.svc.create_planting(planting).await;
        assert!(matches!(
            result,
            Err(LedgerError::NotFound(NotFoundError { entity: "Crop", .. }))
        ));
        assert_eq!(fx.store.planting_count(), 0);
    }

    #[tokio::test]
    async fn should_return_not_found_when_moving_to_unknown_farm() {
        let fx = fixture().await;
        let p = fx.svc.create_planting(fx.planting(100.0)).await.unwrap();

        let result = fx
            .svc
            .update_planting(
                p.id,
                PlantingPatch {
                    farm_id: Some(FarmId::new()),
                    ..PlantingPatch::default()
                },
            )
            .await;
        assert!(matches!(
            result,
            Err(LedgerError::NotFound(NotFoundError { entity: "Farm", .. }))
        ));
    }

    #[tokio::test]
    async fn should_release_area_on_delete() {
        let fx = fixture().await;
        let p = fx.svc.create_planting(fx.planting(700.0)).await.unwrap();
        fx.svc.delete_planting(p.id).await.unwrap();

        fx.svc.create_planting(fx.planting(700.0)).await.unwrap();
    }

    #[tokio::test]
    async fn should_filter_plantings_by_harvest() {
        let fx = fixture().await;
        fx.svc.create_planting(fx.planting(100.0)).await.unwrap();

        let page = fx
            .svc
            .list_plantings(
                PlantingFilter {
                    harvest_id: Some(HarvestId::new()),
                    ..PlantingFilter::default()
                },
                PageRequest::default(),
            )
            .await
            .unwrap();
        assert_eq!(page.total, 0);
    }
}
