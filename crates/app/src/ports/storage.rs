//! Storage port — repository traits for persistence.
//!
//! Lookups return `Ok(None)` for a missing row; the services turn that into
//! [`NotFoundError`](farmledger_domain::error::NotFoundError). Uniqueness
//! violations detected by storage surface as [`LedgerError::Conflict`].

use std::future::Future;

use farmledger_domain::crop::Crop;
use farmledger_domain::document::Document;
use farmledger_domain::error::LedgerError;
use farmledger_domain::farm::Farm;
use farmledger_domain::harvest::Harvest;
use farmledger_domain::id::{CropId, FarmId, HarvestId, PlantingId, ProducerId};
use farmledger_domain::page::{Page, PageRequest};
use farmledger_domain::planting::CropPlanting;
use farmledger_domain::producer::Producer;

/// Repository for persisting and querying [`Producer`]s.
pub trait ProducerRepository {
    /// Create a new producer in storage.
    fn create(&self, producer: Producer)
    -> impl Future<Output = Result<Producer, LedgerError>> + Send;

    /// Get a producer by its unique identifier.
    fn get_by_id(
        &self,
        id: ProducerId,
    ) -> impl Future<Output = Result<Option<Producer>, LedgerError>> + Send;

    /// Find the producer holding `document`, if any.
    fn find_by_document(
        &self,
        document: &Document,
    ) -> impl Future<Output = Result<Option<Producer>, LedgerError>> + Send;

    /// List producers ordered by name.
    fn list(
        &self,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<Producer>, LedgerError>> + Send;

    /// Update an existing producer.
    fn update(&self, producer: Producer)
    -> impl Future<Output = Result<Producer, LedgerError>> + Send;

    /// Delete a producer and, by cascade, its farms and their plantings.
    fn delete(&self, id: ProducerId) -> impl Future<Output = Result<(), LedgerError>> + Send;
}

/// Optional filters for [`FarmRepository::list`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FarmFilter {
    pub producer_id: Option<ProducerId>,
    pub state: Option<String>,
}

/// Repository for persisting and querying [`Farm`]s.
pub trait FarmRepository {
    /// Create a new farm in storage.
    fn create(&self, farm: Farm) -> impl Future<Output = Result<Farm, LedgerError>> + Send;

    /// Get a farm by its unique identifier.
    fn get_by_id(&self, id: FarmId)
    -> impl Future<Output = Result<Option<Farm>, LedgerError>> + Send;

    /// List farms matching `filter`, ordered by name.
    fn list(
        &self,
        filter: FarmFilter,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<Farm>, LedgerError>> + Send;

    /// Update an existing farm.
    ///
    /// Runs as one serialized unit of work: the summed planting area of
    /// every harvest on the farm is re-read and checked against the new
    /// cultivable area with
    /// [`check_allocated`](farmledger_domain::planting::check_allocated)
    /// before the row is written.
    fn update(&self, farm: Farm) -> impl Future<Output = Result<Farm, LedgerError>> + Send;

    /// Delete a farm and, by cascade, its plantings.
    fn delete(&self, id: FarmId) -> impl Future<Output = Result<(), LedgerError>> + Send;
}

/// Repository for persisting and querying [`Crop`]s.
pub trait CropRepository {
    fn create(&self, crop: Crop) -> impl Future<Output = Result<Crop, LedgerError>> + Send;

    fn get_by_id(&self, id: CropId)
    -> impl Future<Output = Result<Option<Crop>, LedgerError>> + Send;

    /// Find the crop called exactly `name`, if any.
    fn find_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Crop>, LedgerError>> + Send;

    /// List crops ordered by name.
    fn list(&self, page: PageRequest)
    -> impl Future<Output = Result<Page<Crop>, LedgerError>> + Send;

    fn update(&self, crop: Crop) -> impl Future<Output = Result<Crop, LedgerError>> + Send;

    fn delete(&self, id: CropId) -> impl Future<Output = Result<(), LedgerError>> + Send;
}

/// Repository for persisting and querying [`Harvest`]s.
pub trait HarvestRepository {
    fn create(&self, harvest: Harvest)
    -> impl Future<Output = Result<Harvest, LedgerError>> + Send;

    fn get_by_id(
        &self,
        id: HarvestId,
    ) -> impl Future<Output = Result<Option<Harvest>, LedgerError>> + Send;

    /// Find the harvest called exactly `name`, if any.
    fn find_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Harvest>, LedgerError>> + Send;

    /// List harvests, most recent year first.
    fn list(
        &self,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<Harvest>, LedgerError>> + Send;

    fn update(&self, harvest: Harvest)
    -> impl Future<Output = Result<Harvest, LedgerError>> + Send;

    fn delete(&self, id: HarvestId) -> impl Future<Output = Result<(), LedgerError>> + Send;
}

/// How a capacity reservation writes its planting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reservation {
    /// Insert a new row; every existing sibling counts.
    Insert,
    /// Overwrite the row with the same id; that row is not its own sibling.
    Update,
}

/// Optional filters for [`PlantingRepository::list`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlantingFilter {
    pub farm_id: Option<FarmId>,
    pub crop_id: Option<CropId>,
    pub harvest_id: Option<HarvestId>,
}

/// Repository for persisting and querying [`CropPlanting`]s.
pub trait PlantingRepository {
    /// Atomically check capacity and write `planting`.
    ///
    /// Within one serialized unit of work per `(farm_id, harvest_id)`:
    /// load the farm's cultivable area, load the sibling allocations,
    /// drop `planting.id` from them, run
    /// [`check_capacity`](farmledger_domain::planting::check_capacity), and
    /// only then insert or update. Concurrent reservations on the same pair
    /// can never both pass against the same sibling set.
    ///
    /// Returns [`LedgerError::NotFound`] if the farm vanished, or
    /// [`LedgerError::Capacity`] if the allocation does not fit.
    fn reserve(
        &self,
        planting: CropPlanting,
        mode: Reservation,
    ) -> impl Future<Output = Result<CropPlanting, LedgerError>> + Send;

    fn get_by_id(
        &self,
        id: PlantingId,
    ) -> impl Future<Output = Result<Option<CropPlanting>, LedgerError>> + Send;

    /// List plantings matching `filter`, newest first.
    fn list(
        &self,
        filter: PlantingFilter,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<CropPlanting>, LedgerError>> + Send;

    fn delete(&self, id: PlantingId) -> impl Future<Output = Result<(), LedgerError>> + Send;
}
