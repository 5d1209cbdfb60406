//! Shared application state for axum handlers.

use std::sync::Arc;

use farmledger_app::ports::{
    CropRepository, FarmRepository, HarvestRepository, PlantingRepository, ProducerRepository,
};
use farmledger_app::services::crop_service::CropService;
use farmledger_app::services::farm_service::FarmService;
use farmledger_app::services::harvest_service::HarvestService;
use farmledger_app::services::planting_service::PlantingService;
use farmledger_app::services::producer_service::ProducerService;

/// Application state shared across all axum handlers.
///
/// Generic over the five repository types to avoid dynamic dispatch.
/// `Clone` is implemented manually so the underlying types themselves do not
/// need to be `Clone`; only the `Arc` wrappers are cloned.
pub struct AppState<PR, FR, CR, HR, PLR> {
    /// Producer CRUD service.
    pub producer_service: Arc<ProducerService<PR>>,
    /// Farm CRUD service; checks the owning producer.
    pub farm_service: Arc<FarmService<FR, PR>>,
    /// Crop catalogue service.
    pub crop_service: Arc<CropService<CR>>,
    /// Harvest cycle service.
    pub harvest_service: Arc<HarvestService<HR>>,
    /// Planting service; enforces farm capacity.
    pub planting_service: Arc<PlantingService<PLR, FR, CR, HR>>,
}

impl<PR, FR, CR, HR, PLR> Clone for AppState<PR, FR, CR, HR, PLR> {
    fn clone(&self) -> Self {
        Self {
            producer_service: Arc::clone(&self.producer_service),
            farm_service: Arc::clone(&self.farm_service),
            crop_service: Arc::clone(&self.crop_service),
            harvest_service: Arc::clone(&self.harvest_service),
            planting_service: Arc::clone(&self.planting_service),
        }
    }
}

impl<PR, FR, CR, HR, PLR> AppState<PR, FR, CR, HR, PLR>
where
    PR: ProducerRepository + Send + Sync + 'static,
    FR: FarmRepository + Send + Sync + 'static,
    CR: CropRepository + Send + Sync + 'static,
    HR: HarvestRepository + Send + Sync + 'static,
    PLR: PlantingRepository + Send + Sync + 'static,
{
    /// Create a new application state from service instances.
    pub fn new(
        producer_service: ProducerService<PR>,
        farm_service: FarmService<FR, PR>,
        crop_service: CropService<CR>,
        harvest_service: HarvestService<HR>,
        planting_service: PlantingService<PLR, FR, CR, HR>,
    ) -> Self {
        Self {
            producer_service: Arc::new(producer_service),
            farm_service: Arc::new(farm_service),
            crop_service: Arc::new(crop_service),
            harvest_service: Arc::new(harvest_service),
            planting_service: Arc::new(planting_service),
        }
    }
}
