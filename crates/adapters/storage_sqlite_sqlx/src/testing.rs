//! Shared fixtures for repository tests.

use sqlx::SqlitePool;

use farmledger_app::ports::{
    CropRepository, FarmRepository, HarvestRepository, PlantingRepository, ProducerRepository,
    Reservation,
};
use farmledger_domain::crop::Crop;
use farmledger_domain::farm::Farm;
use farmledger_domain::harvest::Harvest;
use farmledger_domain::id::{CropId, HarvestId};
use farmledger_domain::planting::CropPlanting;
use farmledger_domain::producer::Producer;

use crate::pool::Config;
use crate::{
    SqliteCropRepository, SqliteFarmRepository, SqliteHarvestRepository,
    SqlitePlantingRepository, SqliteProducerRepository,
};

/// A migrated database holding one producer, one farm (1000 ha total,
/// 700 ha cultivable), one crop and one harvest.
pub struct Seed {
    pub pool: SqlitePool,
    pub farm: Farm,
    pub crop_id: CropId,
    pub harvest_id: HarvestId,
}

impl Seed {
    pub async fn new(config: Config) -> Self {
        let db = config.build().await.unwrap();
        let pool = db.pool().clone();

        let producer = Producer::builder()
            .document("11144477735")
            .name("João da Silva")
            .build()
            .unwrap();
        let farm = Farm::builder()
            .producer_id(producer.id)
            .name("Boa Vista")
            .city("Uberlândia")
            .state("MG")
            .areas(1000.0, 700.0, 300.0)
            .build()
            .unwrap();
        let crop = Crop::new("Soja").unwrap();
        let harvest = Harvest::new("Safra 2024", 2024).unwrap();
        let (crop_id, harvest_id) = (crop.id, harvest.id);

        SqliteProducerRepository::new(pool.clone())
            .create(producer)
            .await
            .unwrap();
        SqliteFarmRepository::new(pool.clone())
            .create(farm.clone())
            .await
            .unwrap();
        SqliteCropRepository::new(pool.clone())
            .create(crop)
            .await
            .unwrap();
        SqliteHarvestRepository::new(pool.clone())
            .create(harvest)
            .await
            .unwrap();

        Self {
            pool,
            farm,
            crop_id,
            harvest_id,
        }
    }

    /// An unsaved planting on the seeded farm, crop and harvest.
    pub fn planting(&self, area: f64) -> CropPlanting {
        CropPlanting::new(self.farm.id, self.crop_id, self.harvest_id, area).unwrap()
    }

    /// Reserve a planting of `area` hectares and return it.
    pub async fn plant(&self, area: f64) -> CropPlanting {
        SqlitePlantingRepository::new(self.pool.clone())
            .reserve(self.planting(area), Reservation::Insert)
            .await
            .unwrap()
    }
}
