//! In-memory implementations of every storage port, for service tests.
//!
//! One mutex guards all tables, so `reserve` and farm `update` are trivially
//! serialized, matching the contract the `SQLite` adapter meets with
//! transactions.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use farmledger_domain::crop::Crop;
use farmledger_domain::document::Document;
use farmledger_domain::error::{ConflictError, LedgerError, NotFoundError};
use farmledger_domain::farm::Farm;
use farmledger_domain::harvest::Harvest;
use farmledger_domain::id::{CropId, FarmId, HarvestId, PlantingId, ProducerId};
use farmledger_domain::page::{Page, PageRequest};
use farmledger_domain::planting::{
    Allocation, CropPlanting, check_allocated, check_capacity, sibling_areas,
};
use farmledger_domain::producer::Producer;

use crate::ports::{
    CropRepository, FarmFilter, FarmRepository, HarvestRepository, PlantingFilter,
    PlantingRepository, ProducerRepository, Reservation,
};

#[derive(Default)]
struct Tables {
    producers: HashMap<ProducerId, Producer>,
    farms: HashMap<FarmId, Farm>,
    crops: HashMap<CropId, Crop>,
    harvests: HashMap<HarvestId, Harvest>,
    plantings: HashMap<PlantingId, CropPlanting>,
}

/// Shared handle; clones see the same tables.
#[derive(Clone, Default)]
pub struct MemoryStore(Arc<Mutex<Tables>>);

impl MemoryStore {
    pub fn planting_count(&self) -> usize {
        self.0.lock().unwrap().plantings.len()
    }
}

fn paginate<T>(mut items: Vec<T>, page: PageRequest) -> Page<T> {
    let total = items.len() as u64;
    let start = usize::try_from(page.offset()).unwrap().min(items.len());
    let end = (start + page.limit as usize).min(items.len());
    let data = items.drain(start..end).collect();
    Page::new(data, total, page)
}

impl ProducerRepository for MemoryStore {
    fn create(
        &self,
        producer: Producer,
    ) -> impl Future<Output = Result<Producer, LedgerError>> + Send {
        let mut tables = self.0.lock().unwrap();
        let result = if tables
            .producers
            .values()
            .any(|p| p.document == producer.document)
        {
            Err(ConflictError::DuplicateDocument(producer.document.to_string()).into())
        } else {
            tables.producers.insert(producer.id, producer.clone());
            Ok(producer)
        };
        async { result }
    }

    fn get_by_id(
        &self,
        id: ProducerId,
    ) -> impl Future<Output = Result<Option<Producer>, LedgerError>> + Send {
        let result = self.0.lock().unwrap().producers.get(&id).cloned();
        async { Ok(result) }
    }

    fn find_by_document(
        &self,
        document: &Document,
    ) -> impl Future<Output = Result<Option<Producer>, LedgerError>> + Send {
        let result = self
            .0
            .lock()
            .unwrap()
            .producers
            .values()
            .find(|p| &p.document == document)
            .cloned();
        async { Ok(result) }
    }

    fn list(
        &self,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<Producer>, LedgerError>> + Send {
        let mut all: Vec<Producer> = self.0.lock().unwrap().producers.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        let result = paginate(all, page);
        async { Ok(result) }
    }

    fn update(
        &self,
        producer: Producer,
    ) -> impl Future<Output = Result<Producer, LedgerError>> + Send {
        self.0
            .lock()
            .unwrap()
            .producers
            .insert(producer.id, producer.clone());
        async { Ok(producer) }
    }

    fn delete(&self, id: ProducerId) -> impl Future<Output = Result<(), LedgerError>> + Send {
        let mut tables = self.0.lock().unwrap();
        tables.producers.remove(&id);
        let farms: Vec<FarmId> = tables
            .farms
            .values()
            .filter(|f| f.producer_id == id)
            .map(|f| f.id)
            .collect();
        for farm_id in &farms {
            tables.farms.remove(farm_id);
        }
        tables.plantings.retain(|_, p| !farms.contains(&p.farm_id));
        async { Ok(()) }
    }
}

impl FarmRepository for MemoryStore {
    fn create(&self, farm: Farm) -> impl Future<Output = Result<Farm, LedgerError>> + Send {
        self.0.lock().unwrap().farms.insert(farm.id, farm.clone());
        async { Ok(farm) }
    }

    fn get_by_id(
        &self,
        id: FarmId,
    ) -> impl Future<Output = Result<Option<Farm>, LedgerError>> + Send {
        let result = self.0.lock().unwrap().farms.get(&id).cloned();
        async { Ok(result) }
    }

    fn list(
        &self,
        filter: FarmFilter,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<Farm>, LedgerError>> + Send {
        let mut all: Vec<Farm> = self
            .0
            .lock()
            .unwrap()
            .farms
            .values()
            .filter(|f| filter.producer_id.is_none_or(|id| f.producer_id == id))
            .filter(|f| filter.state.as_ref().is_none_or(|s| &f.state == s))
            .cloned()
            .collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        let result = paginate(all, page);
        async { Ok(result) }
    }

    fn update(&self, farm: Farm) -> impl Future<Output = Result<Farm, LedgerError>> + Send {
        let mut tables = self.0.lock().unwrap();
        let mut totals: HashMap<HarvestId, f64> = HashMap::new();
        for planting in tables.plantings.values().filter(|p| p.farm_id == farm.id) {
            *totals.entry(planting.harvest_id).or_default() += planting.area;
        }
        let totals: Vec<f64> = totals.into_values().collect();
        let result = match check_allocated(farm.cultivable_area, &totals) {
            Ok(()) => {
                tables.farms.insert(farm.id, farm.clone());
                Ok(farm)
            }
            Err(err) => Err(err.into()),
        };
        async { result }
    }

    fn delete(&self, id: FarmId) -> impl Future<Output = Result<(), LedgerError>> + Send {
        let mut tables = self.0.lock().unwrap();
        tables.farms.remove(&id);
        tables.plantings.retain(|_, p| p.farm_id != id);
        async { Ok(()) }
    }
}

impl CropRepository for MemoryStore {
    fn create(&self, crop: Crop) -> impl Future<Output = Result<Crop, LedgerError>> + Send {
        self.0.lock().unwrap().crops.insert(crop.id, crop.clone());
        async { Ok(crop) }
    }

    fn get_by_id(
        &self,
        id: CropId,
    ) -> impl Future<Output = Result<Option<Crop>, LedgerError>> + Send {
        let result = self.0.lock().unwrap().crops.get(&id).cloned();
        async { Ok(result) }
    }

    fn find_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Crop>, LedgerError>> + Send {
        let result = self
            .0
            .lock()
            .unwrap()
            .crops
            .values()
            .find(|c| c.name == name)
            .cloned();
        async { Ok(result) }
    }

    fn list(
        &self,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<Crop>, LedgerError>> + Send {
        let mut all: Vec<Crop> = self.0.lock().unwrap().crops.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        let result = paginate(all, page);
        async { Ok(result) }
    }

    fn update(&self, crop: Crop) -> impl Future<Output = Result<Crop, LedgerError>> + Send {
        self.0.lock().unwrap().crops.insert(crop.id, crop.clone());
        async { Ok(crop) }
    }

    fn delete(&self, id: CropId) -> impl Future<Output = Result<(), LedgerError>> + Send {
        let mut tables = self.0.lock().unwrap();
        tables.crops.remove(&id);
        tables.plantings.retain(|_, p| p.crop_id != id);
        async { Ok(()) }
    }
}

impl HarvestRepository for MemoryStore {
    fn create(
        &self,
        harvest: Harvest,
    ) -> impl Future<Output = Result<Harvest, LedgerError>> + Send {
        self.0
            .lock()
            .unwrap()
            .harvests
            .insert(harvest.id, harvest.clone());
        async { Ok(harvest) }
    }

    fn get_by_id(
        &self,
        id: HarvestId,
    ) -> impl Future<Output = Result<Option<Harvest>, LedgerError>> + Send {
        let result = self.0.lock().unwrap().harvests.get(&id).cloned();
        async { Ok(result) }
    }

    fn find_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Harvest>, LedgerError>> + Send {
        let result = self
            .0
            .lock()
            .unwrap()
            .harvests
            .values()
            .find(|h| h.name == name)
            .cloned();
        async { Ok(result) }
    }

    fn list(
        &self,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<Harvest>, LedgerError>> + Send {
        let mut all: Vec<Harvest> = self.0.lock().unwrap().harvests.values().cloned().collect();
        all.sort_by(|a, b| b.year.cmp(&a.year));
        let result = paginate(all, page);
        async { Ok(result) }
    }

    fn update(
        &self,
        harvest: Harvest,
    ) -> impl Future<Output = Result<Harvest, LedgerError>> + Send {
        self.0
            .lock()
            .unwrap()
            .harvests
            .insert(harvest.id, harvest.clone());
        async { Ok(harvest) }
    }

    fn delete(&self, id: HarvestId) -> impl Future<Output = Result<(), LedgerError>> + Send {
        let mut tables = self.0.lock().unwrap();
        tables.harvests.remove(&id);
        tables.plantings.retain(|_, p| p.harvest_id != id);
        async { Ok(()) }
    }
}

impl PlantingRepository for MemoryStore {
    fn reserve(
        &self,
        planting: CropPlanting,
        mode: Reservation,
    ) -> impl Future<Output = Result<CropPlanting, LedgerError>> + Send {
        let mut tables = self.0.lock().unwrap();
        let result = match tables.farms.get(&planting.farm_id) {
            None => Err(NotFoundError {
                entity: "Farm",
                id: planting.farm_id.to_string(),
            }
            .into()),
            Some(farm) => {
                let allocations: Vec<Allocation> = tables
                    .plantings
                    .values()
                    .filter(|p| p.farm_id == planting.farm_id && p.harvest_id == planting.harvest_id)
                    .map(|p| Allocation {
                        id: p.id,
                        area: p.area,
                    })
                    .collect();
                let exclude = (mode == Reservation::Update).then_some(planting.id);
                let siblings = sibling_areas(&allocations, exclude);
                check_capacity(farm.cultivable_area, planting.area, &siblings)
                    .map_err(LedgerError::from)
            }
        };
        let result = result.map(|()| {
            tables.plantings.insert(planting.id, planting.clone());
            planting
        });
        async { result }
    }

    fn get_by_id(
        &self,
        id: PlantingId,
    ) -> impl Future<Output = Result<Option<CropPlanting>, LedgerError>> + Send {
        let result = self.0.lock().unwrap().plantings.get(&id).cloned();
        async { Ok(result) }
    }

    fn list(
        &self,
        filter: PlantingFilter,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<CropPlanting>, LedgerError>> + Send {
        let mut all: Vec<CropPlanting> = self
            .0
            .lock()
            .unwrap()
            .plantings
            .values()
            .filter(|p| filter.farm_id.is_none_or(|id| p.farm_id == id))
            .filter(|p| filter.crop_id.is_none_or(|id| p.crop_id == id))
            .filter(|p| filter.harvest_id.is_none_or(|id| p.harvest_id == id))
            .cloned()
            .collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let result = paginate(all, page);
        async { Ok(result) }
    }

    fn delete(&self, id: PlantingId) -> impl Future<Output = Result<(), LedgerError>> + Send {
        self.0.lock().unwrap().plantings.remove(&id);
        async { Ok(()) }
    }
}
