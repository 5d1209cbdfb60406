//! Farm service — use-cases for managing farms and their land areas.

use farmledger_domain::error::{LedgerError, NotFoundError};
use farmledger_domain::farm::{Farm, FarmPatch};
use farmledger_domain::id::{FarmId, ProducerId};
use farmledger_domain::page::{Page, PageRequest};

use crate::ports::{FarmFilter, FarmRepository, ProducerRepository};

/// Application service for farm CRUD operations.
pub struct FarmService<F, P> {
    farms: F,
    producers: P,
}

impl<F, P> FarmService<F, P>
where
    F: FarmRepository,
    P: ProducerRepository,
{
    /// Create a new service backed by the given repositories.
    pub fn new(farms: F, producers: P) -> Self {
        Self { farms, producers }
    }

    /// Create a new farm once its producer exists and its areas add up.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if the producer does not exist,
    /// [`LedgerError::Validation`] if the area invariant fails, or a
    /// storage error propagated from the repository.
    #[tracing::instrument(skip(self, farm), fields(farm_id = %farm.id))]
    pub async fn create_farm(&self, farm: Farm) -> Result<Farm, LedgerError> {
        self.ensure_producer(farm.producer_id).await?;
        farm.validate().inspect_err(|err| {
            tracing::warn!(%err, "farm rejected");
        })?;
        let created = self.farms.create(farm).await?;
        tracing::info!("farm created");
        Ok(created)
    }

    /// Look up a farm by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] when no farm with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_farm(&self, id: FarmId) -> Result<Farm, LedgerError> {
        self.farms.get_by_id(id).await?.ok_or_else(|| {
            tracing::warn!("farm not found");
            NotFoundError {
                entity: "Farm",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List farms, optionally filtered by producer and state.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_farms(
        &self,
        filter: FarmFilter,
        page: PageRequest,
    ) -> Result<Page<Farm>, LedgerError> {
        self.farms.list(filter, page).await
    }

    /// Apply a partial update to an existing farm.
    ///
    /// The patch is merged into the stored record first and the whole
    /// candidate is validated, so a change to any one area is checked
    /// against the other two.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if the farm or a newly referenced
    /// producer does not exist, [`LedgerError::Validation`] if the merged
    /// record breaks the area invariant, [`LedgerError::Capacity`] if the new
    /// cultivable area is smaller than what is already planted, or a storage
    /// error from the repository.
    #[tracing::instrument(skip(self, patch))]
    pub async fn update_farm(&self, id: FarmId, patch: FarmPatch) -> Result<Farm, LedgerError> {
        let existing = self.get_farm(id).await?;
        if let Some(producer_id) = patch.producer_id {
            self.ensure_producer(producer_id).await?;
        }
        let candidate = existing.merge(patch);
        candidate.validate().inspect_err(|err| {
            tracing::warn!(%err, "farm update rejected");
        })?;
        let updated = self.farms.update(candidate).await.inspect_err(|err| {
            tracing::warn!(%err, "farm update rejected by storage");
        })?;
        tracing::info!("farm updated");
        Ok(updated)
    }

    /// Delete a farm by id. Its plantings go with it.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if the farm does not exist,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn delete_farm(&self, id: FarmId) -> Result<(), LedgerError> {
        self.get_farm(id).await?;
        self.farms.delete(id).await?;
        tracing::info!("farm deleted");
        Ok(())
    }

    async fn ensure_producer(&self, id: ProducerId) -> Result<(), LedgerError> {
        if self.producers.get_by_id(id).await?.is_none() {
            tracing::warn!(producer_id = %id, "farm references unknown producer");
            return Err(NotFoundError {
                entity: "Producer",
                id: id.to_string(),
            }
            .into());
        }
        Ok(())
    }
}
