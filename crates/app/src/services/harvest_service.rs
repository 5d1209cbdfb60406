//! Harvest service — use-cases for harvest cycles.

use farmledger_domain::error::{ConflictError, LedgerError, NotFoundError};
use farmledger_domain::harvest::{Harvest, HarvestPatch};
use farmledger_domain::id::HarvestId;
use farmledger_domain::page::{Page, PageRequest};

use crate::ports::HarvestRepository;

/// Application service for harvest CRUD operations.
pub struct HarvestService<R> {
    repo: R,
}

impl<R: HarvestRepository> HarvestService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Create a new harvest with a unique name.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Validation`] for an empty name or a year out of
    /// range, [`LedgerError::Conflict`] if the name is taken, or a storage
    /// error.
    #[tracing::instrument(skip(self, harvest), fields(harvest_id = %harvest.id))]
    pub async fn create_harvest(&self, harvest: Harvest) -> Result<Harvest, LedgerError> {
        harvest.validate()?;
        self.ensure_name_free(&harvest.name, None).await?;
        let created = self.repo.create(harvest).await?;
        tracing::info!("harvest created");
        Ok(created)
    }

    /// Look up a harvest by id.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] when no harvest with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_harvest(&self, id: HarvestId) -> Result<Harvest, LedgerError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            tracing::warn!("harvest not found");
            NotFoundError {
                entity: "Harvest",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List harvests, most recent year first.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_harvests(&self, page: PageRequest) -> Result<Page<Harvest>, LedgerError> {
        self.repo.list(page).await
    }

    /// Apply a partial update to an existing harvest.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`], [`LedgerError::Validation`],
    /// [`LedgerError::Conflict`] or a storage error.
    #[tracing::instrument(skip(self, patch))]
    pub async fn update_harvest(
        &self,
        id: HarvestId,
        patch: HarvestPatch,
    ) -> Result<Harvest, LedgerError> {
        let existing = self.get_harvest(id).await?;
        let candidate = existing.merge(patch);
        candidate.validate()?;
        if candidate.name != existing.name {
            self.ensure_name_free(&candidate.name, Some(id)).await?;
        }
        let updated = self.repo.update(candidate).await?;
        tracing::info!("harvest updated");
        Ok(updated)
    }

    /// Delete a harvest by id, together with its plantings.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if the harvest does not exist,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn delete_harvest(&self, id: HarvestId) -> Result<(), LedgerError> {
        self.get_harvest(id).await?;
        self.repo.delete(id).await?;
        tracing::info!("harvest deleted");
        Ok(())
    }

    async fn ensure_name_free(
        &self,
        name: &str,
        owner: Option<HarvestId>,
    ) -> Result<(), LedgerError> {
        match self.repo.find_by_name(name).await? {
            Some(other) if Some(other.id) != owner => {
                tracing::warn!(name, "duplicate harvest name");
                Err(ConflictError::DuplicateName {
                    entity: "Harvest",
                    name: name.to_string(),
                }
                .into())
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStore;
    use farmledger_domain::error::ValidationError;

    fn make_service() -> HarvestService<MemoryStore> {
        HarvestService::new(MemoryStore::default())
    }

    #[tokio::test]
    async fn should_list_harvests_most_recent_first() {
        let svc = make_service();
        svc.create_harvest(Harvest::new("Safra 2022", 2022).unwrap())
            .await
            .unwrap();
        svc.create_harvest(Harvest::new("Safra 2024", 2024).unwrap())
            .await
            .unwrap();
        svc.create_harvest(Harvest::new("Safra 2023", 2023).unwrap())
            .await
            .unwrap();

        let page = svc.list_harvests(PageRequest::default()).await.unwrap();
        let years: Vec<i32> = page.data.iter().map(|h| h.year).collect();
        assert_eq!(years, vec![2024, 2023, 2022]);
    }

    #[tokio::test]
    async fn should_reject_duplicate_name() {
        let svc = make_service();
        svc.create_harvest(Harvest::new("Safra 2024", 2024).unwrap())
            .await
            .unwrap();

        let result = svc
            .create_harvest(Harvest::new("Safra 2024", 2025).unwrap())
            .await;
        assert!(matches!(
            result,
            Err(LedgerError::Conflict(ConflictError::DuplicateName {
                entity: "Harvest",
                ..
            }))
        ));
    }

    #[tokio::test]
    async fn should_reject_update_with_year_out_of_range() {
        let svc = make_service();
        let created = svc
            .create_harvest(Harvest::new("Safra 2024", 2024).unwrap())
            .await
            .unwrap();

        let result = svc
            .update_harvest(
                created.id,
                HarvestPatch {
                    year: Some(1850),
                    ..HarvestPatch::default()
                },
            )
            .await;
        assert!(matches!(
            result,
            Err(LedgerError::Validation(ValidationError::YearOutOfRange { .. }))
        ));
    }

    #[tokio::test]
    async fn should_keep_name_when_only_year_changes() {
        let svc = make_service();
        let created = svc
            .create_harvest(Harvest::new("Safra 2024", 2024).unwrap())
            .await
            .unwrap();

        let updated = svc
            .update_harvest(
                created.id,
                HarvestPatch {
                    year: Some(2025),
                    ..HarvestPatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Safra 2024");
        assert_eq!(updated.year, 2025);
    }
}
