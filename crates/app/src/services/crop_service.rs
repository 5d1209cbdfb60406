//! Crop service — use-cases for the crop catalogue.

use farmledger_domain::crop::{Crop, CropPatch};
use farmledger_domain::error::{ConflictError, LedgerError, NotFoundError};
use farmledger_domain::id::CropId;
use farmledger_domain::page::{Page, PageRequest};

use crate::ports::CropRepository;

/// Application service for crop CRUD operations.
pub struct CropService<R> {
    repo: R,
}

impl<R: CropRepository> CropService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Create a new crop with a unique name.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Validation`] for an empty name,
    /// [`LedgerError::Conflict`] if the name is taken, or a storage error.
    #[tracing::instrument(skip(self, crop), fields(crop_id = %crop.id))]
    pub async fn create_crop(&self, crop: Crop) -> Result<Crop, LedgerError> {
        crop.validate()?;
        self.ensure_name_free(&crop.name, None).await?;
        let created = self.repo.create(crop).await?;
        tracing::info!("crop created");
        Ok(created)
    }

    /// Look up a crop by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] when no crop with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_crop(&self, id: CropId) -> Result<Crop, LedgerError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            tracing::warn!("crop not found");
            NotFoundError {
                entity: "Crop",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List crops, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_crops(&self, page: PageRequest) -> Result<Page<Crop>, LedgerError> {
        self.repo.list(page).await
    }

    /// Rename a crop.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`], [`LedgerError::Validation`],
    /// [`LedgerError::Conflict`] or a storage error.
    #[tracing::instrument(skip(self, patch))]
    pub async fn update_crop(&self, id: CropId, patch: CropPatch) -> Result<Crop, LedgerError> {
        let existing = self.get_crop(id).await?;
        let candidate = existing.merge(patch);
        candidate.validate()?;
        if candidate.name != existing.name {
            self.ensure_name_free(&candidate.name, Some(id)).await?;
        }
        let updated = self.repo.update(candidate).await?;
        tracing::info!("crop updated");
        Ok(updated)
    }

    /// Delete a crop by id, together with its plantings.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if the crop does not exist,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn delete_crop(&self, id: CropId) -> Result<(), LedgerError> {
        self.get_crop(id).await?;
        self.repo.delete(id).await?;
        tracing::info!("crop deleted");
        Ok(())
    }

    async fn ensure_name_free(&self, name: &str, owner: Option<CropId>) -> Result<(), LedgerError> {
        match self.repo.find_by_name(name).await? {
            Some(other) if Some(other.id) != owner => {
                tracing::warn!(name, "duplicate crop name");
                Err(ConflictError::DuplicateName {
                    entity: "Crop",
                    name: name.to_string(),
                }
                .into())
            }
            _ => Ok(()),
        }
    }
}
