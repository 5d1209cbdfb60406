//! Producer service — use-cases for managing rural producers.

use farmledger_domain::document::Document;
use farmledger_domain::error::{ConflictError, LedgerError, NotFoundError};
use farmledger_domain::id::ProducerId;
use farmledger_domain::page::{Page, PageRequest};
use farmledger_domain::producer::{Producer, ProducerPatch};

use crate::ports::ProducerRepository;

/// Application service for producer CRUD operations.
pub struct ProducerService<R> {
    repo: R,
}

impl<R: ProducerRepository> ProducerService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Create a new producer after validating its document and name.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Validation`] if invariants fail,
    /// [`LedgerError::Conflict`] if the document is already registered, or a
    /// storage error propagated from the repository.
    #[tracing::instrument(skip(self, producer), fields(producer_id = %producer.id))]
    pub async fn create_producer(&self, producer: Producer) -> Result<Producer, LedgerError> {
        producer.validate()?;
        self.ensure_document_free(&producer.document, None).await?;
        let created = self.repo.create(producer).await?;
        tracing::info!("producer created");
        Ok(created)
    }

    /// Look up a producer by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] when no producer with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_producer(&self, id: ProducerId) -> Result<Producer, LedgerError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            tracing::warn!("producer not found");
            NotFoundError {
                entity: "Producer",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List producers, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_producers(&self, page: PageRequest) -> Result<Page<Producer>, LedgerError> {
        self.repo.list(page).await
    }

    /// Apply a partial update to an existing producer.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if the producer does not exist,
    /// [`LedgerError::Validation`] if the merged record is invalid,
    /// [`LedgerError::Conflict`] if another producer holds the new document,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self, patch))]
    pub async fn update_producer(
        &self,
        id: ProducerId,
        patch: ProducerPatch,
    ) -> Result<Producer, LedgerError> {
        let existing = self.get_producer(id).await?;
        let document_changed = patch.document.is_some();
        let candidate = existing.merge(patch)?;
        candidate.validate()?;
        if document_changed {
            self.ensure_document_free(&candidate.document, Some(id))
                .await?;
        }
        let updated = self.repo.update(candidate).await?;
        tracing::info!("producer updated");
        Ok(updated)
    }

    /// Delete a producer by id. Its farms and plantings go with it.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if the producer does not exist,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn delete_producer(&self, id: ProducerId) -> Result<(), LedgerError> {
        self.get_producer(id).await?;
        self.repo.delete(id).await?;
        tracing::info!("producer deleted");
        Ok(())
    }

    async fn ensure_document_free(
        &self,
        document: &Document,
        owner: Option<ProducerId>,
    ) -> Result<(), LedgerError> {
        match self.repo.find_by_document(document).await? {
            Some(other) if Some(other.id) != owner => {
                tracing::warn!(%document, "duplicate producer document");
                Err(ConflictError::DuplicateDocument(document.formatted()).into())
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

    fn make_service() -> ProducerService<MemoryStore> {
        ProducerService::new(MemoryStore::default())
    }

    fn producer(document: &str, name: &str) -> Producer {
        Producer::builder()
            .document(document)
            .name(name)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn should_create_producer_when_valid() {
        let svc = make_service();
        let created = svc
            .create_producer(producer("111.444.777-35", "João da Silva"))
            .await
            .unwrap();

        let fetched = svc.get_producer(created.id).await.unwrap();
        assert_eq!(fetched.document.as_str(), "11144477735");
    }

    #[tokio::test]
    async fn should_reject_duplicate_document_regardless_of_formatting() {
        let svc = make_service();
        svc.create_producer(producer("11144477735", "João da Silva"))
            .await
            .unwrap();

        let result = svc
            .create_producer(producer("111.444.777-35", "Maria Souza"))
            .await;
        assert!(matches!(
            result,
            Err(LedgerError::Conflict(ConflictError::DuplicateDocument(_)))
        ));
    }

    #[tokio::test]
    async fn should_return_not_found_when_producer_missing() {
        let svc = make_service();
        let result = svc.get_producer(ProducerId::new()).await;
        assert!(matches!(result, Err(LedgerError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_update_name_and_keep_document() {
        let svc = make_service();
        let created = svc
            .create_producer(producer("11144477735", "João da Silva"))
            .await
            .unwrap();

        let updated = svc
            .update_producer(
                created.id,
                ProducerPatch {
                    name: Some("João S. Filho".to_string()),
                    ..ProducerPatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "João S. Filho");
        assert_eq!(updated.document, created.document);
    }

    #[tokio::test]
    async fn should_allow_resubmitting_own_document_on_update() {
        let svc = make_service();
        let created = svc
            .create_producer(producer("11144477735", "João da Silva"))
            .await
            .unwrap();

        let result = svc
            .update_producer(
                created.id,
                ProducerPatch {
                    document: Some("111.444.777-35".to_string()),
                    ..ProducerPatch::default()
                },
            )
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn should_reject_update_to_document_of_another_producer() {
        let svc = make_service();
        svc.create_producer(producer("11144477735", "João da Silva"))
            .await
            .unwrap();
        let other = svc
            .create_producer(producer("11222333000181", "Agro Ltda"))
            .await
            .unwrap();

        let result = svc
            .update_producer(
                other.id,
                ProducerPatch {
                    document: Some("11144477735".to_string()),
                    ..ProducerPatch::default()
                },
            )
            .await;
        assert!(matches!(result, Err(LedgerError::Conflict(_))));
    }

    #[tokio::test]
    async fn should_reject_update_with_malformed_document() {
        let svc = make_service();
        let created = svc
            .create_producer(producer("11144477735", "João da Silva"))
            .await
            .unwrap();

        let result = svc
            .update_producer(
                created.id,
                ProducerPatch {
                    document: Some("11111111111".to_string()),
                    ..ProducerPatch::default()
                },
            )
            .await;
        assert!(matches!(
            result,
            Err(LedgerError::Validation(ValidationError::MalformedIdentifier))
        ));
    }

    #[tokio::test]
    async fn should_list_producers_by_name() {
        let svc = make_service();
        svc.create_producer(producer("11222333000181", "Zeca Agro"))
            .await
            .unwrap();
        svc.create_producer(producer("11144477735", "Ana Lima"))
            .await
            .unwrap();

        let page = svc.list_producers(PageRequest::default()).await.unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.data[0].name, "Ana Lima");
    }

    #[tokio::test]
    async fn should_delete_producer() {
        let svc = make_service();
        let created = svc
            .create_producer(producer("11144477735", "João da Silva"))
            .await
            .unwrap();

        svc.delete_producer(created.id).await.unwrap();

        let result = svc.delete_producer(created.id).await;
        assert!(matches!(result, Err(LedgerError::NotFound(_))));
    }
}
