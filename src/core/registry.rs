use crate::core::ancestry::{resolve_ancestry, AncestryMap};
use crate::core::pagination::{PageRequest, PagedView, Paginator};
use crate::domain::model::{AnimalId, AnimalRecord, AnimalRow, Sex};
use crate::domain::ports::AnimalRepository;
use crate::utils::error::{HerdError, Result};
use crate::utils::validation::validate_identifier;

/// Application service over an animal repository: listings, paging,
/// registration and lineage lookups.
pub struct HerdService<R: AnimalRepository> {
    repository: R,
    paginator: Paginator,
}

impl<R: AnimalRepository> HerdService<R> {
    pub fn new(repository: R) -> Self {
        Self::with_paginator(repository, Paginator::default())
    }

    pub fn with_paginator(repository: R, paginator: Paginator) -> Self {
        Self {
            repository,
            paginator,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    pub async fn list_all(&self) -> Result<Vec<AnimalRecord>> {
        let animals = self.repository.list_all().await?;
        tracing::debug!("Listed {} animals", animals.len());
        Ok(animals)
    }

    pub async fn list_males(&self) -> Result<Vec<AnimalRecord>> {
        self.repository.list_by_sex(Sex::Male).await
    }

    pub async fn list_females(&self) -> Result<Vec<AnimalRecord>> {
        self.repository.list_by_sex(Sex::Female).await
    }

    pub async fn get(&self, id: AnimalId) -> Result<AnimalRecord> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(HerdError::AnimalNotFound { id })
    }

    pub async fn list_paged(&self, request: &PageRequest) -> Result<PagedView<AnimalRecord>> {
        let animals = self.repository.list_all().await?;
        self.paginator.paginate_request(animals, request)
    }

    pub async fn list_paged_by_sex(
        &self,
        sex: Sex,
        request: &PageRequest,
    ) -> Result<PagedView<AnimalRecord>> {
        let animals = self.repository.list_by_sex(sex).await?;
        self.paginator.paginate_request(animals, request)
    }

    /// 驗證後新增，編號由儲存層指定
    pub async fn register(&self, row: AnimalRow) -> Result<AnimalRecord> {
        let record = AnimalRecord::new(&row.name, &row.sex, row.father_id, row.mother_id)?;
        let created = self.repository.create(record).await?;
        tracing::info!("Registered animal {} ({})", created.id(), created.name());
        Ok(created)
    }

    pub async fn update(&self, row: AnimalRow) -> Result<AnimalRecord> {
        let id = validate_identifier("id", row.id)?;

        let mut record = self.get(id).await?;
        record.update(&row.name, &row.sex, row.father_id, row.mother_id)?;

        let updated = self.repository.update(record).await?;
        tracing::info!("Updated animal {}", updated.id());
        Ok(updated)
    }

    pub async fn remove(&self, id: AnimalId) -> Result<AnimalRecord> {
        let removed = self
            .repository
            .delete(id)
            .await?
            .ok_or(HerdError::AnimalNotFound { id })?;
        tracing::info!("Removed animal {}", id);
        Ok(removed)
    }

    pub async fn lineage(&self, id: AnimalId) -> Result<AncestryMap> {
        let ancestry = resolve_ancestry(id, &self.repository).await?;
        tracing::info!("Lineage of {} has {} ancestors", id, ancestry.ancestors().count());
        Ok(ancestry)
    }
}
