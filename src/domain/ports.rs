use crate::domain::model::{AnimalId, AnimalRecord, Sex};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Single-record fetch. `Ok(None)` is the ordinary "not found" outcome;
/// `Err` is reserved for storage failures.
#[async_trait]
pub trait AnimalLookup: Send + Sync {
    async fn find_by_id(&self, id: AnimalId) -> Result<Option<AnimalRecord>>;
}

#[async_trait]
pub trait AnimalRepository: AnimalLookup {
    /// All records, in the store's listing order.
    async fn list_all(&self) -> Result<Vec<AnimalRecord>>;
    async fn list_by_sex(&self, sex: Sex) -> Result<Vec<AnimalRecord>>;
    /// Persists a new record and returns it with its assigned id.
    async fn create(&self, record: AnimalRecord) -> Result<AnimalRecord>;
    async fn update(&self, record: AnimalRecord) -> Result<AnimalRecord>;
    async fn delete(&self, id: AnimalId) -> Result<Option<AnimalRecord>>;
}

pub trait PaginationSettings: Send + Sync {
    fn max_page_size(&self) -> usize;
    fn default_page_size(&self) -> usize;
}
