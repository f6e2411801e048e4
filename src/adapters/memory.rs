use crate::domain::model::{AnimalId, AnimalRecord, Sex};
use crate::domain::ports::{AnimalLookup, AnimalRepository};
use crate::utils::error::{HerdError, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// Repository kept entirely in memory. Listings come back ordered by id and
/// new records receive sequential ids starting at 1.
#[derive(Debug)]
pub struct InMemoryHerd {
    records: RwLock<BTreeMap<AnimalId, AnimalRecord>>,
    next_id: AtomicU64,
}

impl Default for InMemoryHerd {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryHerd {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Seeds the store with already-identified records, e.g. loaded from a
    /// herd file. Records without an id get one after the highest seen.
    /// Two records sharing an id fail the whole seed.
    pub fn from_records(records: Vec<AnimalRecord>) -> Result<Self> {
        let highest = records.iter().map(|r| r.id().get()).max().unwrap_or(0);
        let mut herd = Self {
            records: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(highest.checked_add(1).ok_or_else(id_space_exhausted)?),
        };

        let mut map = BTreeMap::new();
        for record in records {
            let record = if record.id().is_unassigned() {
                let id = herd.allocate_id()?;
                record.assign_id(id)
            } else {
                record
            };
            let id = record.id();
            if map.insert(id, record).is_some() {
                tracing::error!("Animal id {} appears more than once in seed data", id);
                return Err(HerdError::DuplicateId { id });
            }
        }

        *herd.records.get_mut() = map;
        Ok(herd)
    }

    /// 取出下一個編號；用完 i64 範圍就回報錯誤
    fn allocate_id(&self) -> Result<AnimalId> {
        let raw = self
            .next_id
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |raw| {
                (raw <= AnimalId::MAX.get()).then(|| raw + 1)
            })
            .map_err(|_| id_space_exhausted())?;
        AnimalId::try_new(raw)
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    pub async fn snapshot(&self) -> Vec<AnimalRecord> {
        self.records.read().await.values().cloned().collect()
    }
}

fn id_space_exhausted() -> HerdError {
    HerdError::StorageError {
        message: "animal id space exhausted".to_string(),
    }
}

#[async_trait]
impl AnimalLookup for InMemoryHerd {
    async fn find_by_id(&self, id: AnimalId) -> Result<Option<AnimalRecord>> {
        Ok(self.records.read().await.get(&id).cloned())
    }
}

#[async_trait]
impl AnimalRepository for InMemoryHerd {
    async fn list_all(&self) -> Result<Vec<AnimalRecord>> {
        Ok(self.snapshot().await)
    }

    async fn list_by_sex(&self, sex: Sex) -> Result<Vec<AnimalRecord>> {
        Ok(self
            .records
            .read()
            .await
            .values()
            .filter(|record| record.sex() == sex)
            .cloned()
            .collect())
    }

    async fn create(&self, record: AnimalRecord) -> Result<AnimalRecord> {
        let id = self.allocate_id()?;
        let record = record.assign_id(id);
        self.records.write().await.insert(id, record.clone());
        Ok(record)
    }

    async fn update(&self, record: AnimalRecord) -> Result<AnimalRecord> {
        let mut records = self.records.write().await;
        match records.get_mut(&record.id()) {
            Some(slot) => {
                *slot = record.clone();
                Ok(record)
            }
            None => Err(HerdError::AnimalNotFound { id: record.id() }),
        }
    }

    async fn delete(&self, id: AnimalId) -> Result<Option<AnimalRecord>> {
        Ok(self.records.write().await.remove(&id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, name: &str, sex: &str) -> AnimalRecord {
        AnimalRecord::with_id(id, name, sex, None, None).unwrap()
    }

    #[tokio::test]
    async fn test_seeded_ids_continue_after_highest() {
        let herd = InMemoryHerd::from_records(vec![
            record(4, "Trovão", "M"),
            record(9, "Mimosa", "F"),
            record(0, "Novata", "F"),
        ])
        .unwrap();

        let ids: Vec<u64> = herd.list_all().await.unwrap().iter().map(|r| r.id().get()).collect();
        assert_eq!(ids, vec![4, 9, 10]);

        let created = herd.create(record(0, "Estrela", "F")).await.unwrap();
        assert_eq!(created.id(), AnimalId::new(11));
    }

    #[tokio::test]
    async fn test_update_missing_record() {
        let herd = InMemoryHerd::new();
        let err = herd.update(record(3, "Fantasma", "M")).await.unwrap_err();
        assert!(matches!(err, HerdError::AnimalNotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_returns_removed_record() {
        let herd = InMemoryHerd::from_records(vec![record(1, "Trovão", "M")]).unwrap();

        assert!(herd.delete(AnimalId::new(1)).await.unwrap().is_some());
        assert!(herd.delete(AnimalId::new(1)).await.unwrap().is_none());
        assert!(herd.is_empty().await);
    }

    #[tokio::test]
    async fn test_list_by_sex_filters() {
        let herd = InMemoryHerd::from_records(vec![
            record(1, "Trovão", "M"),
            record(2, "Mimosa", "F"),
        ])
        .unwrap();

        let males = herd.list_by_sex(Sex::Male).await.unwrap();
        assert_eq!(males.len(), 1);
        assert_eq!(males[0].name(), "Trovão");
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let err = InMemoryHerd::from_records(vec![
            record(1, "Trovão", "M"),
            record(1, "Mimosa", "F"),
        ])
        .unwrap_err();

        assert!(matches!(err, HerdError::DuplicateId { id } if id == AnimalId::new(1)));
    }

    #[tokio::test]
    async fn test_id_space_exhaustion_is_an_error() {
        let herd = InMemoryHerd::from_records(vec![record(i64::MAX, "Último", "M")]).unwrap();

        let err = herd.create(record(0, "Excedente", "F")).await.unwrap_err();
        assert!(matches!(err, HerdError::StorageError { .. }));
        assert_eq!(herd.len().await, 1);

        let err = InMemoryHerd::from_records(vec![
            record(i64::MAX, "Último", "M"),
            record(0, "Excedente", "F"),
        ])
        .unwrap_err();
        assert!(matches!(err, HerdError::StorageError { .. }));
    }

    #[tokio::test]
    async fn test_last_id_can_still_be_handed_out() {
        let herd = InMemoryHerd::from_records(vec![record(i64::MAX - 1, "Penúltimo", "M")]).unwrap();

        let created = herd.create(record(0, "Último", "F")).await.unwrap();
        assert_eq!(created.id(), AnimalId::MAX);
        assert!(herd.create(record(0, "Excedente", "F")).await.is_err());
    }
}
