//! In-memory implementation of PersistenceProvider for testing and development

use super::{
    CampFilter, CommitReceipt, PendingChange, PersistenceProvider, SpeakerFilter, StagedEntity,
    TalkFilter,
};
use crate::core::entity::{Camp, Record, Speaker, Talk};
use crate::core::error::{StorageError, StorageResult};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

const BACKEND: &str = "in-memory";

/// One table of records keyed by their assigned id
#[derive(Debug, Clone)]
struct Table<T> {
    rows: BTreeMap<i32, T>,
    next_id: i32,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T: Record> Table<T> {
    /// Insert or update a row, returning its stored form and whether it changed
    fn upsert(&mut self, record: &T) -> StorageResult<(T, bool)> {
        let mut row = record.detached();

        if row.is_new() {
            let next_id = self.next_id.checked_add(1).ok_or_else(|| {
                StorageError::unavailable(BACKEND, format!("{} key space exhausted", T::kind()))
            })?;
            row.set_id(self.next_id);
            self.next_id = next_id;
            self.rows.insert(row.id(), row.clone());
            return Ok((row, true));
        }

        let existing = self
            .rows
            .get_mut(&row.id())
            .ok_or_else(|| StorageError::Concurrency {
                entity: T::kind().to_string(),
                id: row.id(),
            })?;

        if *existing == row {
            return Ok((row, false));
        }

        *existing = row.clone();
        Ok((row, true))
    }

    fn remove(&mut self, id: i32) -> StorageResult<T> {
        self.rows.remove(&id).ok_or_else(|| StorageError::Concurrency {
            entity: T::kind().to_string(),
            id,
        })
    }

    /// Seed rows keep their ids; the key sequence moves past them
    fn seed(&mut self, row: T) {
        self.next_id = self.next_id.max(row.id().saturating_add(1));
        self.rows.insert(row.id(), row);
    }
}

#[derive(Debug, Clone, Default)]
struct Tables {
    camps: Table<Camp>,
    talks: Table<Talk>,
    speakers: Table<Speaker>,
}

impl Tables {
    fn apply(&mut self, change: &PendingChange) -> StorageResult<(StagedEntity, usize)> {
        match change {
            PendingChange::Upsert(StagedEntity::Camp(camp)) => {
                self.check_unique_moniker(camp)?;
                let (row, changed) = self.camps.upsert(camp)?;
                Ok((row.into(), usize::from(changed)))
            }
            PendingChange::Upsert(StagedEntity::Talk(talk)) => {
                self.check_talk_references(talk)?;
                let (row, changed) = self.talks.upsert(talk)?;
                Ok((row.into(), usize::from(changed)))
            }
            PendingChange::Upsert(StagedEntity::Speaker(speaker)) => {
                let (row, changed) = self.speakers.upsert(speaker)?;
                Ok((row.into(), usize::from(changed)))
            }
            PendingChange::Delete(StagedEntity::Camp(camp)) => {
                let removed = self.camps.remove(camp.id)?;
                // Talks cannot outlive their camp
                let before = self.talks.rows.len();
                self.talks.rows.retain(|_, talk| talk.camp_id != removed.id);
                let cascaded = before - self.talks.rows.len();
                Ok((removed.into(), 1 + cascaded))
            }
            PendingChange::Delete(StagedEntity::Talk(talk)) => {
                let removed = self.talks.remove(talk.id)?;
                Ok((removed.into(), 1))
            }
            PendingChange::Delete(StagedEntity::Speaker(speaker)) => {
                if let Some(talk) = self
                    .talks
                    .rows
                    .values()
                    .find(|talk| talk.speaker_id == speaker.id)
                {
                    return Err(StorageError::ForeignKeyViolation {
                        entity: Talk::kind().to_string(),
                        id: talk.id,
                        referenced: Speaker::kind().to_string(),
                        referenced_id: speaker.id,
                    });
                }
                let removed = self.speakers.remove(speaker.id)?;
                Ok((removed.into(), 1))
            }
        }
    }

    fn check_unique_moniker(&self, camp: &Camp) -> StorageResult<()> {
        let taken = self
            .camps
            .rows
            .values()
            .any(|other| other.id != camp.id && other.has_moniker(&camp.moniker));

        if taken {
            return Err(StorageError::UniqueViolation {
                constraint: "camps.moniker".to_string(),
                value: camp.moniker.clone(),
            });
        }
        Ok(())
    }

    fn check_talk_references(&self, talk: &Talk) -> StorageResult<()> {
        if !self.camps.rows.contains_key(&talk.camp_id) {
            return Err(StorageError::ForeignKeyViolation {
                entity: Talk::kind().to_string(),
                id: talk.id,
                referenced: Camp::kind().to_string(),
                referenced_id: talk.camp_id,
            });
        }
        if !self.speakers.rows.contains_key(&talk.speaker_id) {
            return Err(StorageError::ForeignKeyViolation {
                entity: Talk::kind().to_string(),
                id: talk.id,
                referenced: Speaker::kind().to_string(),
                referenced_id: talk.speaker_id,
            });
        }
        Ok(())
    }
}

/// In-memory persistence provider
///
/// Useful for testing and development. Uses RwLock for thread-safe access;
/// a batch is applied to a copy of the tables and swapped in only when every
/// change succeeded.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the sample camp, talks and speakers
    pub fn seeded() -> Self {
        let store = Self::new();
        store.seed(super::seed::camps(), super::seed::talks(), super::seed::speakers());
        store
    }

    /// Load rows with their ids as given, bypassing change tracking
    pub fn seed(&self, camps: Vec<Camp>, talks: Vec<Talk>, speakers: Vec<Speaker>) {
        let mut tables = match self.tables.write() {
            Ok(tables) => tables,
            Err(poisoned) => poisoned.into_inner(),
        };

        for camp in camps {
            tables.camps.seed(camp.detached());
        }
        for speaker in speakers {
            tables.speakers.seed(speaker);
        }
        for talk in talks {
            tables.talks.seed(talk.detached());
        }
    }

    fn read_tables<R>(&self, f: impl FnOnce(&Tables) -> R) -> StorageResult<R> {
        let tables = self
            .tables
            .read()
            .map_err(|e| StorageError::unavailable(BACKEND, format!("Failed to acquire read lock: {}", e)))?;
        Ok(f(&tables))
    }
}

#[async_trait]
impl PersistenceProvider for InMemoryStore {
    fn backend(&self) -> &'static str {
        BACKEND
    }

    async fn find_camps(&self, filter: &CampFilter) -> StorageResult<Vec<Camp>> {
        self.read_tables(|tables| {
            tables
                .camps
                .rows
                .values()
                .filter(|camp| filter.matches(camp))
                .cloned()
                .collect()
        })
    }

    async fn find_talks(&self, filter: &TalkFilter) -> StorageResult<Vec<Talk>> {
        self.read_tables(|tables| {
            tables
                .talks
                .rows
                .values()
                .filter(|talk| filter.matches(talk))
                .cloned()
                .collect()
        })
    }

    async fn find_speakers(&self, filter: &SpeakerFilter) -> StorageResult<Vec<Speaker>> {
        self.read_tables(|tables| {
            tables
                .speakers
                .rows
                .values()
                .filter(|speaker| filter.matches(speaker))
                .cloned()
                .collect()
        })
    }

    async fn apply(&self, changes: Vec<PendingChange>) -> StorageResult<CommitReceipt> {
        let mut tables = self
            .tables
            .write()
            .map_err(|e| StorageError::unavailable(BACKEND, format!("Failed to acquire write lock: {}", e)))?;

        let mut working = tables.clone();
        let mut receipt = CommitReceipt::default();

        for change in &changes {
            let (persisted, rows) = working.apply(change)?;
            receipt.rows_affected += rows;
            receipt.persisted.push(persisted);
        }

        *tables = working;

        tracing::debug!(
            backend = BACKEND,
            changes = changes.len(),
            rows_affected = receipt.rows_affected,
            "applied batch"
        );

        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn insert<E: Into<StagedEntity>>(store: &InMemoryStore, entity: E) -> StagedEntity {
        let receipt = store
            .apply(vec![PendingChange::Upsert(entity.into())])
            .await
            .unwrap();
        receipt.persisted.into_iter().next().unwrap()
    }

    #[tokio::test]
    async fn test_insert_assigns_ids() {
        let store = InMemoryStore::new();

        let first = insert(&store, Camp::new("ATL2024", "Atlanta", date(2024, 9, 1))).await;
        let second = insert(&store, Camp::new("NYC2024", "New York", date(2024, 10, 1))).await;

        assert_eq!(first.as_camp().unwrap().id, 1);
        assert_eq!(second.as_camp().unwrap().id, 2);
    }

    #[tokio::test]
    async fn test_duplicate_moniker_is_rejected() {
        let store = InMemoryStore::new();
        insert(&store, Camp::new("ATL2024", "Atlanta", date(2024, 9, 1))).await;

        let result = store
            .apply(vec![PendingChange::Upsert(
                Camp::new("atl2024", "Other", date(2024, 9, 2)).into(),
            )])
            .await;

        assert!(matches!(result, Err(StorageError::UniqueViolation { .. })));
    }

    #[tokio::test]
    async fn test_unchanged_update_affects_no_rows() {
        let store = InMemoryStore::new();
        let camp = insert(&store, Camp::new("ATL2024", "Atlanta", date(2024, 9, 1))).await;
        let camp = camp.as_camp().unwrap().clone();

        let receipt = store
            .apply(vec![PendingChange::Upsert(camp.clone().into())])
            .await
            .unwrap();
        assert_eq!(receipt.rows_affected, 0);

        let mut renamed = camp;
        renamed.name = "Atlanta Code Camp".to_string();
        let receipt = store
            .apply(vec![PendingChange::Upsert(renamed.into())])
            .await
            .unwrap();
        assert_eq!(receipt.rows_affected, 1);
    }

    #[tokio::test]
    async fn test_failed_batch_leaves_store_untouched() {
        let store = InMemoryStore::new();
        let camp = insert(&store, Camp::new("ATL2024", "Atlanta", date(2024, 9, 1))).await;
        let camp = camp.as_camp().unwrap().clone();

        let mut orphan = Talk::new(&camp, &Speaker::default(), "No speaker");
        orphan.speaker_id = 42;

        let result = store
            .apply(vec![
                PendingChange::Upsert(Camp::new("NYC2024", "New York", date(2024, 10, 1)).into()),
                PendingChange::Upsert(orphan.into()),
            ])
            .await;

        assert!(matches!(result, Err(StorageError::ForeignKeyViolation { .. })));
        let camps = store.find_camps(&CampFilter::default()).await.unwrap();
        assert_eq!(camps.len(), 1);
    }

    #[tokio::test]
    async fn test_camp_delete_cascades_to_talks() {
        let store = InMemoryStore::seeded();
        let camp = store
            .find_camps(&CampFilter::by_moniker("ATL2018"))
            .await
            .unwrap()
            .remove(0);
        let talks_before = store
            .find_talks(&TalkFilter::for_camps(vec![camp.id]))
            .await
            .unwrap()
            .len();
        assert!(talks_before > 0);

        let receipt = store
            .apply(vec![PendingChange::Delete(camp.clone().into())])
            .await
            .unwrap();

        assert_eq!(receipt.rows_affected, 1 + talks_before);
        let talks = store.find_talks(&TalkFilter::default()).await.unwrap();
        assert!(talks.iter().all(|t| t.camp_id != camp.id));
        let speakers = store.find_speakers(&SpeakerFilter::default()).await.unwrap();
        assert!(!speakers.is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_row_is_a_storage_error() {
        let store = InMemoryStore::new();
        let mut ghost = Camp::new("GHOST", "Ghost", date(2024, 1, 1));
        ghost.id = 99;

        let result = store.apply(vec![PendingChange::Delete(ghost.into())]).await;
        assert!(matches!(result, Err(StorageError::Concurrency { id: 99, .. })));
    }

    #[tokio::test]
    async fn test_speaker_in_use_cannot_be_deleted() {
        let store = InMemoryStore::seeded();
        let speaker = store
            .find_speakers(&SpeakerFilter::by_ids(vec![1]))
            .await
            .unwrap()
            .remove(0);

        let result = store.apply(vec![PendingChange::Delete(speaker.into())]).await;
        assert!(matches!(result, Err(StorageError::ForeignKeyViolation { .. })));
    }

    #[tokio::test]
    async fn test_exhausted_key_space_is_a_storage_error() {
        let store = InMemoryStore::new();
        let mut last = Speaker::new("Max", "Imum");
        last.id = i32::MAX;
        store.seed(Vec::new(), Vec::new(), vec![last]);

        let result = store
            .apply(vec![PendingChange::Upsert(Speaker::new("One", "More").into())])
            .await;

        assert!(matches!(result, Err(StorageError::Unavailable { .. })));
        let speakers = store.find_speakers(&SpeakerFilter::default()).await.unwrap();
        assert_eq!(speakers.len(), 1);
    }
}
