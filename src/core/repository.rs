//! Request-scoped repository over a persistence provider
//!
//! Every read and write of camps, talks and speakers goes through a
//! [`Repository`]. A repository is created per request and owns that
//! request's pending-change buffer, so handlers follow one pattern:
//! check preconditions, [`stage`](Repository::stage) the mutation,
//! [`commit`](Repository::commit), branch on the result.

use crate::core::entity::{Camp, Speaker, SpeakerId, Talk, TalkId};
use crate::core::error::StorageResult;
use crate::storage::{
    CampFilter, PendingChange, PersistenceProvider, SpeakerFilter, StagedEntity, TalkFilter,
};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;

/// Position of a staged change within its batch
///
/// Use it after a successful commit to read back the persisted form of the
/// entity (including any key the provider assigned).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StagedKey(usize);

pub struct Repository {
    provider: Arc<dyn PersistenceProvider>,
    pending: Vec<PendingChange>,
    persisted: Vec<StagedEntity>,
}

impl Repository {
    pub fn new(provider: Arc<dyn PersistenceProvider>) -> Self {
        Self {
            provider,
            pending: Vec::new(),
            persisted: Vec::new(),
        }
    }

    // === Camps ===

    /// List all camps, optionally with their talks (and each talk's speaker)
    pub async fn list_camps(&self, include_talks: bool) -> StorageResult<Vec<Camp>> {
        let camps = self.provider.find_camps(&CampFilter::default()).await?;
        self.with_talks(camps, include_talks).await
    }

    /// Get a camp by moniker without its talks
    pub async fn get_camp(&self, moniker: &str) -> StorageResult<Option<Camp>> {
        self.get_camp_with_talks(moniker, false).await
    }

    pub async fn get_camp_with_talks(
        &self,
        moniker: &str,
        include_talks: bool,
    ) -> StorageResult<Option<Camp>> {
        let camps = self
            .provider
            .find_camps(&CampFilter::by_moniker(moniker))
            .await?;
        let camps = self.with_talks(camps, include_talks).await?;
        Ok(camps.into_iter().next())
    }

    /// Camps whose first day is `date`
    pub async fn list_camps_by_date(
        &self,
        date: NaiveDate,
        include_talks: bool,
    ) -> StorageResult<Vec<Camp>> {
        let camps = self
            .provider
            .find_camps(&CampFilter::by_event_date(date))
            .await?;
        self.with_talks(camps, include_talks).await
    }

    // === Speakers ===

    pub async fn get_speaker(&self, id: SpeakerId) -> StorageResult<Option<Speaker>> {
        let speakers = self
            .provider
            .find_speakers(&SpeakerFilter::by_ids(vec![id]))
            .await?;
        Ok(speakers.into_iter().next())
    }

    pub async fn list_speakers(&self) -> StorageResult<Vec<Speaker>> {
        self.provider.find_speakers(&SpeakerFilter::default()).await
    }

    // === Talks ===

    /// Talks of the camp named by `moniker`; empty when the camp does not exist
    pub async fn list_talks(
        &self,
        moniker: &str,
        include_speaker: bool,
    ) -> StorageResult<Vec<Talk>> {
        let Some(camp) = self.get_camp(moniker).await? else {
            return Ok(Vec::new());
        };

        let talks = self
            .provider
            .find_talks(&TalkFilter::for_camps(vec![camp.id]))
            .await?;
        self.with_speakers(talks, include_speaker).await
    }

    /// One talk of the camp named by `moniker`
    pub async fn get_talk(
        &self,
        moniker: &str,
        id: TalkId,
        include_speaker: bool,
    ) -> StorageResult<Option<Talk>> {
        let Some(camp) = self.get_camp(moniker).await? else {
            return Ok(None);
        };

        let talks = self
            .provider
            .find_talks(&TalkFilter::for_camps(vec![camp.id]).with_talk_id(id))
            .await?;
        let talks = self.with_speakers(talks, include_speaker).await?;
        Ok(talks.into_iter().next())
    }

    // === Unit of work ===

    /// Stage an insert (new entity) or update (persisted entity)
    pub fn stage(&mut self, entity: impl Into<StagedEntity>) -> StagedKey {
        self.push(PendingChange::Upsert(entity.into()))
    }

    /// Stage a removal
    pub fn stage_delete(&mut self, entity: impl Into<StagedEntity>) -> StagedKey {
        self.push(PendingChange::Delete(entity.into()))
    }

    pub fn has_pending_changes(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Persist every staged change atomically
    ///
    /// Returns whether any row was affected. An empty buffer, or updates that
    /// change nothing, yield `false`. The buffer is cleared whatever the
    /// outcome.
    pub async fn commit(&mut self) -> StorageResult<bool> {
        self.persisted.clear();
        if self.pending.is_empty() {
            return Ok(false);
        }

        let changes = std::mem::take(&mut self.pending);
        let receipt = self.provider.apply(changes).await?;

        tracing::debug!(
            backend = self.provider.backend(),
            rows_affected = receipt.rows_affected,
            "commit"
        );

        self.persisted = receipt.persisted;
        Ok(receipt.rows_affected > 0)
    }

    /// Persisted form of a change from the last commit
    pub fn persisted(&self, key: StagedKey) -> Option<&StagedEntity> {
        self.persisted.get(key.0)
    }

    fn push(&mut self, change: PendingChange) -> StagedKey {
        tracing::trace!(kind = change.entity().kind(), "staged change");
        self.pending.push(change);
        StagedKey(self.pending.len() - 1)
    }

    // === Includes ===

    async fn with_talks(&self, mut camps: Vec<Camp>, include: bool) -> StorageResult<Vec<Camp>> {
        if !include || camps.is_empty() {
            return Ok(camps);
        }

        let camp_ids = camps.iter().map(|camp| camp.id).collect();
        let talks = self
            .provider
            .find_talks(&TalkFilter::for_camps(camp_ids))
            .await?;
        let talks = self.with_speakers(talks, true).await?;

        let mut by_camp: HashMap<i32, Vec<Talk>> = HashMap::new();
        for talk in talks {
            by_camp.entry(talk.camp_id).or_default().push(talk);
        }
        for camp in &mut camps {
            camp.talks = by_camp.remove(&camp.id).unwrap_or_default();
        }

        Ok(camps)
    }

    async fn with_speakers(&self, mut talks: Vec<Talk>, include: bool) -> StorageResult<Vec<Talk>> {
        if !include || talks.is_empty() {
            return Ok(talks);
        }

        let mut ids: Vec<SpeakerId> = talks.iter().map(|talk| talk.speaker_id).collect();
        ids.sort_unstable();
        ids.dedup();

        let speakers: HashMap<SpeakerId, Speaker> = self
            .provider
            .find_speakers(&SpeakerFilter::by_ids(ids))
            .await?
            .into_iter()
            .map(|speaker| (speaker.id, speaker))
            .collect();

        for talk in &mut talks {
            talk.speaker = speakers.get(&talk.speaker_id).cloned();
        }

        Ok(talks)
    }
}
