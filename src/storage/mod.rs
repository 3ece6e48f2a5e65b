//! Persistence providers
//!
//! A [`PersistenceProvider`] is the durable store behind the
//! [`Repository`](crate::core::repository::Repository). It answers filtered
//! reads and applies a batch of pending changes atomically. Query composition
//! (includes, moniker scoping) and change buffering are the repository's job;
//! the provider only enforces what a relational store would enforce on its
//! own: unique monikers, talk foreign keys and key assignment.

pub mod in_memory;
pub mod seed;

use crate::core::entity::{Camp, CampId, Speaker, SpeakerId, Talk, TalkId};
use crate::core::error::StorageResult;
use async_trait::async_trait;
use chrono::NaiveDate;

pub use in_memory::InMemoryStore;

/// Criteria for selecting camps
#[derive(Debug, Clone, Default)]
pub struct CampFilter {
    /// Case-insensitive moniker match
    pub moniker: Option<String>,
    /// Exact match on the first day of the event
    pub event_date: Option<NaiveDate>,
}

impl CampFilter {
    pub fn by_moniker(moniker: &str) -> Self {
        Self {
            moniker: Some(moniker.to_string()),
            ..Self::default()
        }
    }

    pub fn by_event_date(date: NaiveDate) -> Self {
        Self {
            event_date: Some(date),
            ..Self::default()
        }
    }

    pub fn matches(&self, camp: &Camp) -> bool {
        self.moniker.as_deref().is_none_or(|m| camp.has_moniker(m))
            && self.event_date.is_none_or(|d| camp.event_date == d)
    }
}

/// Criteria for selecting talks
#[derive(Debug, Clone, Default)]
pub struct TalkFilter {
    pub camp_ids: Option<Vec<CampId>>,
    pub talk_id: Option<TalkId>,
}

impl TalkFilter {
    pub fn for_camps(camp_ids: Vec<CampId>) -> Self {
        Self {
            camp_ids: Some(camp_ids),
            talk_id: None,
        }
    }

    pub fn with_talk_id(mut self, talk_id: TalkId) -> Self {
        self.talk_id = Some(talk_id);
        self
    }

    pub fn matches(&self, talk: &Talk) -> bool {
        self.camp_ids
            .as_ref()
            .is_none_or(|ids| ids.contains(&talk.camp_id))
            && self.talk_id.is_none_or(|id| talk.id == id)
    }
}

/// Criteria for selecting speakers
#[derive(Debug, Clone, Default)]
pub struct SpeakerFilter {
    pub ids: Option<Vec<SpeakerId>>,
}

impl SpeakerFilter {
    pub fn by_ids(ids: Vec<SpeakerId>) -> Self {
        Self { ids: Some(ids) }
    }

    pub fn matches(&self, speaker: &Speaker) -> bool {
        self.ids.as_ref().is_none_or(|ids| ids.contains(&speaker.id))
    }
}

/// Any record that can be staged for persistence
#[derive(Debug, Clone, PartialEq)]
pub enum StagedEntity {
    Camp(Camp),
    Talk(Talk),
    Speaker(Speaker),
}

impl StagedEntity {
    pub fn kind(&self) -> &'static str {
        match self {
            StagedEntity::Camp(_) => "camp",
            StagedEntity::Talk(_) => "talk",
            StagedEntity::Speaker(_) => "speaker",
        }
    }

    pub fn as_camp(&self) -> Option<&Camp> {
        match self {
            StagedEntity::Camp(camp) => Some(camp),
            _ => None,
        }
    }

    pub fn as_talk(&self) -> Option<&Talk> {
        match self {
            StagedEntity::Talk(talk) => Some(talk),
            _ => None,
        }
    }
}

impl From<Camp> for StagedEntity {
    fn from(camp: Camp) -> Self {
        StagedEntity::Camp(camp)
    }
}

impl From<Talk> for StagedEntity {
    fn from(talk: Talk) -> Self {
        StagedEntity::Talk(talk)
    }
}

impl From<Speaker> for StagedEntity {
    fn from(speaker: Speaker) -> Self {
        StagedEntity::Speaker(speaker)
    }
}

/// A write waiting for the next commit
#[derive(Debug, Clone, PartialEq)]
pub enum PendingChange {
    /// Insert when the record is new, otherwise update
    Upsert(StagedEntity),
    Delete(StagedEntity),
}

impl PendingChange {
    pub fn entity(&self) -> &StagedEntity {
        match self {
            PendingChange::Upsert(entity) | PendingChange::Delete(entity) => entity,
        }
    }
}

/// Result of applying a batch
#[derive(Debug, Clone, Default)]
pub struct CommitReceipt {
    /// Number of rows inserted, changed or removed (cascades included)
    pub rows_affected: usize,
    /// Persisted form of each change, in batch order, with assigned keys
    pub persisted: Vec<StagedEntity>,
}

/// Durable store for camps, talks and speakers
///
/// Reads return records without navigations loaded (`Camp::talks` empty,
/// `Talk::speaker` unset).
#[async_trait]
pub trait PersistenceProvider: Send + Sync {
    /// Backend name used in logs and errors
    fn backend(&self) -> &'static str;

    async fn find_camps(&self, filter: &CampFilter) -> StorageResult<Vec<Camp>>;

    async fn find_talks(&self, filter: &TalkFilter) -> StorageResult<Vec<Talk>>;

    async fn find_speakers(&self, filter: &SpeakerFilter) -> StorageResult<Vec<Speaker>>;

    /// Apply every change or none of them
    async fn apply(&self, changes: Vec<PendingChange>) -> StorageResult<CommitReceipt>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camp_filter_combines_criteria() {
        let date = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();
        let camp = Camp::new("ATL2024", "Atlanta Code Camp", date);

        assert!(CampFilter::default().matches(&camp));
        assert!(CampFilter::by_moniker("atl2024").matches(&camp));
        assert!(CampFilter::by_event_date(date).matches(&camp));

        let filter = CampFilter {
            moniker: Some("ATL2024".to_string()),
            event_date: date.succ_opt(),
        };
        assert!(!filter.matches(&camp));
    }

    #[test]
    fn test_talk_filter_scopes_to_camps() {
        let date = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();
        let mut camp = Camp::new("ATL2024", "Atlanta Code Camp", date);
        camp.id = 3;
        let mut speaker = Speaker::new("Ada", "Lovelace");
        speaker.id = 1;
        let mut talk = Talk::new(&camp, &speaker, "Engines");
        talk.id = 9;

        assert!(TalkFilter::for_camps(vec![3]).matches(&talk));
        assert!(!TalkFilter::for_camps(vec![4]).matches(&talk));
        assert!(TalkFilter::for_camps(vec![3]).with_talk_id(9).matches(&talk));
        assert!(!TalkFilter::for_camps(vec![3]).with_talk_id(10).matches(&talk));
    }
}
