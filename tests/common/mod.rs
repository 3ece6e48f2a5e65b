//! Shared fixtures for the HTTP-level tests

#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use codecamp::prelude::*;
use serde_json::{Value, json};

/// Id of a speaker present only in [`store_with_guest_speaker`]
pub const GUEST_SPEAKER_ID: SpeakerId = 7;

pub fn server_with(store: InMemoryStore) -> TestServer {
    let router = ServerBuilder::new()
        .with_provider(store)
        .build()
        .unwrap();
    TestServer::new(router)
}

pub fn seeded_server() -> TestServer {
    server_with(InMemoryStore::seeded())
}

/// Seeded store plus speaker 7
pub fn store_with_guest_speaker() -> InMemoryStore {
    let store = InMemoryStore::seeded();
    let mut speaker = Speaker::new("Grace", "Hopper");
    speaker.id = GUEST_SPEAKER_ID;
    speaker.company = Some("US Navy".to_string());
    store.seed(Vec::new(), Vec::new(), vec![speaker]);
    store
}

pub fn atl2024() -> Value {
    json!({
        "moniker": "ATL2024",
        "name": "Atlanta Code Camp",
        "eventDate": "2024-09-01",
        "venue": "Atlanta Convention Center",
        "locationCityTown": "Atlanta"
    })
}

pub fn talk_body(title: &str, speaker_id: SpeakerId) -> Value {
    json!({
        "title": title,
        "abstract": "An hour long walk through the whole topic, start to finish.",
        "level": 200,
        "speaker": { "speakerId": speaker_id }
    })
}

/// Create ATL2024 and return the server
pub async fn server_with_atl2024(store: InMemoryStore) -> TestServer {
    let server = server_with(store);
    server
        .post("/api/camps")
        .json(&atl2024())
        .await
        .assert_status(axum::http::StatusCode::CREATED);
    server
}

/// Provider whose every call fails
pub struct UnavailableStore;

#[async_trait]
impl PersistenceProvider for UnavailableStore {
    fn backend(&self) -> &'static str {
        "unavailable"
    }

    async fn find_camps(&self, _filter: &CampFilter) -> StorageResult<Vec<Camp>> {
        Err(StorageError::unavailable("unavailable", "connection refused"))
    }

    async fn find_talks(&self, _filter: &TalkFilter) -> StorageResult<Vec<Talk>> {
        Err(StorageError::unavailable("unavailable", "connection refused"))
    }

    async fn find_speakers(&self, _filter: &SpeakerFilter) -> StorageResult<Vec<Speaker>> {
        Err(StorageError::unavailable("unavailable", "connection refused"))
    }

    async fn apply(&self, _changes: Vec<PendingChange>) -> StorageResult<CommitReceipt> {
        Err(StorageError::unavailable("unavailable", "connection refused"))
    }
}

/// Resolver that cannot address anything
pub struct NoAddresses;

impl LinkResolver for NoAddresses {
    fn resolve(&self, _route: &str, _params: &[(&str, &str)]) -> Option<String> {
        None
    }
}

/// Store where another writer takes every moniker between the existence
/// check and the commit
pub struct MonikerTakenAtCommit(pub InMemoryStore);

#[async_trait]
impl PersistenceProvider for MonikerTakenAtCommit {
    fn backend(&self) -> &'static str {
        "moniker-taken"
    }

    async fn find_camps(&self, _filter: &CampFilter) -> StorageResult<Vec<Camp>> {
        Ok(Vec::new())
    }

    async fn find_talks(&self, filter: &TalkFilter) -> StorageResult<Vec<Talk>> {
        self.0.find_talks(filter).await
    }

    async fn find_speakers(&self, filter: &SpeakerFilter) -> StorageResult<Vec<Speaker>> {
        self.0.find_speakers(filter).await
    }

    async fn apply(&self, changes: Vec<PendingChange>) -> StorageResult<CommitReceipt> {
        let value = changes
            .first()
            .and_then(|change| match change.entity() {
                StagedEntity::Camp(camp) => Some(camp.moniker.clone()),
                _ => None,
            })
            .unwrap_or_default();
        Err(StorageError::UniqueViolation {
            constraint: "camps.moniker".to_string(),
            value,
        })
    }
}
