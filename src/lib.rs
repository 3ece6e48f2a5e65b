//! # CodeCamp
//!
//! A versioned REST API for code camps, the talks given at them and the
//! speakers giving those talks.
//!
//! ## Features
//!
//! - **Camps by moniker**: camps are addressed by a short, unique, human-readable code
//! - **Nested talks**: talks live under their camp and always carry their speaker
//! - **Unit of work**: handlers stage changes and commit them as one atomic batch
//! - **Query-string versioning**: `?ver=2.0`, with a configurable default
//! - **Reloadable configuration**: YAML file re-read on demand
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use codecamp::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     ServerBuilder::new()
//!         .with_config(ConfigHandle::from_file("config/codecamp.yaml")?)
//!         .with_provider(InMemoryStore::seeded())
//!         .serve()
//!         .await
//! }
//! ```

pub mod config;
pub mod core;
pub mod handlers;
pub mod links;
pub mod models;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        entity::{Camp, CampId, Location, Record, Speaker, SpeakerId, Talk, TalkId},
        error::{ApiError, ApiResult, StorageError, StorageResult},
        repository::{Repository, StagedKey},
    };

    // === Wire models ===
    pub use crate::models::{CampModel, CampUpdate, SpeakerModel, TalkModel, TalkUpdate};

    // === Handlers ===
    pub use crate::handlers::AppState;

    // === Links ===
    pub use crate::links::{LinkResolver, RouteRegistry};

    // === Storage ===
    pub use crate::storage::{
        CampFilter, CommitReceipt, InMemoryStore, PendingChange, PersistenceProvider,
        SpeakerFilter, StagedEntity, TalkFilter,
    };

    // === Config ===
    pub use crate::config::{AppConfig, ConfigHandle};

    // === Server ===
    pub use crate::server::{ApiVersion, ServerBuilder, build_routes};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::NaiveDate;
    pub use serde::{Deserialize, Serialize};

    // === Axum ===
    pub use axum::Router;
}
