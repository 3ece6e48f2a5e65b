//! HTTP handlers for camps, talks, speakers and operational endpoints
//!
//! Handlers share one shape: open a request-scoped [`Repository`], check
//! preconditions, stage the mutation, commit, and map the result through the
//! wire models. Storage failures surface as `500 Database Failure`.

pub mod camps;
pub mod extract;
pub mod operational;
pub mod speakers;
pub mod talks;

use crate::config::ConfigHandle;
use crate::core::repository::Repository;
use crate::links::LinkResolver;
use crate::storage::PersistenceProvider;
use std::sync::Arc;

pub use camps::{create_camp, delete_camp, get_camp, list_camps, search_camps, update_camp};
pub use operational::reload_config;
pub use speakers::{get_speaker, list_speakers};
pub use talks::{create_talk, delete_talk, get_talk, list_talks, update_talk};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn PersistenceProvider>,
    pub links: Arc<dyn LinkResolver>,
    pub config: ConfigHandle,
}

impl AppState {
    pub fn new(
        provider: Arc<dyn PersistenceProvider>,
        links: Arc<dyn LinkResolver>,
        config: ConfigHandle,
    ) -> Self {
        Self {
            provider,
            links,
            config,
        }
    }

    /// Open a repository scoped to the current request
    pub fn repository(&self) -> Repository {
        Repository::new(self.provider.clone())
    }
}
