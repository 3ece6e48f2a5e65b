//! Core module containing the domain records, errors and the unit of work

pub mod entity;
pub mod error;
pub mod repository;

pub use entity::{Camp, CampId, Location, Record, Speaker, SpeakerId, Talk, TalkId};
pub use error::{ApiError, ApiResult, ErrorResponse, StorageError, StorageResult};
pub use repository::{Repository, StagedKey};
