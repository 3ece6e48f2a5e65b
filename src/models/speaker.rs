//! Speaker representation

use crate::core::entity::{Speaker, SpeakerId};
use serde::{Deserialize, Serialize};

/// A speaker as shown inside talks
///
/// In request bodies only the id matters: it references an existing speaker.
/// `id` is accepted as an alias of `speakerId`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpeakerModel {
    #[serde(alias = "id")]
    pub speaker_id: SpeakerId,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub bio: Option<String>,
    pub company: Option<String>,
    pub company_url: Option<String>,
    pub blog_url: Option<String>,
    pub twitter: Option<String>,
    #[serde(rename = "gitHub")]
    pub github: Option<String>,
}

impl From<&Speaker> for SpeakerModel {
    fn from(speaker: &Speaker) -> Self {
        Self {
            speaker_id: speaker.id,
            first_name: speaker.first_name.clone(),
            middle_name: speaker.middle_name.clone(),
            last_name: speaker.last_name.clone(),
            bio: speaker.bio.clone(),
            company: speaker.company.clone(),
            company_url: speaker.company_url.clone(),
            blog_url: speaker.blog_url.clone(),
            twitter: speaker.twitter.clone(),
            github: speaker.github.clone(),
        }
    }
}
