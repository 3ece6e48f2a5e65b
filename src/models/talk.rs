//! Talk representation and its update overlay

use super::camp::overlay;
use super::speaker::SpeakerModel;
use crate::core::entity::{Camp, Speaker, SpeakerId, Talk, TalkId};
use serde::{Deserialize, Serialize};
use validator::Validate;

fn default_level() -> i32 {
    100
}

/// A talk as exchanged with clients
///
/// As a creation body, `speaker` must reference an existing speaker by id;
/// `talkId` is assigned by the store and ignored on input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TalkModel {
    #[serde(default)]
    pub talk_id: TalkId,

    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Title is required and limited to 100 characters"))]
    pub title: String,

    #[serde(default, rename = "abstract")]
    #[validate(length(min = 20, max = 4000, message = "Abstract must be between 20 and 4000 characters"))]
    pub abstract_text: String,

    #[serde(default = "default_level")]
    #[validate(range(min = 100, max = 300, message = "Level must be between 100 and 300"))]
    pub level: i32,

    #[serde(default)]
    pub speaker: Option<SpeakerModel>,
}

impl TalkModel {
    /// Id of the referenced speaker, if the body carries one
    pub fn speaker_id(&self) -> Option<SpeakerId> {
        self.speaker.as_ref().map(|speaker| speaker.speaker_id)
    }

    /// Build a new, unsaved talk owned by `camp` and given by `speaker`
    pub fn to_talk(&self, camp: &Camp, speaker: &Speaker) -> Talk {
        let mut talk = Talk::new(camp, speaker, self.title.clone());
        talk.abstract_text.clone_from(&self.abstract_text);
        talk.level = self.level;
        talk
    }
}

impl From<&Talk> for TalkModel {
    fn from(talk: &Talk) -> Self {
        Self {
            talk_id: talk.id,
            title: talk.title.clone(),
            abstract_text: talk.abstract_text.clone(),
            level: talk.level,
            speaker: talk.speaker.as_ref().map(SpeakerModel::from),
        }
    }
}

/// Partial talk sent to `PUT /api/camps/{moniker}/talks/{id}`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct TalkUpdate {
    #[validate(length(min = 1, max = 100, message = "Title is limited to 100 characters"))]
    pub title: Option<String>,
    #[serde(rename = "abstract")]
    #[validate(length(min = 20, max = 4000, message = "Abstract must be between 20 and 4000 characters"))]
    pub abstract_text: Option<String>,
    #[validate(range(min = 100, max = 300, message = "Level must be between 100 and 300"))]
    pub level: Option<i32>,
    /// Replacement speaker; applied by the handler only if it resolves
    pub speaker: Option<SpeakerModel>,
}

impl TalkUpdate {
    pub fn speaker_id(&self) -> Option<SpeakerId> {
        self.speaker.as_ref().map(|speaker| speaker.speaker_id)
    }

    /// Copy every present non-reference field onto `talk`
    ///
    /// The camp never changes and the speaker is handled separately.
    pub fn apply_to(&self, talk: &mut Talk) {
        overlay(&mut talk.title, &self.title);
        overlay(&mut talk.abstract_text, &self.abstract_text);
        if let Some(level) = self.level {
            talk.level = level;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn stored_talk() -> Talk {
        let mut camp = Camp::new(
            "ATL2024",
            "Atlanta Code Camp",
            NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
        );
        camp.id = 1;
        let mut speaker = Speaker::new("Ada", "Lovelace");
        speaker.id = 7;

        let mut talk = Talk::new(&camp, &speaker, "Engines");
        talk.id = 5;
        talk.abstract_text = "All about analytical engines.".to_string();
        talk
    }

    #[test]
    fn test_overlay_keeps_references() {
        let mut talk = stored_talk();
        let update: TalkUpdate =
            serde_json::from_str(r#"{"title": "New Title", "speaker": {"id": 999}}"#).unwrap();

        update.apply_to(&mut talk);

        assert_eq!(talk.title, "New Title");
        assert_eq!(talk.abstract_text, "All about analytical engines.");
        assert_eq!(talk.speaker_id, 7);
        assert_eq!(talk.camp_id, 1);
        assert_eq!(update.speaker_id(), Some(999));
    }

    #[test]
    fn test_model_includes_speaker() {
        let talk = stored_talk();
        let json = serde_json::to_value(TalkModel::from(&talk)).unwrap();

        assert_eq!(json["talkId"], 5);
        assert_eq!(json["abstract"], "All about analytical engines.");
        assert_eq!(json["speaker"]["firstName"], "Ada");
    }

    #[test]
    fn test_creation_body_validation() {
        let model: TalkModel = serde_json::from_str(
            r#"{"title": "Engines", "abstract": "too short", "level": 100, "speaker": {"id": 7}}"#,
        )
        .unwrap();
        assert!(model.validate().is_err());

        let model: TalkModel = serde_json::from_str(
            r#"{"title": "Engines", "abstract": "All about analytical engines.", "speaker": {"id": 7}}"#,
        )
        .unwrap();
        assert!(model.validate().is_ok());
        assert_eq!(model.speaker_id(), Some(7));
    }
}
