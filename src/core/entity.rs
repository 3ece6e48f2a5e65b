//! Persistent entities: camps, talks and speakers

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

pub type CampId = i32;
pub type TalkId = i32;
pub type SpeakerId = i32;

/// Base trait for every record a persistence provider stores.
///
/// Records are identified by an integer key assigned by the provider. A key
/// of `0` marks a record that has never been persisted.
pub trait Record: Clone + PartialEq + Send + Sync + 'static {
    /// Table-like name used in logs and storage errors (e.g., "camp")
    fn kind() -> &'static str;

    /// Get the persistence-assigned identifier
    fn id(&self) -> i32;

    /// Set the identifier once the provider has assigned one
    fn set_id(&mut self, id: i32);

    /// Copy of the record without loaded navigation properties
    ///
    /// This is the form that gets compared and stored; navigations are
    /// rebuilt by the repository on every read.
    fn detached(&self) -> Self;

    /// Check if the record has never been persisted
    fn is_new(&self) -> bool {
        self.id() == 0
    }
}

/// Where a camp takes place
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub venue: Option<String>,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub address3: Option<String>,
    pub city_town: Option<String>,
    pub state_province: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

/// A conference, addressed publicly by its moniker
#[derive(Debug, Clone, PartialEq)]
pub struct Camp {
    pub id: CampId,
    /// Unique, human-chosen key; never changes after creation
    pub moniker: String,
    pub name: String,
    /// First day of the event
    pub event_date: NaiveDate,
    /// Duration in days
    pub length: i32,
    pub location: Location,
    /// Loaded only when talks are explicitly included
    pub talks: Vec<Talk>,
}

impl Camp {
    pub fn new(moniker: impl Into<String>, name: impl Into<String>, event_date: NaiveDate) -> Self {
        Self {
            id: 0,
            moniker: moniker.into(),
            name: name.into(),
            event_date,
            length: 1,
            location: Location::default(),
            talks: Vec::new(),
        }
    }

    /// Last day of the event
    pub fn end_date(&self) -> NaiveDate {
        let extra_days = u64::try_from(self.length.saturating_sub(1)).unwrap_or(0);
        self.event_date
            .checked_add_days(Days::new(extra_days))
            .unwrap_or(self.event_date)
    }

    /// Monikers compare case-insensitively, like the unique index guarding them
    pub fn has_moniker(&self, moniker: &str) -> bool {
        self.moniker.eq_ignore_ascii_case(moniker)
    }
}

impl Record for Camp {
    fn kind() -> &'static str {
        "camp"
    }

    fn id(&self) -> i32 {
        self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = id;
    }

    fn detached(&self) -> Self {
        Self {
            talks: Vec::new(),
            ..self.clone()
        }
    }
}

/// A session given at exactly one camp by exactly one speaker
#[derive(Debug, Clone, PartialEq)]
pub struct Talk {
    pub id: TalkId,
    /// Owning camp; fixed at creation
    pub camp_id: CampId,
    pub title: String,
    pub abstract_text: String,
    pub level: i32,
    pub speaker_id: SpeakerId,
    /// Loaded only when the speaker is explicitly included
    pub speaker: Option<Speaker>,
}

impl Talk {
    /// Create a talk bound to its camp and speaker
    pub fn new(camp: &Camp, speaker: &Speaker, title: impl Into<String>) -> Self {
        Self {
            id: 0,
            camp_id: camp.id,
            title: title.into(),
            abstract_text: String::new(),
            level: 100,
            speaker_id: speaker.id,
            speaker: Some(speaker.clone()),
        }
    }

    /// Point the talk at another speaker
    pub fn assign_speaker(&mut self, speaker: Speaker) {
        self.speaker_id = speaker.id;
        self.speaker = Some(speaker);
    }
}

impl Record for Talk {
    fn kind() -> &'static str {
        "talk"
    }

    fn id(&self) -> i32 {
        self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = id;
    }

    fn detached(&self) -> Self {
        Self {
            speaker: None,
            ..self.clone()
        }
    }
}

/// A person giving talks; shared between talks, never owned by one
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Speaker {
    pub id: SpeakerId,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub bio: Option<String>,
    pub company: Option<String>,
    pub company_url: Option<String>,
    pub blog_url: Option<String>,
    pub twitter: Option<String>,
    pub github: Option<String>,
}

impl Speaker {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            ..Self::default()
        }
    }

    pub fn full_name(&self) -> String {
        match &self.middle_name {
            Some(middle) if !middle.is_empty() => {
                format!("{} {} {}", self.first_name, middle, self.last_name)
            }
            _ => format!("{} {}", self.first_name, self.last_name),
        }
    }
}

impl Record for Speaker {
    fn kind() -> &'static str {
        "speaker"
    }

    fn id(&self) -> i32 {
        self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = id;
    }

    fn detached(&self) -> Self {
        self.clone()
    }
}
