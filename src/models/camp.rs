//! Camp representation and its update overlay

use super::talk::TalkModel;
use crate::core::entity::{Camp, Location};
use super::day::{deserialize_day, deserialize_optional_day};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

fn default_length() -> i32 {
    1
}

/// A camp as exchanged with clients
///
/// Used both as response body and as creation request body. The location is
/// flattened into `venue` and `location*` fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CampModel {
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Name is required and limited to 100 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Moniker is required"))]
    pub moniker: String,

    #[serde(deserialize_with = "deserialize_day")]
    pub event_date: NaiveDate,

    #[serde(default = "default_length")]
    #[validate(range(min = 1, max = 100, message = "Length must be between 1 and 100 days"))]
    pub length: i32,

    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub location_address1: Option<String>,
    #[serde(default)]
    pub location_address2: Option<String>,
    #[serde(default)]
    pub location_address3: Option<String>,
    #[serde(default)]
    pub location_city_town: Option<String>,
    #[serde(default)]
    pub location_state_province: Option<String>,
    #[serde(default)]
    pub location_postal_code: Option<String>,
    #[serde(default)]
    pub location_country: Option<String>,

    /// Populated only when talks were requested; ignored on input
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub talks: Vec<TalkModel>,
}

impl CampModel {
    /// Build a new, unsaved camp from a creation body
    ///
    /// Talks are never created through the camp body.
    pub fn to_camp(&self) -> Camp {
        Camp {
            id: 0,
            moniker: self.moniker.clone(),
            name: self.name.clone(),
            event_date: self.event_date,
            length: self.length,
            location: self.location(),
            talks: Vec::new(),
        }
    }

    fn location(&self) -> Location {
        Location {
            venue: self.venue.clone(),
            address1: self.location_address1.clone(),
            address2: self.location_address2.clone(),
            address3: self.location_address3.clone(),
            city_town: self.location_city_town.clone(),
            state_province: self.location_state_province.clone(),
            postal_code: self.location_postal_code.clone(),
            country: self.location_country.clone(),
        }
    }
}

impl From<&Camp> for CampModel {
    fn from(camp: &Camp) -> Self {
        Self {
            name: camp.name.clone(),
            moniker: camp.moniker.clone(),
            event_date: camp.event_date,
            length: camp.length,
            venue: camp.location.venue.clone(),
            location_address1: camp.location.address1.clone(),
            location_address2: camp.location.address2.clone(),
            location_address3: camp.location.address3.clone(),
            location_city_town: camp.location.city_town.clone(),
            location_state_province: camp.location.state_province.clone(),
            location_postal_code: camp.location.postal_code.clone(),
            location_country: camp.location.country.clone(),
            talks: camp.talks.iter().map(TalkModel::from).collect(),
        }
    }
}

/// Partial camp sent to `PUT /api/camps/{moniker}`
///
/// The moniker is not part of the overlay: it identifies the camp and never
/// changes after creation.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct CampUpdate {
    #[validate(length(min = 1, max = 100, message = "Name is limited to 100 characters"))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_day")]
    pub event_date: Option<NaiveDate>,
    #[validate(range(min = 1, max = 100, message = "Length must be between 1 and 100 days"))]
    pub length: Option<i32>,
    pub venue: Option<String>,
    pub location_address1: Option<String>,
    pub location_address2: Option<String>,
    pub location_address3: Option<String>,
    pub location_city_town: Option<String>,
    pub location_state_province: Option<String>,
    pub location_postal_code: Option<String>,
    pub location_country: Option<String>,
}

impl CampUpdate {
    /// Copy every present field onto `camp`
    pub fn apply_to(&self, camp: &mut Camp) {
        overlay(&mut camp.name, &self.name);
        if let Some(event_date) = self.event_date {
            camp.event_date = event_date;
        }
        if let Some(length) = self.length {
            camp.length = length;
        }

        let location = &mut camp.location;
        overlay_opt(&mut location.venue, &self.venue);
        overlay_opt(&mut location.address1, &self.location_address1);
        overlay_opt(&mut location.address2, &self.location_address2);
        overlay_opt(&mut location.address3, &self.location_address3);
        overlay_opt(&mut location.city_town, &self.location_city_town);
        overlay_opt(&mut location.state_province, &self.location_state_province);
        overlay_opt(&mut location.postal_code, &self.location_postal_code);
        overlay_opt(&mut location.country, &self.location_country);
    }
}

pub(crate) fn overlay(target: &mut String, value: &Option<String>) {
    if let Some(value) = value {
        target.clone_from(value);
    }
}

fn overlay_opt(target: &mut Option<String>, value: &Option<String>) {
    if value.is_some() {
        target.clone_from(value);
    }
}
