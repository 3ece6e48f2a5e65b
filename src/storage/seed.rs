//! Sample data loaded when storage seeding is enabled

use crate::core::entity::{Camp, Location, Speaker, Talk};
use chrono::NaiveDate;

pub fn camps() -> Vec<Camp> {
    let Some(event_date) = NaiveDate::from_ymd_opt(2018, 10, 18) else {
        return Vec::new();
    };

    vec![Camp {
        id: 1,
        moniker: "ATL2018".to_string(),
        name: "Atlanta Code Camp".to_string(),
        event_date,
        length: 1,
        location: Location {
            venue: Some("Atlanta Convention Center".to_string()),
            address1: Some("123 Main Street".to_string()),
            city_town: Some("Atlanta".to_string()),
            state_province: Some("GA".to_string()),
            postal_code: Some("12345".to_string()),
            country: Some("USA".to_string()),
            ..Location::default()
        },
        talks: Vec::new(),
    }]
}

pub fn speakers() -> Vec<Speaker> {
    vec![
        Speaker {
            id: 1,
            first_name: "Shawn".to_string(),
            last_name: "Wildermuth".to_string(),
            blog_url: Some("http://wildermuth.com".to_string()),
            company: Some("Wilder Minds LLC".to_string()),
            company_url: Some("http://wilderminds.com".to_string()),
            github: Some("shawnwildermuth".to_string()),
            twitter: Some("shawnwildermuth".to_string()),
            ..Speaker::default()
        },
        Speaker {
            id: 2,
            first_name: "Resa".to_string(),
            last_name: "Wildermuth".to_string(),
            blog_url: Some("http://shawnandresa.com".to_string()),
            company: Some("Wilder Minds LLC".to_string()),
            company_url: Some("http://wilderminds.com".to_string()),
            github: Some("resawildermuth".to_string()),
            twitter: Some("resawildermuth".to_string()),
            ..Speaker::default()
        },
    ]
}

pub fn talks() -> Vec<Talk> {
    vec![
        Talk {
            id: 1,
            camp_id: 1,
            title: "Entity Framework From Scratch".to_string(),
            abstract_text: "Entity Framework from scratch in an hour. Probably cover it all"
                .to_string(),
            level: 100,
            speaker_id: 1,
            speaker: None,
        },
        Talk {
            id: 2,
            camp_id: 1,
            title: "Writing Sample Data Made Easy".to_string(),
            abstract_text: "Thinking of good sample data examples is tiring.".to_string(),
            level: 200,
            speaker_id: 2,
            speaker: None,
        },
    ]
}
