//! Calendar days as sent by clients
//!
//! Dates arrive either as plain days (`2024-09-01`) or as the timestamps
//! older clients send (`2024-09-01T00:00:00`, RFC 3339). Only the day is kept.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde::de::{Deserializer, Error as _};

/// Deserialize a calendar day from `2024-09-01` or `2024-09-01T10:30:00`
pub fn deserialize_day<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_day(&raw).ok_or_else(|| D::Error::custom(format!("invalid date '{}'", raw)))
}

/// [`deserialize_day`] for fields that may be absent or `null`
pub fn deserialize_optional_day<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse_day(&raw)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid date '{}'", raw))),
        None => Ok(None),
    }
}

fn parse_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_day_formats() {
        let expected = NaiveDate::from_ymd_opt(2018, 10, 18);
        assert_eq!(parse_day("2018-10-18"), expected);
        assert_eq!(parse_day("2018-10-18T00:00:00"), expected);
        assert_eq!(parse_day("2018-10-18T09:30:00.000"), expected);
        assert_eq!(parse_day("2018-10-18T09:30:00Z"), expected);
        assert_eq!(parse_day("18/10/2018"), None);
    }

    #[derive(Debug, serde::Deserialize)]
    struct Body {
        #[serde(default, deserialize_with = "deserialize_optional_day")]
        day: Option<NaiveDate>,
    }

    #[test]
    fn test_optional_day() {
        let body: Body = serde_json::from_str(r#"{"day": "2018-10-19T00:00:00"}"#).unwrap();
        assert_eq!(body.day, NaiveDate::from_ymd_opt(2018, 10, 19));

        let body: Body = serde_json::from_str("{}").unwrap();
        assert_eq!(body.day, None);

        let body: Body = serde_json::from_str(r#"{"day": null}"#).unwrap();
        assert_eq!(body.day, None);

        assert!(serde_json::from_str::<Body>(r#"{"day": "soon"}"#).is_err());
    }
}
