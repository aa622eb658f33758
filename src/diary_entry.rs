use crate::editorial::Editorial;
use crate::errors::InvalidDateKey;
use chrono::{Local, NaiveDate};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_MOOD: &str = "Divine";

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Canonical `YYYY-MM-DD` identifier of a diary day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn from_date(date: NaiveDate) -> Self {
        DateKey(date)
    }

    /// Today's key in the local timezone.
    pub fn today() -> Self {
        DateKey(Local::now().date_naive())
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Placeholder picture used when the user attaches no image.
    pub fn placeholder_image_url(&self) -> String {
        format!("https://picsum.photos/seed/{}/600/400", self)
    }

    /// Heading form, e.g. "March 14, 2026".
    pub fn long_label(&self) -> String {
        self.0.format("%B %-d, %Y").to_string()
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_KEY_FORMAT))
    }
}

impl FromStr for DateKey {
    type Err = InvalidDateKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // chrono accepts unpadded and space-padded fields, the key form does not
        match NaiveDate::parse_from_str(s, DATE_KEY_FORMAT).map(DateKey) {
            Ok(key) if key.to_string() == s => Ok(key),
            _ => Err(InvalidDateKey(s.to_string())),
        }
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// The persisted record for one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaryEntry {
    pub date: DateKey,
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_mood")]
    pub mood: String,
    #[serde(default)]
    pub stickers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(
        default,
        alias = "aiEditorial",
        deserialize_with = "crate::editorial::deserialize_lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub editorial: Option<Editorial>,
}

fn default_mood() -> String {
    DEFAULT_MOOD.to_string()
}

impl DiaryEntry {
    /// The attached image, or the date's placeholder when none was stored.
    pub fn display_image_url(&self) -> String {
        match self.image_url.as_deref() {
            Some(url) if !url.trim().is_empty() => url.to_string(),
            _ => self.date.placeholder_image_url(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    #[test]
    fn date_key_round_trips_through_display() {
        let k = key("2026-03-14");
        assert_eq!(k.to_string(), "2026-03-14");
        assert_eq!(k.date(), NaiveDate::from_ymd_opt(2026, 3, 14).unwrap());
    }

    #[test]
    fn date_key_rejects_non_canonical_forms() {
        assert!("2026-3-14".parse::<DateKey>().is_err());
        assert!("2026-02-30".parse::<DateKey>().is_err());
        assert!("20260314".parse::<DateKey>().is_err());
        assert!("".parse::<DateKey>().is_err());
        assert!(" 2026-3-14".parse::<DateKey>().is_err());
        assert!("2026- 3-14".parse::<DateKey>().is_err());
        assert!("2026-03- 4".parse::<DateKey>().is_err());
    }

    #[test]
    fn placeholder_and_label_derive_from_the_date() {
        let k = key("2026-03-14");
        assert_eq!(
            k.placeholder_image_url(),
            "https://picsum.photos/seed/2026-03-14/600/400"
        );
        assert_eq!(k.long_label(), "March 14, 2026");
    }

    #[test]
    fn entry_serializes_with_camel_case_fields() {
        let entry = DiaryEntry {
            date: key("2026-03-14"),
            content: "Brunch was iconic".to_string(),
            mood: "Divine".to_string(),
            stickers: vec!["✨".to_string()],
            image_url: Some("https://example.com/a.png".to_string()),
            editorial: Some(Editorial {
                headline: "Brunch Bliss".to_string(),
                body: "A triumph.".to_string(),
            }),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["date"], "2026-03-14");
        assert_eq!(json["imageUrl"], "https://example.com/a.png");
        assert_eq!(json["editorial"]["headline"], "Brunch Bliss");

        let back: DiaryEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn browser_export_shape_decodes_its_string_editorial() {
        let raw = r#"{
            "id": "2026-03-14",
            "date": "2026-03-14",
            "content": "Matcha and a fitting",
            "mood": "Radiant",
            "stickers": ["🍵", "👠"],
            "imageUrl": "",
            "aiEditorial": "{\"headline\":\"Green Goddess\",\"editorial\":\"She sipped.\"}"
        }"#;
        let entry: DiaryEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(entry.stickers, vec!["🍵", "👠"]);
        let editorial = entry.editorial.clone().unwrap();
        assert_eq!(editorial.headline, "Green Goddess");
        assert_eq!(editorial.body, "She sipped.");
        assert_eq!(
            entry.display_image_url(),
            "https://picsum.photos/seed/2026-03-14/600/400"
        );
    }

    #[test]
    fn missing_mood_falls_back_to_the_placeholder() {
        let entry: DiaryEntry = serde_json::from_str(r#"{"date":"2026-01-01"}"#).unwrap();
        assert_eq!(entry.mood, DEFAULT_MOOD);
        assert!(entry.stickers.is_empty());
        assert!(entry.editorial.is_none());
    }
}
