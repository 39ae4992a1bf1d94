use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::dates;
use crate::error::{KronosError, Result};

pub type UserId = u32;
pub type DocumentId = u32;

/// An entity stored as a JSON document inside a per-user collection.
pub trait Document: Clone + Serialize + DeserializeOwned {
    const COLLECTION: &'static str;
}

/// A document paired with its store id. The id is `None` for entries that
/// were appended while signed out and never persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct Record<T> {
    pub id: Option<DocumentId>,
    pub data: T,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Category {
    pub name: String,
    pub color: String,
    /// Recomputed from timers for a selected range, never persisted.
    #[serde(skip)]
    pub total_hours: f64,
}

impl Document for Category {
    const COLLECTION: &'static str = "categories";
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Project {
    pub project_name: String,
    pub client: String,
    pub description: String,
}

impl Document for Project {
    const COLLECTION: &'static str = "projects";
}

/// A logged work interval. `project`, `client` and `category` are by-name
/// snapshots, not references.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Timer {
    pub project: String,
    pub client: String,
    pub category: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub description: String,
    pub hours: f64,
    pub image_base64: Option<String>,
}

impl Document for Timer {
    const COLLECTION: &'static str = "timers";
}

/// Labels a timer is filed under.
#[derive(Clone, Debug, Default)]
pub struct TimerTags {
    pub project: String,
    pub client: String,
    pub category: String,
    pub description: String,
}

impl Timer {
    /// Builds a timer from its `d/M/yyyy` date and `HH:mm` start/end times,
    /// deriving `hours`. An end before the start is rejected.
    pub fn from_times(tags: TimerTags, date: &str, start_time: &str, end_time: &str) -> Result<Self> {
        let date = dates::parse_date(date)?;
        let hours = dates::hours_between(start_time, end_time)?;
        if hours < 0.0 {
            return Err(KronosError::NegativeDuration);
        }
        Ok(Self {
            project: tags.project,
            client: tags.client,
            category: tags.category,
            date: dates::format_date(date),
            start_time: start_time.trim().to_string(),
            end_time: end_time.trim().to_string(),
            description: tags.description,
            hours,
            image_base64: None,
        })
    }

    pub fn attach_image(&mut self, bytes: &[u8]) {
        self.image_base64 = Some(STANDARD.encode(bytes));
    }

    pub fn image_bytes(&self) -> Result<Option<Vec<u8>>> {
        match &self.image_base64 {
            // Older documents may carry line-wrapped base64.
            Some(encoded) => {
                let compact: String = encoded.split_whitespace().collect();
                Ok(Some(STANDARD.decode(compact)?))
            }
            None => Ok(None),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Task {
    pub title: String,
    pub description: String,
    pub is_completed: bool,
}

impl Document for Task {
    const COLLECTION: &'static str = "tasks";
}

/// Daily-hour thresholds as the user typed them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Goals {
    pub min_goal: String,
    pub max_goal: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags() -> TimerTags {
        TimerTags {
            project: "Website".to_string(),
            client: "Acme".to_string(),
            category: "Design".to_string(),
            description: "Landing page".to_string(),
        }
    }

    #[test]
    fn timer_hours_are_derived_from_times() {
        let timer = Timer::from_times(tags(), "3/6/2024", "09:00", "11:30").unwrap();
        assert_eq!(timer.hours, 2.5);
        assert_eq!(timer.date, "3/6/2024");
    }

    #[test]
    fn timer_rejects_end_before_start() {
        let err = Timer::from_times(tags(), "3/6/2024", "11:00", "09:00").unwrap_err();
        assert!(matches!(err, KronosError::NegativeDuration));
    }

    #[test]
    fn timer_rejects_malformed_date() {
        let err = Timer::from_times(tags(), "June 3rd", "09:00", "10:00").unwrap_err();
        assert!(matches!(err, KronosError::DateParse(_)));
    }

    #[test]
    fn timer_document_uses_camel_case_fields() {
        let mut timer = Timer::from_times(tags(), "03/06/2024", "09:00", "10:00").unwrap();
        timer.attach_image(b"png");
        let value = serde_json::to_value(&timer).unwrap();
        assert_eq!(value["startTime"], "09:00");
        assert_eq!(value["imageBase64"], "cG5n");
        assert_eq!(value["date"], "3/6/2024");
        assert_eq!(timer.image_bytes().unwrap().unwrap(), b"png");
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let task: Task = serde_json::from_str(r#"{"title":"Write report"}"#).unwrap();
        assert_eq!(task.description, "");
        assert!(!task.is_completed);

        let category: Category = serde_json::from_str(r#"{"name":"Design","totalHours":4.0}"#).unwrap();
        assert_eq!(category.total_hours, 0.0);
    }
}
