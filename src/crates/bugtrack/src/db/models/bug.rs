//! Bug model for JSON file persistence

use serde::{Deserialize, Serialize};

/// Lowest accepted severity
pub const MIN_SEVERITY: u8 = 1;

/// Highest accepted severity
pub const MAX_SEVERITY: u8 = 5;

/// Reference to the user who filed a bug
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatorRef {
    /// User identifier
    #[serde(rename = "_id")]
    pub id: String,

    /// Display name at the time the bug was filed
    pub fullname: String,
}

/// A tracked defect record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bug {
    /// Unique bug identifier (UUID string, server-assigned)
    #[serde(rename = "_id")]
    pub id: String,

    /// Bug title/summary
    pub title: String,

    /// Detailed bug description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Severity from 1 (cosmetic) to 5 (critical)
    pub severity: u8,

    /// Labels in insertion order, without duplicates
    #[serde(default)]
    pub labels: Vec<String>,

    /// Creation time in epoch milliseconds (server-assigned)
    pub created_at: i64,

    /// Who filed the bug, absent for imported records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<CreatorRef>,
}

impl Bug {
    /// Create a new bug stamped with a fresh id and the current time
    pub fn new(title: impl Into<String>, severity: u8) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            description: None,
            severity,
            labels: Vec::new(),
            created_at: chrono::Utc::now().timestamp_millis(),
            creator: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = dedup_labels(labels);
        self
    }

    pub fn with_creator(mut self, creator: CreatorRef) -> Self {
        self.creator = Some(creator);
        self
    }

    pub fn with_created_at(mut self, created_at: i64) -> Self {
        self.created_at = created_at;
        self
    }

    /// Id of the creator, if any
    pub fn creator_id(&self) -> Option<&str> {
        self.creator.as_ref().map(|c| c.id.as_str())
    }
}

/// Trim labels and drop empty entries and repeats, keeping first-seen order
pub fn dedup_labels<I, S>(labels: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut out: Vec<String> = Vec::new();
    for label in labels {
        let label = label.into();
        let label = label.trim();
        if !label.is_empty() && !out.iter().any(|l| l == label) {
            out.push(label.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bug_new() {
        let bug = Bug::new("Crash on save", 4);
        assert_eq!(bug.title, "Crash on save");
        assert_eq!(bug.severity, 4);
        assert!(bug.labels.is_empty());
        assert!(bug.created_at > 0);
        assert!(uuid::Uuid::parse_str(&bug.id).is_ok());
    }

    #[test]
    fn test_dedup_labels() {
        let labels = dedup_labels(vec!["ui", " ui ", "", "backend", "ui"]);
        assert_eq!(labels, vec!["ui".to_string(), "backend".to_string()]);
    }

    #[test]
    fn test_serialized_field_names() {
        let bug = Bug::new("t", 1).with_creator(CreatorRef {
            id: "u1".to_string(),
            fullname: "Muki Ja".to_string(),
        });
        let json = serde_json::to_value(&bug).unwrap();
        assert!(json.get("_id").is_some());
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["creator"]["_id"], "u1");
        assert!(json.get("description").is_none());
    }

    #[test]
    fn test_deserialize_legacy_record_without_labels() {
        let json = r#"{"_id":"C0FF33","title":"404 Coffee Not Found","severity":2,"createdAt":1700000000000}"#;
        let bug: Bug = serde_json::from_str(json).unwrap();
        assert_eq!(bug.id, "C0FF33");
        assert!(bug.labels.is_empty());
        assert!(bug.creator.is_none());
    }
}
