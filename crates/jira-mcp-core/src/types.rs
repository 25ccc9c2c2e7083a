//! Normalized tracker records.
//!
//! These are the shapes every `IssueTracker` implementation returns. They are
//! request-scoped snapshots: built from a tracker response, serialized into a
//! tool result, then dropped.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Actor name used when the tracker does not report one.
pub const UNKNOWN_ACTOR: &str = "Unknown";

/// Serialized form of an issue with no assignee.
pub const UNASSIGNED: &str = "Unassigned";

/// Serialized form of an issue with no priority.
pub const NO_PRIORITY: &str = "None";

/// Jira's own timestamp layout, e.g. `2024-01-01T10:00:00.000+0000`.
const JIRA_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

/// A tracker project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: String,
    pub key: String,
    pub name: String,
    /// Project lead display name, `"Unknown"` when not reported
    pub lead: String,
    pub url: String,
}

/// A single issue snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueRecord {
    pub id: String,
    /// Issue key (e.g., "PROJ-123")
    pub key: String,
    pub summary: String,
    /// Plain-text description, empty when the issue has none
    pub description: String,
    /// Current status name
    pub status: String,
    pub issue_type: String,
    /// Key of the owning project
    #[serde(rename = "project")]
    pub project_key: String,
    pub created: DateTime<FixedOffset>,
    pub updated: DateTime<FixedOffset>,
    /// Reporter display name, `"Unknown"` when not reported
    pub reporter: String,
    /// Assignee display name; serialized as `"Unassigned"` when absent
    #[serde(default, with = "unassigned")]
    pub assignee: Option<String>,
    /// Priority name; serialized as `"None"` when absent
    #[serde(default, with = "no_priority")]
    pub priority: Option<String>,
    /// Browser URL of the issue
    pub url: String,
}

/// A comment on an issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentRecord {
    pub id: String,
    /// Author display name, `"Unknown"` when not reported
    pub author: String,
    pub body: String,
    pub created: DateTime<FixedOffset>,
    pub updated: DateTime<FixedOffset>,
}

impl CommentRecord {
    /// Whether the comment was changed after it was posted.
    pub fn is_edited(&self) -> bool {
        self.updated != self.created
    }
}

/// A status transition currently available for an issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub id: String,
    pub name: String,
    /// Name of the status the transition leads to
    pub to_status: String,
}

/// Parse a tracker timestamp into an absolute point in time.
///
/// Accepts RFC 3339 (`2024-01-01T00:00:00Z`) as well as Jira's offset
/// layout without a colon (`2024-01-01T10:00:00.000+0000`).
pub fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_str(value, JIRA_TIMESTAMP_FORMAT))
        .map_err(|e| Error::InvalidData(format!("Invalid timestamp '{}': {}", value, e)))
}

// =============================================================================
// Sentinel-backed optional strings
// =============================================================================

fn serialize_or<S>(
    value: &Option<String>,
    sentinel: &str,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(value.as_deref().unwrap_or(sentinel))
}

fn deserialize_or<'de, D>(
    sentinel: &str,
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| v != sentinel))
}

mod unassigned {
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
        super::serialize_or(value, super::UNASSIGNED, s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        super::deserialize_or(super::UNASSIGNED, d)
    }
}

mod no_priority {
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
        super::serialize_or(value, super::NO_PRIORITY, s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        super::deserialize_or(super::NO_PRIORITY, d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_issue() -> IssueRecord {
        IssueRecord {
            id: "10001".to_string(),
            key: "PROJ-1".to_string(),
            summary: "Fix login bug".to_string(),
            description: String::new(),
            status: "Open".to_string(),
            issue_type: "Bug".to_string(),
            project_key: "PROJ".to_string(),
            created: parse_timestamp("2024-01-01T00:00:00Z").unwrap(),
            updated: parse_timestamp("2024-01-02T00:00:00Z").unwrap(),
            reporter: "Alice".to_string(),
            assignee: None,
            priority: None,
            url: "https://jira.example.com/browse/PROJ-1".to_string(),
        }
    }

    #[test]
    fn test_parse_rfc3339() {
        let ts = parse_timestamp("2024-01-01T00:00:00Z").unwrap();
        assert_eq!(ts.timestamp(), 1_704_067_200);
    }

    #[test]
    fn test_parse_jira_offset_layout() {
        let jira = parse_timestamp("2024-01-01T10:00:00.000+0000").unwrap();
        let rfc = parse_timestamp("2024-01-01T10:00:00+00:00").unwrap();
        assert_eq!(jira, rfc);

        // Same instant expressed in another offset compares equal
        let shifted = parse_timestamp("2024-01-01T12:00:00.000+0200").unwrap();
        assert_eq!(jira, shifted);
    }

    #[test]
    fn test_parse_invalid_timestamp() {
        let err = parse_timestamp("yesterday").unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
        assert!(err.to_string().contains("yesterday"));
    }

    #[test]
    fn test_issue_sentinels_serialization() {
        let json = serde_json::to_value(sample_issue()).unwrap();
        assert_eq!(json["assignee"], "Unassigned");
        assert_eq!(json["priority"], "None");
        assert_eq!(json["project"], "PROJ");
        assert_eq!(json["issue_type"], "Bug");
    }

    #[test]
    fn test_issue_sentinels_deserialize_to_none() {
        let json = serde_json::to_string(&sample_issue()).unwrap();
        let parsed: IssueRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.assignee, None);
        assert_eq!(parsed.priority, None);
        assert_eq!(parsed, sample_issue());
    }

    #[test]
    fn test_issue_assigned_serialization() {
        let mut issue = sample_issue();
        issue.assignee = Some("Bob".to_string());
        issue.priority = Some("High".to_string());

        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["assignee"], "Bob");
        assert_eq!(json["priority"], "High");
    }

    #[test]
    fn test_comment_is_edited() {
        let created = parse_timestamp("2024-01-01T10:00:00.000+0000").unwrap();
        let mut comment = CommentRecord {
            id: "100".to_string(),
            author: "Bob".to_string(),
            body: "LGTM".to_string(),
            created,
            updated: created,
        };
        assert!(!comment.is_edited());

        comment.updated = parse_timestamp("2024-01-01T11:00:00.000+0000").unwrap();
        assert!(comment.is_edited());
    }
}
