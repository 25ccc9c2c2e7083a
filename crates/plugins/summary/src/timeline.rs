//! Timeline reconstruction from an issue and its comments.

use chrono::{DateTime, FixedOffset};
use jira_mcp_core::{CommentRecord, IssueRecord, UNKNOWN_ACTOR};
use serde::{Deserialize, Serialize};

/// Kind of timeline event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Created,
    Comment,
    CommentEdited,
    Updated,
}

/// A single entry in a ticket timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub timestamp: DateTime<FixedOffset>,
    pub actor: String,
    pub details: String,
}

impl TimelineEvent {
    fn new(kind: EventKind, timestamp: DateTime<FixedOffset>, actor: &str, details: String) -> Self {
        Self {
            kind,
            timestamp,
            actor: actor.to_string(),
            details,
        }
    }
}

/// Build the chronological event list for an issue.
///
/// Events are ordered by absolute instant; events sharing an instant keep
/// the order in which they were produced (creation, then comments in input
/// order, each comment followed by its edit).
pub fn build_timeline(issue: &IssueRecord, comments: &[CommentRecord]) -> Vec<TimelineEvent> {
    let mut timeline = Vec::with_capacity(1 + comments.len() * 2);

    timeline.push(TimelineEvent::new(
        EventKind::Created,
        issue.created,
        &issue.reporter,
        format!("Ticket created by {}", issue.reporter),
    ));

    for comment in comments {
        timeline.push(TimelineEvent::new(
            EventKind::Comment,
            comment.created,
            &comment.author,
            format!("Comment added by {}", comment.author),
        ));

        if comment.is_edited() {
            timeline.push(TimelineEvent::new(
                EventKind::CommentEdited,
                comment.updated,
                &comment.author,
                format!("Comment edited by {}", comment.author),
            ));
        }
    }

    // The issue's own update is usually the last comment; only record it
    // when no event already sits at that instant.
    if issue.updated != issue.created && !timeline.iter().any(|e| e.timestamp == issue.updated) {
        timeline.push(TimelineEvent::new(
            EventKind::Updated,
            issue.updated,
            UNKNOWN_ACTOR,
            "Ticket updated".to_string(),
        ));
    }

    // sort_by_key is stable
    timeline.sort_by_key(|e| e.timestamp);
    timeline
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{comment, issue, ts};

    #[test]
    fn test_created_only() {
        let issue = issue("Alice", None, "2024-01-01T00:00:00Z", "2024-01-01T00:00:00Z");
        let timeline = build_timeline(&issue, &[]);

        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline[0].kind, EventKind::Created);
        assert_eq!(timeline[0].actor, "Alice");
        assert_eq!(timeline[0].details, "Ticket created by Alice");
    }

    #[test]
    fn test_update_coinciding_with_comment_is_deduplicated() {
        let issue = issue("Alice", None, "2024-01-01T00:00:00Z", "2024-01-02T00:00:00Z");
        let comments = vec![comment(
            "Bob",
            "2024-01-02T00:00:00Z",
            "2024-01-02T00:00:00Z",
        )];

        let timeline = build_timeline(&issue, &comments);

        let kinds: Vec<EventKind> = timeline.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EventKind::Created, EventKind::Comment]);
    }

    #[test]
    fn test_update_event_added_when_distinct() {
        let issue = issue("Alice", None, "2024-01-01T00:00:00Z", "2024-01-03T00:00:00Z");
        let comments = vec![comment(
            "Bob",
            "2024-01-02T00:00:00Z",
            "2024-01-02T00:00:00Z",
        )];

        let timeline = build_timeline(&issue, &comments);

        assert_eq!(timeline.len(), 3);
        let last = timeline.last().unwrap();
        assert_eq!(last.kind, EventKind::Updated);
        assert_eq!(last.actor, "Unknown");
        assert_eq!(last.details, "Ticket updated");
    }

    #[test]
    fn test_update_dedup_compares_instants_across_offsets() {
        // Same instant as the comment, written with a different offset
        let issue = issue(
            "Alice",
            None,
            "2024-01-01T00:00:00Z",
            "2024-01-02T02:00:00+02:00",
        );
        let comments = vec![comment(
            "Bob",
            "2024-01-02T00:00:00Z",
            "2024-01-02T00:00:00Z",
        )];

        let timeline = build_timeline(&issue, &comments);
        assert!(timeline.iter().all(|e| e.kind != EventKind::Updated));
    }

    #[test]
    fn test_edited_comment_adds_event() {
        let issue = issue("Alice", None, "2024-01-01T00:00:00Z", "2024-01-01T00:00:00Z");
        let comments = vec![comment(
            "Bob",
            "2024-01-02T00:00:00Z",
            "2024-01-04T00:00:00Z",
        )];

        let timeline = build_timeline(&issue, &comments);

        assert_eq!(timeline.len(), 3);
        assert_eq!(timeline[2].kind, EventKind::CommentEdited);
        assert_eq!(timeline[2].timestamp, ts("2024-01-04T00:00:00Z"));
        assert_eq!(timeline[2].details, "Comment edited by Bob");
    }

    #[test]
    fn test_sorting_by_instant_not_input_order() {
        let issue = issue("Alice", None, "2024-01-01T00:00:00Z", "2024-01-01T00:00:00Z");
        let comments = vec![
            // Edited long after a later comment was posted
            comment("Bob", "2024-01-02T00:00:00Z", "2024-01-05T00:00:00Z"),
            comment("Carol", "2024-01-03T00:00:00Z", "2024-01-03T00:00:00Z"),
        ];

        let timeline = build_timeline(&issue, &comments);

        let actors: Vec<(&str, EventKind)> = timeline
            .iter()
            .map(|e| (e.actor.as_str(), e.kind))
            .collect();
        assert_eq!(
            actors,
            vec![
                ("Alice", EventKind::Created),
                ("Bob", EventKind::Comment),
                ("Carol", EventKind::Comment),
                ("Bob", EventKind::CommentEdited),
            ]
        );
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let issue = issue("Alice", None, "2024-01-01T00:00:00Z", "2024-01-01T00:00:00Z");
        let comments = vec![
            comment("Dan", "2024-01-02T00:00:00Z", "2024-01-02T00:00:00Z"),
            comment("Bob", "2024-01-02T00:00:00Z", "2024-01-02T00:00:00Z"),
            comment("Carol", "2024-01-02T00:00:00Z", "2024-01-02T00:00:00Z"),
        ];

        let timeline = build_timeline(&issue, &comments);

        let actors: Vec<&str> = timeline.iter().map(|e| e.actor.as_str()).collect();
        assert_eq!(actors, vec!["Alice", "Dan", "Bob", "Carol"]);
    }

    #[test]
    fn test_event_kind_serialization() {
        let event = TimelineEvent::new(
            EventKind::CommentEdited,
            ts("2024-01-02T00:00:00Z"),
            "Bob",
            "Comment edited by Bob".to_string(),
        );
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "comment_edited");
        assert_eq!(json["actor"], "Bob");
    }
}
