//! Ticket summary builder.
//!
//! Merges an issue, its comments, and its available transitions into a single
//! navigable view for the agent:
//!
//! - **Timeline**: creation, comments, edits and the last update, in
//!   chronological order
//! - **Roles**: who reported, owns, and discussed the ticket
//!
//! Everything here is pure; callers fetch the records.
//!
//! # Example
//!
//! ```ignore
//! use jira_mcp_summary::build_summary;
//!
//! let issue = tracker.get_issue("PROJ-1").await?;
//! let comments = tracker.get_comments("PROJ-1").await?;
//! let transitions = tracker.get_transitions("PROJ-1").await?;
//!
//! let summary = build_summary(&issue, &comments, &transitions);
//! ```

pub mod roles;
pub mod timeline;

pub use roles::{identify_roles, Role, RoleMap};
pub use timeline::{build_timeline, EventKind, TimelineEvent};

use jira_mcp_core::{CommentRecord, IssueRecord, TransitionRecord, NO_PRIORITY};
use serde::{Deserialize, Serialize};

/// Aggregated view of a ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketSummary {
    pub ticket_key: String,
    pub summary: String,
    pub description: String,
    pub current_status: CurrentStatus,
    pub timeline: Vec<TimelineEvent>,
    pub roles: RoleMap,
    pub comments: Vec<CommentRecord>,
    pub urls: SummaryUrls,
}

/// Status context of a ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentStatus {
    /// Status name
    pub name: String,
    /// Issue type name
    #[serde(rename = "type")]
    pub issue_type: String,
    /// Priority name, `"None"` when unset
    pub priority: String,
    /// Names of the transitions available from the current status
    pub possible_transitions: Vec<String>,
}

/// Links to the ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryUrls {
    pub web_ui: String,
}

/// Build the summary for an issue.
pub fn build_summary(
    issue: &IssueRecord,
    comments: &[CommentRecord],
    transitions: &[TransitionRecord],
) -> TicketSummary {
    let timeline = build_timeline(issue, comments);
    let roles = identify_roles(issue, comments);

    tracing::debug!(
        issue = %issue.key,
        events = timeline.len(),
        actors = roles.len(),
        "Built ticket summary"
    );

    TicketSummary {
        ticket_key: issue.key.clone(),
        summary: issue.summary.clone(),
        description: issue.description.clone(),
        current_status: CurrentStatus {
            name: issue.status.clone(),
            issue_type: issue.issue_type.clone(),
            priority: issue
                .priority
                .clone()
                .unwrap_or_else(|| NO_PRIORITY.to_string()),
            possible_transitions: transitions.iter().map(|t| t.name.clone()).collect(),
        },
        timeline,
        roles,
        comments: comments.to_vec(),
        urls: SummaryUrls {
            web_ui: issue.url.clone(),
        },
    }
}



#[cfg(test)]
mod proptests {
    use std::collections::BTreeSet;

    use chrono::{DateTime, FixedOffset, TimeZone, Utc};
    use jira_mcp_core::{CommentRecord, IssueRecord};
    use proptest::prelude::*;

    use super::*;

    const BASE: i64 = 1_704_067_200; // 2024-01-01T00:00:00Z

    /// An instant a few seconds after BASE, written in an arbitrary offset.
    fn instant(secs: i64, offset_hours: i32) -> DateTime<FixedOffset> {
        let offset = FixedOffset::east_opt(offset_hours * 3600).unwrap();
        Utc.timestamp_opt(BASE + secs, 0)
            .unwrap()
            .with_timezone(&offset)
    }

    prop_compose! {
        fn arb_instant()(secs in 0i64..6, offset in -11i32..12) -> DateTime<FixedOffset> {
            instant(secs, offset)
        }
    }

    prop_compose! {
        fn arb_issue()(
            created in arb_instant(),
            updated in arb_instant(),
            reporter in prop::sample::select(vec!["Alice", "Bob", "Carol"]),
            assignee in prop::option::of(prop::sample::select(vec!["Alice", "Bob", "Dan"])),
        ) -> IssueRecord {
            IssueRecord {
                id: "1".to_string(),
                key: "PROJ-1".to_string(),
                summary: "s".to_string(),
                description: String::new(),
                status: "Open".to_string(),
                issue_type: "Task".to_string(),
                project_key: "PROJ".to_string(),
                created,
                updated,
                reporter: reporter.to_string(),
                assignee: assignee.map(str::to_string),
                priority: None,
                url: "https://jira.example.com/browse/PROJ-1".to_string(),
            }
        }
    }

    fn arb_comments(authors: Vec<&'static str>) -> impl Strategy<Value = Vec<CommentRecord>> {
        prop::collection::vec(
            (prop::sample::select(authors), arb_instant(), prop::bool::ANY, arb_instant()),
            0..8,
        )
        .prop_map(|raw| {
            raw.into_iter()
                .enumerate()
                .map(|(i, (author, created, edited, edit_at))| CommentRecord {
                    id: i.to_string(),
                    author: author.to_string(),
                    body: String::new(),
                    created,
                    updated: if edited { edit_at } else { created },
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn timeline_is_sorted(issue in arb_issue(), comments in arb_comments(vec!["Alice", "Bob", "Eve"])) {
            let timeline = build_timeline(&issue, &comments);
            prop_assert!(timeline.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        }

        #[test]
        fn timeline_ties_keep_insertion_order(issue in arb_issue(), comments in arb_comments(vec!["x"])) {
            // Give every comment a distinct author so events can be traced
            // back to their insertion position.
            let comments: Vec<CommentRecord> = comments
                .into_iter()
                .enumerate()
                .map(|(i, c)| CommentRecord { author: format!("user{}", i), ..c })
                .collect();

            let rank = |e: &TimelineEvent| -> usize {
                let index = || e.actor.trim_start_matches("user").parse::<usize>().unwrap();
                match e.kind {
                    EventKind::Created => 0,
                    EventKind::Comment => 1 + 2 * index(),
                    EventKind::CommentEdited => 2 + 2 * index(),
                    EventKind::Updated => usize::MAX,
                }
            };

            let timeline = build_timeline(&issue, &comments);
            for w in timeline.windows(2) {
                if w[0].timestamp == w[1].timestamp {
                    prop_assert!(rank(&w[0]) < rank(&w[1]));
                }
            }
        }

        #[test]
        fn edits_and_updates_follow_timestamps(issue in arb_issue(), comments in arb_comments(vec!["Alice", "Bob"])) {
            let timeline = build_timeline(&issue, &comments);

            let edited = comments.iter().filter(|c| c.updated != c.created).count();
            let edit_events = timeline.iter().filter(|e| e.kind == EventKind::CommentEdited).count();
            prop_assert_eq!(edited, edit_events);

            let updates = timeline.iter().filter(|e| e.kind == EventKind::Updated).count();
            if issue.updated == issue.created {
                prop_assert_eq!(updates, 0);
            }
            prop_assert!(updates <= 1);
            prop_assert!(timeline.iter().any(|e| e.timestamp == issue.updated));
        }

        #[test]
        fn role_keys_match_participants(issue in arb_issue(), comments in arb_comments(vec!["Alice", "Bob", "Eve"])) {
            let roles = identify_roles(&issue, &comments);

            let mut expected: BTreeSet<String> = BTreeSet::new();
            expected.insert(issue.reporter.clone());
            if let Some(assignee) = &issue.assignee {
                expected.insert(assignee.clone());
            }
            expected.extend(comments.iter().map(|c| c.author.clone()));

            let actual: BTreeSet<String> = roles.keys().cloned().collect();
            prop_assert_eq!(actual, expected);

            for held in roles.values() {
                let unique: BTreeSet<_> = held.iter().map(|r| format!("{:?}", r)).collect();
                prop_assert_eq!(unique.len(), held.len());
            }
        }
    }
}
