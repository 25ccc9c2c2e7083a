//! Role attribution for the people involved in a ticket.

use std::collections::BTreeMap;

use jira_mcp_core::{CommentRecord, IssueRecord};
use serde::{Deserialize, Serialize};

/// Part an account plays on a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Reporter,
    Assignee,
    Commenter,
}

/// Actor name → roles held, without duplicates.
pub type RoleMap = BTreeMap<String, Vec<Role>>;

fn grant(roles: &mut RoleMap, actor: &str, role: Role) {
    let held = roles.entry(actor.to_string()).or_default();
    if !held.contains(&role) {
        held.push(role);
    }
}

/// Work out who reported, owns, and discussed the issue.
pub fn identify_roles(issue: &IssueRecord, comments: &[CommentRecord]) -> RoleMap {
    let mut roles = RoleMap::new();

    grant(&mut roles, &issue.reporter, Role::Reporter);

    if let Some(assignee) = &issue.assignee {
        grant(&mut roles, assignee, Role::Assignee);
    }

    for comment in comments {
        grant(&mut roles, &comment.author, Role::Commenter);
    }

    roles
}
