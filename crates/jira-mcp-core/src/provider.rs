//! Issue-tracker access trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{CommentRecord, IssueRecord, ProjectRecord, TransitionRecord};

/// Read access to an issue tracker (Jira, or a test double).
///
/// Implementations normalize the tracker's responses into the records in
/// [`crate::types`] and guarantee every timestamp is an absolute instant.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// List all projects visible to the configured credentials.
    async fn list_projects(&self) -> Result<Vec<ProjectRecord>>;

    /// Get a single issue by key (e.g., "PROJ-123").
    ///
    /// Fails with [`crate::Error::NotFound`] when the key is unknown.
    async fn get_issue(&self, key: &str) -> Result<IssueRecord>;

    /// Get comments for an issue, in tracker order.
    async fn get_comments(&self, key: &str) -> Result<Vec<CommentRecord>>;

    /// Get the transitions currently available for an issue.
    async fn get_transitions(&self, key: &str) -> Result<Vec<TransitionRecord>>;

    /// Get the provider name (e.g., "jira")
    fn provider_name(&self) -> &'static str;
}
