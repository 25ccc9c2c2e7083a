//! Lazily constructed issue tracker shared by all tool calls.

use std::sync::Arc;

use jira_mcp_client::JiraClient;
use jira_mcp_core::{IssueTracker, TrackerConfig};
use tokio::sync::OnceCell;

use crate::handlers::ToolError;

type Factory = Box<dyn Fn() -> jira_mcp_core::Result<Arc<dyn IssueTracker>> + Send + Sync>;

/// Holds the process-wide tracker, built on first use.
///
/// The construction outcome is kept, failure included: once the factory has
/// failed, every later request gets the same error until [`reset`] is called.
///
/// [`reset`]: TrackerCell::reset
pub struct TrackerCell {
    factory: Factory,
    cell: OnceCell<Result<Arc<dyn IssueTracker>, String>>,
}

impl TrackerCell {
    /// Create a holder that builds its tracker with `factory`.
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> jira_mcp_core::Result<Arc<dyn IssueTracker>> + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(factory),
            cell: OnceCell::new(),
        }
    }

    /// Jira client resolved from the config file and environment.
    pub fn jira() -> Self {
        Self::new(|| {
            let config = TrackerConfig::from_env()?;
            let client = JiraClient::from_config(&config)?;
            Ok(Arc::new(client) as Arc<dyn IssueTracker>)
        })
    }

    /// A holder that is already initialized with `tracker`.
    pub fn with_tracker(tracker: Arc<dyn IssueTracker>) -> Self {
        let shared = tracker.clone();
        Self {
            factory: Box::new(move || Ok(shared.clone())),
            cell: OnceCell::new_with(Some(Ok(tracker))),
        }
    }

    /// Get the tracker, constructing it on the first call.
    ///
    /// Concurrent first calls run the factory once.
    pub async fn get(&self) -> Result<Arc<dyn IssueTracker>, ToolError> {
        let outcome = self
            .cell
            .get_or_init(|| async {
                match (self.factory)() {
                    Ok(tracker) => {
                        tracing::info!(provider = tracker.provider_name(), "Issue tracker ready");
                        Ok(tracker)
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to create issue tracker");
                        Err(e.to_string())
                    }
                }
            })
            .await;

        outcome.clone().map_err(ToolError::Internal)
    }

    /// Whether construction has been attempted.
    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }

    /// Forget the stored outcome so the next call constructs again.
    pub fn reset(&mut self) {
        tracing::info!("Resetting issue tracker");
        self.cell = OnceCell::new();
    }
}
