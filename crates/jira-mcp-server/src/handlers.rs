//! Tool handlers for MCP server.
//!
//! Validates tool calls, runs them against the issue tracker and turns the
//! outcome into tool results. Tracker failures are reported inside the
//! result (`isError: true`); malformed calls and configuration problems are
//! returned as [`ToolError`] and become JSON-RPC errors.

use jira_mcp_core::{Error, IssueTracker};
use jira_mcp_summary::{build_summary, TicketSummary};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::protocol::{JsonRpcError, ToolCallResult, ToolDefinition};
use crate::tools::{available_tools, Tool};
use crate::tracker::TrackerCell;

/// Protocol-level failure of a tool call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ToolError {
    /// No tool with this name
    #[error("Unknown tool: {0}")]
    MethodNotFound(String),

    /// Arguments violate the tool's input contract
    #[error("{0}")]
    InvalidParams(String),

    /// The tracker could not be constructed
    #[error("{0}")]
    Internal(String),
}

impl From<ToolError> for JsonRpcError {
    fn from(err: ToolError) -> Self {
        match &err {
            ToolError::MethodNotFound(_) => {
                JsonRpcError::new(JsonRpcError::METHOD_NOT_FOUND, err.to_string())
            }
            ToolError::InvalidParams(msg) => JsonRpcError::invalid_params(msg),
            ToolError::Internal(msg) => JsonRpcError::internal_error(msg),
        }
    }
}

/// Tool handler that executes tools against the issue tracker.
pub struct ToolHandler {
    tracker: TrackerCell,
}

impl ToolHandler {
    pub fn new(tracker: TrackerCell) -> Self {
        Self { tracker }
    }

    /// Get available tool definitions.
    pub fn available_tools(&self) -> Vec<ToolDefinition> {
        available_tools()
    }

    /// Mutable access to the tracker holder, for reconfiguration.
    pub(crate) fn tracker_mut(&mut self) -> &mut TrackerCell {
        &mut self.tracker
    }

    /// Execute a tool by name with arguments.
    pub async fn execute(
        &self,
        name: &str,
        arguments: Option<Value>,
    ) -> Result<ToolCallResult, ToolError> {
        tracing::info!(tool = name, "Executing tool");

        let tool = Tool::from_name(name).ok_or_else(|| ToolError::MethodNotFound(name.to_string()))?;

        let arguments = object_arguments(arguments)?;
        let issue_key = if tool.requires_issue_key() {
            Some(issue_key(&arguments)?)
        } else {
            None
        };

        let tracker = self.tracker.get().await?;
        let tracker = tracker.as_ref();

        let result = match (tool, issue_key.as_deref()) {
            (Tool::GetIssue, Some(key)) => respond(tool, tracker.get_issue(key).await),
            (Tool::GetComments, Some(key)) => respond(tool, tracker.get_comments(key).await),
            (Tool::GetTicketSummary, Some(key)) => {
                respond(tool, ticket_summary(tracker, key).await)
            }
            _ => respond(tool, tracker.list_projects().await),
        };

        Ok(result)
    }
}

/// Fetch everything a summary needs and build it.
async fn ticket_summary(
    tracker: &dyn IssueTracker,
    key: &str,
) -> jira_mcp_core::Result<TicketSummary> {
    let issue = tracker.get_issue(key).await?;
    let comments = tracker.get_comments(key).await?;
    let transitions = tracker.get_transitions(key).await?;

    Ok(build_summary(&issue, &comments, &transitions))
}

/// Serialize a tracker outcome into a tool result.
fn respond<T: Serialize>(tool: Tool, outcome: jira_mcp_core::Result<T>) -> ToolCallResult {
    let rendered = outcome.and_then(|value| serde_json::to_string_pretty(&value).map_err(Error::from));

    match rendered {
        Ok(json) => ToolCallResult::text(json),
        Err(e) => {
            tracing::error!(tool = tool.name(), error = %e, "Error {}", tool.activity());
            ToolCallResult::error(format!("Error {}: {}", tool.activity(), e))
        }
    }
}

fn object_arguments(arguments: Option<Value>) -> Result<Map<String, Value>, ToolError> {
    match arguments {
        None | Some(Value::Null) => Ok(Map::new()),
        Some(Value::Object(map)) => Ok(map),
        Some(_) => Err(ToolError::InvalidParams(
            "Tool arguments must be a JSON object".to_string(),
        )),
    }
}

fn issue_key(arguments: &Map<String, Value>) -> Result<String, ToolError> {
    match arguments.get("issue_key") {
        Some(Value::String(key)) if !key.trim().is_empty() => Ok(key.trim().to_string()),
        Some(Value::String(_)) | Some(Value::Null) | None => Err(ToolError::InvalidParams(
            "Missing issue_key parameter".to_string(),
        )),
        Some(_) => Err(ToolError::InvalidParams(
            "issue_key must be a string".to_string(),
        )),
    }
}
