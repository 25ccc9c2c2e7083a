//! MCP tool definitions.

use serde_json::{json, Value};

use crate::protocol::ToolDefinition;

/// Tools exposed by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    ListProjects,
    GetIssue,
    GetComments,
    GetTicketSummary,
}

impl Tool {
    /// Every tool, in advertised order.
    pub const ALL: [Tool; 4] = [
        Tool::ListProjects,
        Tool::GetIssue,
        Tool::GetComments,
        Tool::GetTicketSummary,
    ];

    /// Look up a tool by its wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Tool::ListProjects => "list_projects",
            Tool::GetIssue => "get_issue",
            Tool::GetComments => "get_comments",
            Tool::GetTicketSummary => "get_ticket_summary",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Tool::ListProjects => "List all projects in Jira",
            Tool::GetIssue => "Get basic information about a Jira issue",
            Tool::GetComments => "Get comments for a Jira issue",
            Tool::GetTicketSummary => {
                "Get comprehensive ticket summary including description, comments, \
                 timeline, roles, and status"
            }
        }
    }

    /// Whether the tool takes an `issue_key` argument.
    pub fn requires_issue_key(self) -> bool {
        !matches!(self, Tool::ListProjects)
    }

    /// Phrase used in soft-failure messages ("Error <activity>: ...").
    pub fn activity(self) -> &'static str {
        match self {
            Tool::ListProjects => "listing projects",
            Tool::GetIssue => "getting issue",
            Tool::GetComments => "getting comments",
            Tool::GetTicketSummary => "getting ticket summary",
        }
    }

    fn input_schema(self) -> Value {
        if !self.requires_issue_key() {
            return json!({
                "type": "object",
                "properties": {},
                "additionalProperties": false
            });
        }

        json!({
            "type": "object",
            "properties": {
                "issue_key": {
                    "type": "string",
                    "description": "The issue key (e.g., PROJ-123)"
                }
            },
            "required": ["issue_key"],
            "additionalProperties": false
        })
    }

    pub fn definition(self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
        }
    }
}

/// Available MCP tools.
pub fn available_tools() -> Vec<ToolDefinition> {
    Tool::ALL.into_iter().map(Tool::definition).collect()
}
