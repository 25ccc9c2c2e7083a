//! Jira API client implementation.
//!
//! Supports both Jira Cloud (API v3) and Jira Self-Hosted/Data Center (API v2).
//! Flavor is auto-detected from the URL: `*.atlassian.net` → Cloud, otherwise → SelfHosted.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use jira_mcp_core::{
    parse_timestamp, CommentRecord, Credentials, Error, IssueRecord, IssueTracker, ProjectRecord,
    Result, TrackerConfig, TransitionRecord, UNKNOWN_ACTOR,
};
use tracing::{debug, warn};

use crate::types::{
    JiraComment, JiraCommentsResponse, JiraIssue, JiraProject, JiraTransitionsResponse, JiraUser,
};

const USER_AGENT: &str = "jira-mcp";

/// Jira deployment flavor.
#[derive(Debug, Clone, Copy, PartialEq)]
enum JiraFlavor {
    /// Jira Cloud: API v3, ADF bodies
    Cloud,
    /// Jira Self-Hosted / Data Center: API v2, plain text
    SelfHosted,
}

/// How each request is authenticated.
#[derive(Clone)]
enum Auth {
    Basic { email: String, api_token: String },
    Bearer(String),
}

impl From<Credentials> for Auth {
    fn from(credentials: Credentials) -> Self {
        match credentials {
            Credentials::Basic { email, api_token } => Auth::Basic { email, api_token },
            // The access token identifies the session; the remaining OAuth
            // fields are validated by the config layer but not sent.
            Credentials::OAuth { access_token, .. } => Auth::Bearer(access_token),
        }
    }
}

/// Jira API client.
pub struct JiraClient {
    base_url: reqwest::Url,
    instance_url: String,
    flavor: JiraFlavor,
    auth: Auth,
    client: reqwest::Client,
}

impl JiraClient {
    /// Create a client from resolved configuration. Flavor is auto-detected
    /// from the server URL.
    pub fn from_config(config: &TrackerConfig) -> Result<Self> {
        let credentials = config.credentials()?;
        let flavor = detect_flavor(&config.server);
        let base_url = build_api_base(&config.server, flavor);

        debug!(server = %config.server, flavor = ?flavor, "Creating Jira client");

        Self::build(base_url, flavor, credentials, config.timeout_secs)
    }

    /// Create a client with an explicit API base URL (for testing with httpmock).
    /// The base URL is used as-is (no `/rest/api/N` suffix appended).
    pub fn with_base_url(
        base_url: impl Into<String>,
        credentials: Credentials,
        cloud: bool,
    ) -> Result<Self> {
        let flavor = if cloud {
            JiraFlavor::Cloud
        } else {
            JiraFlavor::SelfHosted
        };
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self::build(
            base_url,
            flavor,
            credentials,
            jira_mcp_core::config::DEFAULT_TIMEOUT_SECS,
        )
    }

    fn build(
        base_url: String,
        flavor: JiraFlavor,
        credentials: Credentials,
        timeout_secs: u64,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        let api_base = reqwest::Url::parse(&base_url)
            .map_err(|e| Error::Config(format!("Invalid Jira URL {}: {}", base_url, e)))?;
        if api_base.cannot_be_a_base() {
            return Err(Error::Config(format!("Invalid Jira URL: {}", base_url)));
        }

        let auth = Auth::from(credentials);
        if matches!(auth, Auth::Bearer(_)) {
            warn!(
                "OAuth credentials configured: only the access token is sent, as a Bearer token; \
                 Jira instances expecting OAuth 1.0a signatures will reject requests"
            );
        }

        Ok(Self {
            instance_url: instance_url_from_base(&base_url),
            base_url: api_base,
            flavor,
            auth,
            client,
        })
    }

    /// API URL below the base. Each segment is percent-encoded on its own, so
    /// an issue key can never address another resource.
    fn endpoint(&self, segments: &[&str]) -> Result<reqwest::Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("Invalid Jira URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Build request with auth header.
    fn request(&self, method: reqwest::Method, url: reqwest::Url) -> reqwest::RequestBuilder {
        let builder = self
            .client
            .request(method, url)
            .header("Accept", "application/json");

        match &self.auth {
            Auth::Basic { email, api_token } => builder.basic_auth(email, Some(api_token)),
            Auth::Bearer(token) => builder.bearer_auth(token),
        }
    }

    /// Make an authenticated GET request.
    async fn get<T: serde::de::DeserializeOwned>(&self, url: reqwest::Url) -> Result<T> {
        debug!(url = %url, "Jira GET request");

        let response = self
            .request(reqwest::Method::GET, url)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        self.handle_response(response).await
    }

    /// Handle response and map errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let status_code = status.as_u16();
            let message = response.text().await.unwrap_or_default();
            warn!(
                status = status_code,
                message = message,
                "Jira API error response"
            );
            return Err(Error::from_status(status_code, message));
        }

        response
            .json()
            .await
            .map_err(|e| Error::InvalidData(format!("Failed to parse response: {}", e)))
    }

    fn issue_url(&self, key: &str) -> String {
        format!("{}/browse/{}", self.instance_url, key)
    }

    fn map_project(&self, project: JiraProject) -> ProjectRecord {
        ProjectRecord {
            url: self.issue_url(&project.key),
            lead: user_name(project.lead.as_ref()).unwrap_or_else(|| UNKNOWN_ACTOR.to_string()),
            name: project.name.unwrap_or_else(|| project.key.clone()),
            id: project.id,
            key: project.key,
        }
    }

    fn map_issue(&self, issue: JiraIssue) -> Result<IssueRecord> {
        let fields = issue.fields;
        let created = required_timestamp(fields.created.as_deref(), "created", &issue.key)?;
        let updated = match fields.updated.as_deref() {
            Some(raw) => parse_timestamp(raw)?,
            None => created,
        };

        Ok(IssueRecord {
            url: self.issue_url(&issue.key),
            project_key: fields
                .project
                .map(|p| p.key)
                .unwrap_or_else(|| parse_jira_key(&issue.key).to_string()),
            summary: fields.summary.unwrap_or_default(),
            description: read_description(&fields.description, self.flavor).unwrap_or_default(),
            status: fields
                .status
                .map(|s| s.name)
                .unwrap_or_else(|| UNKNOWN_ACTOR.to_string()),
            issue_type: fields
                .issue_type
                .map(|t| t.name)
                .unwrap_or_else(|| UNKNOWN_ACTOR.to_string()),
            created,
            updated,
            reporter: user_name(fields.reporter.as_ref())
                .unwrap_or_else(|| UNKNOWN_ACTOR.to_string()),
            assignee: user_name(fields.assignee.as_ref()),
            priority: fields.priority.map(|p| p.name),
            id: issue.id,
            key: issue.key,
        })
    }

    fn map_comment(&self, comment: JiraComment) -> Result<CommentRecord> {
        let created = required_timestamp(comment.created.as_deref(), "created", &comment.id)?;
        let updated = match comment.updated.as_deref() {
            Some(raw) => parse_timestamp(raw)?,
            None => created,
        };

        Ok(CommentRecord {
            author: user_name(comment.author.as_ref()).unwrap_or_else(|| UNKNOWN_ACTOR.to_string()),
            body: read_comment_body(&comment.body, self.flavor),
            created,
            updated,
            id: comment.id,
        })
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn detect_flavor(url: &str) -> JiraFlavor {
    if url.contains(".atlassian.net") {
        JiraFlavor::Cloud
    } else {
        JiraFlavor::SelfHosted
    }
}

fn build_api_base(url: &str, flavor: JiraFlavor) -> String {
    let base = url.trim_end_matches('/');
    match flavor {
        JiraFlavor::Cloud => format!("{}/rest/api/3", base),
        JiraFlavor::SelfHosted => format!("{}/rest/api/2", base),
    }
}

fn instance_url_from_base(base_url: &str) -> String {
    base_url
        .trim_end_matches("/rest/api/3")
        .trim_end_matches("/rest/api/2")
        .to_string()
}

/// Project key part of an issue key ("PROJ-123" → "PROJ").
fn parse_jira_key(key: &str) -> &str {
    key.rsplit_once('-').map(|(project, _)| project).unwrap_or(key)
}

/// Flatten an Atlassian Document Format value to plain text.
///
/// Paragraphs of a document are separated by a blank line, hard breaks
/// become newlines, and unknown nodes contribute the text of their children.
fn adf_to_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Object(obj) => {
            let node_type = obj.get("type").and_then(|t| t.as_str());

            match node_type {
                Some("text") => {
                    return obj
                        .get("text")
                        .and_then(|t| t.as_str())
                        .unwrap_or("")
                        .to_string();
                }
                Some("hardBreak") => return "\n".to_string(),
                _ => {}
            }

            let Some(content) = obj.get("content").and_then(|c| c.as_array()) else {
                return String::new();
            };

            if node_type == Some("doc") {
                return content
                    .iter()
                    .map(adf_to_text)
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
                    .join("\n\n");
            }

            content.iter().map(adf_to_text).collect()
        }
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn read_description(value: &Option<serde_json::Value>, flavor: JiraFlavor) -> Option<String> {
    let text = match value.as_ref()? {
        serde_json::Value::Null => return None,
        serde_json::Value::String(s) => s.clone(),
        other if flavor == JiraFlavor::Cloud => adf_to_text(other),
        // Self-hosted v2 shouldn't return ADF, but keep whatever arrived
        other => other.to_string(),
    };

    (!text.is_empty()).then_some(text)
}

fn read_comment_body(value: &Option<serde_json::Value>, flavor: JiraFlavor) -> String {
    match value {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Null) | None => String::new(),
        Some(v) if flavor == JiraFlavor::Cloud => adf_to_text(v),
        Some(v) => v.to_string(),
    }
}

/// Most readable name a Jira user exposes.
fn user_name(user: Option<&JiraUser>) -> Option<String> {
    let user = user?;
    user.display_name
        .clone()
        .or_else(|| user.name.clone())
        .or_else(|| user.account_id.clone())
}

fn required_timestamp(
    value: Option<&str>,
    field: &str,
    owner: &str,
) -> Result<DateTime<FixedOffset>> {
    let raw = value.ok_or_else(|| {
        Error::InvalidData(format!("'{}' has no {} timestamp", owner, field))
    })?;
    parse_timestamp(raw)
}

// =============================================================================
// IssueTracker implementation
// =============================================================================

#[async_trait]
impl IssueTracker for JiraClient {
    async fn list_projects(&self) -> Result<Vec<ProjectRecord>> {
        let mut url = self.endpoint(&["project"])?;
        url.query_pairs_mut().append_pair("expand", "lead");
        let projects: Vec<JiraProject> = self.get(url).await?;

        debug!(count = projects.len(), "Fetched Jira projects");

        Ok(projects.into_iter().map(|p| self.map_project(p)).collect())
    }

    async fn get_issue(&self, key: &str) -> Result<IssueRecord> {
        let url = self.endpoint(&["issue", key])?;
        let issue: JiraIssue = self.get(url).await?;
        self.map_issue(issue)
    }

    async fn get_comments(&self, key: &str) -> Result<Vec<CommentRecord>> {
        let url = self.endpoint(&["issue", key, "comment"])?;
        let response: JiraCommentsResponse = self.get(url).await?;

        response
            .comments
            .into_iter()
            .map(|c| self.map_comment(c))
            .collect()
    }

    async fn get_transitions(&self, key: &str) -> Result<Vec<TransitionRecord>> {
        let url = self.endpoint(&["issue", key, "transitions"])?;
        let response: JiraTransitionsResponse = self.get(url).await?;

        Ok(response
            .transitions
            .into_iter()
            .map(|t| TransitionRecord {
                id: t.id,
                name: t.name,
                to_status: t.to.name,
            })
            .collect())
    }

    fn provider_name(&self) -> &'static str {
        "jira"
    }
}
