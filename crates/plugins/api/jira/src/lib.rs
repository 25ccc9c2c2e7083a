//! Jira REST access for jira-mcp.
//!
//! Implements [`jira_mcp_core::IssueTracker`] against Jira Cloud (API v3)
//! and Jira Self-Hosted/Data Center (API v2). Only read endpoints are used.

mod client;
mod types;

pub use client::JiraClient;
pub use types::*;
