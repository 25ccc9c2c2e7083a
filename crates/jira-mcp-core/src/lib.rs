//! Core records, traits, and error handling for jira-mcp.
//!
//! This crate provides the foundational abstractions shared by the tracker
//! client, the summary builder, and the MCP server.

pub mod config;
pub mod error;
pub mod provider;
pub mod types;

pub use config::{Credentials, FileConfig, TrackerConfig};
pub use error::{Error, Result};
pub use provider::IssueTracker;
pub use types::*;
