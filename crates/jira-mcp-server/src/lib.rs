//! MCP (Model Context Protocol) server for jira-mcp.
//!
//! This crate implements the MCP server that exposes Jira read operations
//! (projects, issues, comments, ticket summaries) to AI assistants.

pub mod handlers;
pub mod protocol;
pub mod server;
pub mod tools;
pub mod tracker;
pub mod transport;

pub use handlers::{ToolError, ToolHandler};
pub use server::McpServer;
pub use tools::available_tools;
pub use tracker::TrackerCell;
