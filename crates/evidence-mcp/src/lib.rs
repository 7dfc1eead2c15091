//! # evidence-mcp
//!
//! Model Context Protocol adapter for `evidence-core`.
//!
//! Registers `validate_evidence_claim` and `check_evidence_required` as MCP
//! tools and serves them as newline-delimited JSON-RPC 2.0 over stdio.
//! Stdout carries protocol messages only; logs belong on stderr.
//!
//! ## Example
//!
//! ```rust,ignore
//! use evidence_mcp::{serve_stdio, EvidenceServer, ServerConfig};
//!
//! let server = EvidenceServer::new(ServerConfig::default());
//! serve_stdio(&server).await?;
//! ```

pub mod config;
pub mod jsonrpc;
pub mod server;
pub mod transport;

pub use config::{ConfigError, ServerConfig};
pub use server::EvidenceServer;
pub use transport::{serve, serve_stdio};

use thiserror::Error;

/// Errors from the adapter.
#[derive(Error, Debug)]
pub enum McpError {
    #[error("Transport I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode response: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
