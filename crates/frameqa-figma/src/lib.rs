pub mod client;
pub mod parse;

use async_trait::async_trait;
use frameqa_core::DocumentNode;
use thiserror::Error;

pub use client::{FigmaClient, DEFAULT_API_BASE, DEFAULT_TIMEOUT};

#[derive(Debug, Error)]
pub enum FigmaError {
    /// Network failure or timeout talking to the API.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success status. `message` is the API's own `err`/`message` when it sent one.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("invalid response from design API: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid API base URL: {0}")]
    InvalidBase(String),
}

/// Read access to design files. Implemented by [`FigmaClient`]; tests plug in
/// in-memory fixtures.
#[async_trait]
pub trait DesignSource: Send + Sync {
    /// Subtree rooted at `node_id`, or `None` when the file has no such node.
    async fn node(&self, file_key: &str, node_id: &str) -> Result<Option<DocumentNode>, FigmaError>;

    /// Raw published-styles listing (`meta.styles`).
    async fn styles(&self, file_key: &str) -> Result<serde_json::Value, FigmaError>;

    /// Raw local-variables listing (`meta.variables`).
    async fn local_variables(&self, file_key: &str) -> Result<serde_json::Value, FigmaError>;
}
