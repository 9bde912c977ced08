pub mod config;
pub mod error;
pub mod http;
pub mod request;
pub mod stdio;
pub mod tools;

use std::sync::Arc;

use frameqa_figma::{DesignSource, FigmaClient, FigmaError};

pub use error::{ToolError, ToolResult};
pub use http::create_router;

/// Shared, read-only state of both transports.
#[derive(Clone)]
pub struct AppState {
    source: Option<Arc<dyn DesignSource>>,
}

impl AppState {
    pub fn new(source: Arc<dyn DesignSource>) -> Self {
        Self {
            source: Some(source),
        }
    }

    /// State with no upstream access; every tool call fails with `NO_TOKEN`.
    pub fn without_token() -> Self {
        Self { source: None }
    }

    pub fn from_config(cli: &config::Cli) -> Result<Self, FigmaError> {
        match cli.token() {
            Some(token) => {
                let client = FigmaClient::new(token, &cli.api_base, cli.timeout())?;
                Ok(Self::new(Arc::new(client)))
            }
            None => Ok(Self::without_token()),
        }
    }

    pub fn has_token(&self) -> bool {
        self.source.is_some()
    }

    pub fn source(&self) -> ToolResult<&dyn DesignSource> {
        self.source.as_deref().ok_or(ToolError::NoToken)
    }
}
