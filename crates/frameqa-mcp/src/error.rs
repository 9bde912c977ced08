use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use frameqa_figma::FigmaError;
use serde_json::{json, Value};
use thiserror::Error;

use crate::tools::TOOL_NAMES;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("FIGMA_TOKEN environment variable not set")]
    NoToken,

    #[error("{message}")]
    InvalidFormat { message: String, received_body: Value },

    #[error("Tool \"{0}\" not found")]
    UnknownTool(String),

    #[error("{0}")]
    MissingParams(&'static str),

    #[error("{0}")]
    NodeNotFound(String),

    #[error("{0}")]
    Figma(#[from] FigmaError),

    /// The style catalog of the reference file could not be fetched.
    #[error("Failed to fetch design system")]
    DesignSystem(#[source] FigmaError),

    #[error("{0}")]
    Internal(String),
}

impl ToolError {
    pub fn unknown_format(received_body: Value) -> Self {
        ToolError::InvalidFormat {
            message: "Unknown request format".to_string(),
            received_body,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ToolError::NoToken => "NO_TOKEN",
            ToolError::InvalidFormat { .. } => "INVALID_FORMAT",
            ToolError::UnknownTool(_) => "UNKNOWN_TOOL",
            ToolError::MissingParams(_) => "MISSING_PARAMS",
            ToolError::NodeNotFound(_) => "NODE_NOT_FOUND",
            ToolError::Figma(FigmaError::Decode(_)) => "INTERNAL_ERROR",
            ToolError::Figma(_) => "FIGMA_API_ERROR",
            ToolError::DesignSystem(_) => "DESIGN_SYSTEM_ERROR",
            ToolError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ToolError::InvalidFormat { .. }
            | ToolError::UnknownTool(_)
            | ToolError::MissingParams(_) => StatusCode::BAD_REQUEST,
            ToolError::NodeNotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// `{error: {code, message, ...}}` as sent to clients of both transports.
    pub fn to_body(&self) -> Value {
        let mut error = json!({
            "code": self.code(),
            "message": self.to_string(),
        });
        match self {
            ToolError::InvalidFormat { received_body, .. } => {
                error["receivedBody"] = received_body.clone();
            }
            ToolError::UnknownTool(_) => {
                error["availableTools"] = json!(TOOL_NAMES);
            }
            _ => {}
        }
        json!({ "error": error })
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(e: serde_json::Error) -> Self {
        ToolError::Internal(e.to_string())
    }
}

impl IntoResponse for ToolError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.to_body())).into_response()
    }
}

pub type ToolResult<T> = Result<T, ToolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_tool_lists_available_tools() {
        let body = ToolError::UnknownTool("nope".into()).to_body();
        assert_eq!(body["error"]["code"], "UNKNOWN_TOOL");
        assert_eq!(body["error"]["message"], "Tool \"nope\" not found");
        assert_eq!(body["error"]["availableTools"].as_array().map(Vec::len), Some(10));
    }

    #[test]
    fn upstream_errors_split_by_kind() {
        let api = ToolError::from(FigmaError::Api {
            status: 403,
            message: "Invalid token".into(),
        });
        assert_eq!(api.code(), "FIGMA_API_ERROR");
        assert_eq!(api.to_string(), "Invalid token");
        assert_eq!(api.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let decode = serde_json::from_str::<Value>("{").unwrap_err();
        assert_eq!(ToolError::from(FigmaError::Decode(decode)).code(), "INTERNAL_ERROR");

        let ds = ToolError::DesignSystem(FigmaError::Api {
            status: 404,
            message: "Not found".into(),
        });
        assert_eq!(ds.code(), "DESIGN_SYSTEM_ERROR");
        assert_eq!(ds.to_string(), "Failed to fetch design system");
    }

    #[test]
    fn invalid_format_echoes_body() {
        let err = ToolError::unknown_format(json!({"foo": 1}));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_body()["error"]["receivedBody"]["foo"], 1);
    }
}
