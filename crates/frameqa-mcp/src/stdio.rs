use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler, ServiceExt,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::{
    error::ToolResult,
    tools::{self, ToolCall},
    AppState,
};

const INSTRUCTIONS: &str = "\
frameqa inspects Figma frames for design-system drift. Every tool takes a Figma file key \
(the segment after /file/ or /design/ in a Figma URL) and, where relevant, a node id in \
the `1:23` form. Results are JSON.";

// --- Request types ---

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
struct NodeRequest {
    /// The Figma file key
    file_key: String,
    /// The node ID, e.g. "1:23"
    node_id: String,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
struct DesignSystemRequest {
    /// The Figma file key of the design system library
    design_system_file_key: String,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
struct ComplianceRequest {
    /// The Figma file key
    file_key: String,
    /// The node ID to check
    node_id: String,
    /// The design system file key to validate against
    design_system_file_key: String,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
struct FileRequest {
    /// The Figma file key
    file_key: String,
}

// --- Server ---

#[derive(Clone)]
pub struct FrameQaServer {
    state: AppState,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl FrameQaServer {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            tool_router: Self::tool_router(),
        }
    }

    /// Same dispatch as `POST /mcp`: arguments go through `ToolCall::parse`
    /// so blank ids are rejected before any upstream call. Failures come back
    /// as tool errors carrying the `{error: {code, message}}` body.
    async fn run<T: Serialize>(&self, tool: &str, req: &T) -> Result<CallToolResult, McpError> {
        let (ok, body) = match self.call(tool, req).await {
            Ok(result) => (true, result),
            Err(e) => {
                warn!(tool, code = e.code(), error = %e, "tool failed");
                (false, e.to_body())
            }
        };
        let text = serde_json::to_string_pretty(&body)
            .unwrap_or_else(|e| format!("Serialization error: {}", e));
        Ok(if ok {
            CallToolResult::success(vec![Content::text(text)])
        } else {
            CallToolResult::error(vec![Content::text(text)])
        })
    }

    async fn call<T: Serialize>(&self, tool: &str, req: &T) -> ToolResult<Value> {
        let source = self.state.source()?;
        let call = ToolCall::parse(tool, &serde_json::to_value(req)?)?;
        tools::execute(source, &call).await
    }

    #[tool(description = "Fetch detailed properties of a Figma node including dimensions, colors, layout, and children")]
    async fn get_node_details(
        &self,
        Parameters(req): Parameters<NodeRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.run("get_node_details", &req).await
    }

    #[tool(description = "Fetch all color styles, text styles, effect styles, and spacing variables from a design system file")]
    async fn get_design_system(
        &self,
        Parameters(req): Parameters<DesignSystemRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.run("get_design_system", &req).await
    }

    #[tool(
        description = "Check if a node and its children are using proper design system tokens (color styles, text styles, effect styles) instead of hard-coded values, and whether auto-layout spacing sits on the 8px grid. Returns violations with node paths, severities and a compliance score."
    )]
    async fn verify_design_system_compliance(
        &self,
        Parameters(req): Parameters<ComplianceRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.run("verify_design_system_compliance", &req).await
    }

    #[tool(description = "Analyze if a node's spacing values comply with the 8px grid system")]
    async fn analyze_spacing(
        &self,
        Parameters(req): Parameters<NodeRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.run("analyze_spacing", &req).await
    }

    #[tool(description = "Get all color and text styles defined in a Figma file")]
    async fn get_file_styles(
        &self,
        Parameters(req): Parameters<FileRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.run("get_file_styles", &req).await
    }

    #[tool(description = "Get all text nodes with font properties, sizes, and line heights")]
    async fn get_typography(
        &self,
        Parameters(req): Parameters<NodeRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.run("get_typography", &req).await
    }

    #[tool(description = "Get all colors used in fills and strokes")]
    async fn get_color_analysis(
        &self,
        Parameters(req): Parameters<NodeRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.run("get_color_analysis", &req).await
    }

    #[tool(description = "Check WCAG 2.1 contrast ratios for all text elements")]
    async fn check_wcag_contrast(
        &self,
        Parameters(req): Parameters<NodeRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.run("check_wcag_contrast", &req).await
    }

    #[tool(description = "Find all component instances and master components")]
    async fn get_components(
        &self,
        Parameters(req): Parameters<NodeRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.run("get_components", &req).await
    }

    #[tool(description = "Analyze nesting depth and visual hierarchy")]
    async fn analyze_hierarchy(
        &self,
        Parameters(req): Parameters<NodeRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.run("analyze_hierarchy", &req).await
    }
}

#[tool_handler]
impl ServerHandler for FrameQaServer {
    fn get_info(&self) -> ServerInfo {
        let instructions = format!(
            "{}\n\n## Design QA Rules\n{}",
            INSTRUCTIONS,
            frameqa_core::rules::RULES
        );
        ServerInfo {
            instructions: Some(instructions.into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

/// Serves MCP over stdin/stdout until the client disconnects.
pub async fn serve(state: AppState) -> anyhow::Result<()> {
    info!(has_token = state.has_token(), "starting stdio MCP server");
    let service = FrameQaServer::new(state)
        .serve(rmcp::transport::io::stdio())
        .await
        .inspect_err(|e| warn!(error = %e, "MCP server error"))?;
    service.waiting().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use async_trait::async_trait;
    use frameqa_core::DocumentNode;
    use frameqa_figma::{DesignSource, FigmaError};

    use super::*;

    /// Counts every upstream request and answers with empty payloads.
    #[derive(Default)]
    struct CountingSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl DesignSource for CountingSource {
        async fn node(&self, _: &str, _: &str) -> Result<Option<DocumentNode>, FigmaError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(None)
        }

        async fn styles(&self, _: &str) -> Result<Value, FigmaError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(serde_json::json!({"meta": {"styles": []}}))
        }

        async fn local_variables(&self, _: &str) -> Result<Value, FigmaError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(serde_json::json!({"meta": {"variables": {}}}))
        }
    }

    fn text_of(result: &CallToolResult) -> String {
        result
            .content
            .iter()
            .filter_map(|c| c.as_text().map(|t| t.text.clone()))
            .collect()
    }

    #[tokio::test]
    async fn tools_fail_without_token() {
        let server = FrameQaServer::new(AppState::without_token());
        let req = FileRequest { file_key: "F".into() };
        let result = server.run("get_file_styles", &req).await.unwrap();
        assert_eq!(result.is_error, Some(true));
        assert!(text_of(&result).contains("NO_TOKEN"));
    }

    #[tokio::test]
    async fn blank_ids_are_rejected_before_fetching() {
        let source = Arc::new(CountingSource::default());
        let server = FrameQaServer::new(AppState::new(source.clone()));

        let result = server
            .get_node_details(Parameters(NodeRequest {
                file_key: String::new(),
                node_id: String::new(),
            }))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert!(text_of(&result).contains("MISSING_PARAMS"));

        let result = server
            .verify_design_system_compliance(Parameters(ComplianceRequest {
                file_key: "F".into(),
                node_id: "1:2".into(),
                design_system_file_key: String::new(),
            }))
            .await
            .unwrap();
        assert!(text_of(&result).contains("MISSING_PARAMS"));

        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn valid_request_reaches_source() {
        let source = Arc::new(CountingSource::default());
        let server = FrameQaServer::new(AppState::new(source.clone()));
        let result = server
            .get_file_styles(Parameters(FileRequest { file_key: "F".into() }))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(false));
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn instructions_carry_rules() {
        let info = FrameQaServer::new(AppState::without_token()).get_info();
        let instructions = info.instructions.unwrap_or_default();
        assert!(instructions.contains("8px grid"));
    }
}
