use chrono::Utc;
use frameqa_core::{
    catalog::{DesignSystem, StyleCatalog},
    compliance::{find_violations, ComplianceSummary},
    contrast::{check_contrast, root_background},
    details::NodeDetails,
    hierarchy::analyze_hierarchy,
    inventory::{collect_colors, collect_components, collect_typography},
    spacing::analyze_spacing,
    DocumentNode,
};
use frameqa_figma::{parse, DesignSource};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::error::{ToolError, ToolResult};

pub const PROTOCOL_VERSION: &str = "2025-03-26";
pub const SERVER_NAME: &str = "frameqa";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const TOOL_NAMES: [&str; 10] = [
    "get_node_details",
    "get_design_system",
    "verify_design_system_compliance",
    "analyze_spacing",
    "get_file_styles",
    "get_typography",
    "get_color_analysis",
    "check_wcag_contrast",
    "get_components",
    "analyze_hierarchy",
];

const NEED_NODE: &str = "Missing required parameters: fileKey and nodeId";
const NEED_DESIGN_SYSTEM: &str = "Missing required parameter: designSystemFileKey";
const NEED_COMPLIANCE: &str = "Missing required parameters: fileKey, nodeId, designSystemFileKey";
const NEED_FILE: &str = "Missing required parameter: fileKey";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRef {
    pub file_key: String,
    pub node_id: String,
}

/// A tool invocation with its required arguments already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    Initialize,
    ListTools,
    NodeDetails(NodeRef),
    DesignSystem { design_system_file_key: String },
    Compliance { node: NodeRef, design_system_file_key: String },
    Spacing(NodeRef),
    FileStyles { file_key: String },
    Typography(NodeRef),
    Colors(NodeRef),
    Contrast(NodeRef),
    Components(NodeRef),
    Hierarchy(NodeRef),
}

/// A non-empty string (or non-zero number) argument.
fn arg(args: &Value, key: &str) -> Option<String> {
    match args.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64().is_some_and(|f| f != 0.0) => Some(n.to_string()),
        _ => None,
    }
}

fn node_ref(args: &Value) -> ToolResult<NodeRef> {
    match (arg(args, "fileKey"), arg(args, "nodeId")) {
        (Some(file_key), Some(node_id)) => Ok(NodeRef { file_key, node_id }),
        _ => Err(ToolError::MissingParams(NEED_NODE)),
    }
}

impl ToolCall {
    pub fn parse(name: &str, args: &Value) -> ToolResult<Self> {
        Ok(match name {
            "initialize" => ToolCall::Initialize,
            "tools/list" => ToolCall::ListTools,
            "get_node_details" => ToolCall::NodeDetails(node_ref(args)?),
            "get_design_system" => ToolCall::DesignSystem {
                design_system_file_key: arg(args, "designSystemFileKey")
                    .ok_or(ToolError::MissingParams(NEED_DESIGN_SYSTEM))?,
            },
            "verify_design_system_compliance" => {
                match (
                    arg(args, "fileKey"),
                    arg(args, "nodeId"),
                    arg(args, "designSystemFileKey"),
                ) {
                    (Some(file_key), Some(node_id), Some(design_system_file_key)) => {
                        ToolCall::Compliance {
                            node: NodeRef { file_key, node_id },
                            design_system_file_key,
                        }
                    }
                    _ => return Err(ToolError::MissingParams(NEED_COMPLIANCE)),
                }
            }
            "analyze_spacing" => ToolCall::Spacing(node_ref(args)?),
            "get_file_styles" => ToolCall::FileStyles {
                file_key: arg(args, "fileKey").ok_or(ToolError::MissingParams(NEED_FILE))?,
            },
            "get_typography" => ToolCall::Typography(node_ref(args)?),
            "get_color_analysis" => ToolCall::Colors(node_ref(args)?),
            "check_wcag_contrast" => ToolCall::Contrast(node_ref(args)?),
            "get_components" => ToolCall::Components(node_ref(args)?),
            "analyze_hierarchy" => ToolCall::Hierarchy(node_ref(args)?),
            other => return Err(ToolError::UnknownTool(other.to_string())),
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolCall::Initialize => "initialize",
            ToolCall::ListTools => "tools/list",
            ToolCall::NodeDetails(_) => "get_node_details",
            ToolCall::DesignSystem { .. } => "get_design_system",
            ToolCall::Compliance { .. } => "verify_design_system_compliance",
            ToolCall::Spacing(_) => "analyze_spacing",
            ToolCall::FileStyles { .. } => "get_file_styles",
            ToolCall::Typography(_) => "get_typography",
            ToolCall::Colors(_) => "get_color_analysis",
            ToolCall::Contrast(_) => "check_wcag_contrast",
            ToolCall::Components(_) => "get_components",
            ToolCall::Hierarchy(_) => "analyze_hierarchy",
        }
    }
}

// --- Protocol results ---

pub fn initialize_result() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": { "tools": {} },
        "serverInfo": { "name": SERVER_NAME, "version": SERVER_VERSION },
    })
}

fn schema(props: &[(&str, &str)]) -> Value {
    let properties: serde_json::Map<String, Value> = props
        .iter()
        .map(|(name, desc)| (name.to_string(), json!({"type": "string", "description": desc})))
        .collect();
    let required: Vec<&str> = props.iter().map(|(name, _)| *name).collect();
    json!({"type": "object", "properties": properties, "required": required})
}

/// `{tools: [{name, description, inputSchema}]}` for every tool.
pub fn tool_list() -> Value {
    let node = [("fileKey", "The Figma file key"), ("nodeId", "The node ID")];
    let tools = [
        (
            "get_node_details",
            "Fetch detailed properties of a Figma node including dimensions, colors, layout, and children",
            schema(&node),
        ),
        (
            "get_design_system",
            "Fetch all color styles, text styles, effect styles, and spacing variables from a design system file",
            schema(&[("designSystemFileKey", "The Figma file key of the design system library")]),
        ),
        (
            "verify_design_system_compliance",
            "Check if a node and its children are using proper design system tokens (color styles, text styles, effect styles) instead of hard-coded values",
            schema(&[
                ("fileKey", "The Figma file key"),
                ("nodeId", "The node ID to check"),
                ("designSystemFileKey", "The design system file key to validate against"),
            ]),
        ),
        (
            "analyze_spacing",
            "Analyze if a node's spacing values comply with the 8px grid system",
            schema(&node),
        ),
        (
            "get_file_styles",
            "Get all color and text styles defined in a Figma file",
            schema(&[("fileKey", "The Figma file key")]),
        ),
        (
            "get_typography",
            "Get all text nodes with font properties, sizes, and line heights",
            schema(&node),
        ),
        (
            "get_color_analysis",
            "Get all colors used in fills and strokes",
            schema(&node),
        ),
        (
            "check_wcag_contrast",
            "Check WCAG 2.1 contrast ratios for all text elements",
            schema(&node),
        ),
        (
            "get_components",
            "Find all component instances and master components",
            schema(&node),
        ),
        (
            "analyze_hierarchy",
            "Analyze nesting depth and visual hierarchy",
            schema(&node),
        ),
    ];
    let tools: Vec<Value> = tools
        .into_iter()
        .map(|(name, description, input_schema)| {
            json!({"name": name, "description": description, "inputSchema": input_schema})
        })
        .collect();
    json!({ "tools": tools })
}

// --- Dispatch ---

/// Analyzer output scoped to the node it was run on.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Scoped<'a, T> {
    node_id: &'a str,
    node_name: &'a str,
    #[serde(flatten)]
    report: T,
}

async fn fetch_node(source: &dyn DesignSource, node: &NodeRef) -> ToolResult<DocumentNode> {
    source
        .node(&node.file_key, &node.node_id)
        .await?
        .ok_or_else(|| ToolError::NodeNotFound(format!("Node {} not found", node.node_id)))
}

/// Runs one tool. Upstream calls are made in order and the first failure
/// aborts the call.
pub async fn execute(source: &dyn DesignSource, call: &ToolCall) -> ToolResult<Value> {
    debug!(tool = call.name(), "executing tool");
    let result = match call {
        ToolCall::Initialize => initialize_result(),
        ToolCall::ListTools => tool_list(),

        ToolCall::NodeDetails(node) => {
            let doc = source
                .node(&node.file_key, &node.node_id)
                .await?
                .ok_or_else(|| {
                    ToolError::NodeNotFound(format!(
                        "Node {} not found in file {}",
                        node.node_id, node.file_key
                    ))
                })?;
            serde_json::to_value(NodeDetails::from_node(&doc))?
        }

        ToolCall::DesignSystem {
            design_system_file_key: key,
        } => {
            let styles = source.styles(key).await?;
            let variables = match source.local_variables(key).await {
                Ok(body) => Some(parse::variable_list(&body)),
                Err(e) => {
                    warn!(file_key = %key, error = %e, "local variables unavailable");
                    None
                }
            };
            let summary = DesignSystem::summarize(&parse::style_list(&styles), variables.as_deref());
            info!(
                file_key = %key,
                colors = summary.summary.total_color_styles,
                text = summary.summary.total_text_styles,
                "design system fetched"
            );
            let mut value = serde_json::to_value(summary)?;
            value["designSystemFileKey"] = json!(key);
            value["lastFetched"] = json!(Utc::now().to_rfc3339());
            value
        }

        ToolCall::Compliance {
            node,
            design_system_file_key: key,
        } => {
            let doc = fetch_node(source, node).await?;
            let styles = source.styles(key).await.map_err(ToolError::DesignSystem)?;
            let catalog = StyleCatalog::from_styles(&parse::style_list(&styles));
            let violations = find_violations(&doc, &catalog);
            let summary = ComplianceSummary::from_findings(&violations);
            info!(
                node_id = %node.node_id,
                violations = summary.violation_count,
                score = summary.compliance_score,
                "compliance check complete"
            );
            let mut value = serde_json::to_value(Scoped {
                node_id: &node.node_id,
                node_name: &doc.name,
                report: summary,
            })?;
            value["designSystemFileKey"] = json!(key);
            value["violations"] = serde_json::to_value(&violations)?;
            value["checkedAt"] = json!(Utc::now().to_rfc3339());
            value
        }

        ToolCall::Spacing(node) => {
            let doc = fetch_node(source, node).await?;
            serde_json::to_value(analyze_spacing(&doc))?
        }

        ToolCall::FileStyles { file_key } => source.styles(file_key).await?,

        ToolCall::Typography(node) => {
            let doc = fetch_node(source, node).await?;
            let typography = collect_typography(&doc);
            json!({
                "nodeId": node.node_id,
                "nodeName": doc.name,
                "textNodesFound": typography.len(),
                "typography": typography,
            })
        }

        ToolCall::Colors(node) => {
            let doc = fetch_node(source, node).await?;
            let colors = collect_colors(&doc);
            json!({
                "nodeId": node.node_id,
                "nodeName": doc.name,
                "colorsFound": colors.len(),
                "colors": colors,
                "backgroundColor": doc.background_color,
            })
        }

        ToolCall::Contrast(node) => {
            let doc = fetch_node(source, node).await?;
            let report = check_contrast(&doc, root_background(&doc));
            serde_json::to_value(Scoped {
                node_id: &node.node_id,
                node_name: &doc.name,
                report,
            })?
        }

        ToolCall::Components(node) => {
            let doc = fetch_node(source, node).await?;
            let components = collect_components(&doc);
            json!({
                "nodeId": node.node_id,
                "nodeName": doc.name,
                "componentsFound": components.len(),
                "components": components,
            })
        }

        ToolCall::Hierarchy(node) => {
            let doc = fetch_node(source, node).await?;
            serde_json::to_value(Scoped {
                node_id: &node.node_id,
                node_name: &doc.name,
                report: analyze_hierarchy(&doc),
            })?
        }
    };
    Ok(result)
}
