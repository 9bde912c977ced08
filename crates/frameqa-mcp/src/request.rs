//! Inbound request normalization. Callers speak several dialects (plain MCP
//! tool calls, JSON-RPC, ad-hoc `{tool, parameters}` and bare node references);
//! all of them resolve to one tool name plus an argument object.

use serde_json::{Map, Value};

use crate::error::ToolError;

/// Which dialect matched; used for logging only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// `{name, arguments}`
    ToolCall,
    /// `{method: "tools/call", params: {name, arguments}}`
    JsonRpcToolsCall,
    /// `{method, params}`
    JsonRpc,
    /// `{tool, parameters}`
    ToolParameters,
    /// `{fileKey, nodeId}`
    Direct,
}

/// How the result is wrapped on the way out.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    JsonRpc { id: Value },
    Content,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InboundRequest {
    /// JSON-RPC message without an `id`; acknowledged, never executed.
    Notification { method: Option<String> },
    Call {
        shape: Shape,
        envelope: Envelope,
        tool: String,
        args: Value,
    },
}

/// Loose truthiness: absent, null, false, 0 and "" are false; every object
/// and array is true.
pub fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

fn tool_name(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_jsonrpc(obj: &Map<String, Value>) -> bool {
    obj.get("jsonrpc").and_then(Value::as_str) == Some("2.0")
}

/// Resolves a body to a single tool call, trying dialects in fixed priority
/// order. Anything unrecognized fails with `INVALID_FORMAT`.
pub fn parse(body: &Value) -> Result<InboundRequest, ToolError> {
    let Some(obj) = body.as_object() else {
        return Err(ToolError::unknown_format(body.clone()));
    };

    if is_jsonrpc(obj) && !obj.contains_key("id") {
        return Ok(InboundRequest::Notification {
            method: obj.get("method").and_then(Value::as_str).map(str::to_string),
        });
    }

    let envelope = match obj.get("id") {
        Some(id) if is_jsonrpc(obj) => Envelope::JsonRpc { id: id.clone() },
        _ => Envelope::Content,
    };
    let field = |key: &str| obj.get(key);

    let (shape, tool, args) = if truthy(field("name")) && truthy(field("arguments")) {
        (Shape::ToolCall, tool_name(&obj["name"]), obj["arguments"].clone())
    } else if truthy(field("method")) && obj.contains_key("params") {
        let method = tool_name(&obj["method"]);
        let params = &obj["params"];
        if method == "tools/call" && truthy(params.get("name")) {
            let args = match params.get("arguments") {
                Some(a) if truthy(Some(a)) => a.clone(),
                _ => Value::Object(Map::new()),
            };
            (Shape::JsonRpcToolsCall, tool_name(&params["name"]), args)
        } else {
            (Shape::JsonRpc, method, params.clone())
        }
    } else if truthy(field("tool")) && truthy(field("parameters")) {
        (Shape::ToolParameters, tool_name(&obj["tool"]), obj["parameters"].clone())
    } else if truthy(field("fileKey")) && truthy(field("nodeId")) {
        (Shape::Direct, "get_node_details".to_string(), body.clone())
    } else {
        return Err(ToolError::unknown_format(body.clone()));
    };

    Ok(InboundRequest::Call {
        shape,
        envelope,
        tool,
        args,
    })
}

impl Envelope {
    /// JSON-RPC callers get `{jsonrpc, id, result}`; everyone else gets the
    /// result pretty-printed inside an MCP text content block.
    pub fn wrap(&self, result: Value) -> Result<Value, serde_json::Error> {
        Ok(match self {
            Envelope::JsonRpc { id } => serde_json::json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": result,
            }),
            Envelope::Content => serde_json::json!({
                "content": [{"type": "text", "text": serde_json::to_string_pretty(&result)?}]
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn call(body: Value) -> (Shape, Envelope, String, Value) {
        match parse(&body).unwrap() {
            InboundRequest::Call {
                shape,
                envelope,
                tool,
                args,
            } => (shape, envelope, tool, args),
            other => panic!("expected call, got {other:?}"),
        }
    }

    #[test]
    fn truthiness() {
        assert!(!truthy(None));
        assert!(!truthy(Some(&json!(null))));
        assert!(!truthy(Some(&json!(0))));
        assert!(!truthy(Some(&json!(""))));
        assert!(!truthy(Some(&json!(false))));
        assert!(truthy(Some(&json!({}))));
        assert!(truthy(Some(&json!([]))));
        assert!(truthy(Some(&json!("x"))));
        assert!(truthy(Some(&json!(-1))));
    }

    #[test]
    fn direct_node_reference() {
        let body = json!({"fileKey": "F", "nodeId": "1:2"});
        let (shape, envelope, tool, args) = call(body.clone());
        assert_eq!(shape, Shape::Direct);
        assert_eq!(envelope, Envelope::Content);
        assert_eq!(tool, "get_node_details");
        assert_eq!(args, body);
    }

    #[test]
    fn notification_wins_over_any_shape() {
        let body = json!({"jsonrpc": "2.0", "method": "notifications/initialized", "fileKey": "F", "nodeId": "1"});
        assert_eq!(
            parse(&body).unwrap(),
            InboundRequest::Notification {
                method: Some("notifications/initialized".into())
            }
        );
    }

    #[test]
    fn null_id_is_still_a_request() {
        let (_, envelope, tool, _) = call(json!({"jsonrpc": "2.0", "id": null, "method": "tools/list", "params": {}}));
        assert_eq!(envelope, Envelope::JsonRpc { id: Value::Null });
        assert_eq!(tool, "tools/list");
    }

    #[test]
    fn tools_call_unwraps_params() {
        let (shape, envelope, tool, args) = call(json!({
            "jsonrpc": "2.0", "id": 7, "method": "tools/call",
            "params": {"name": "analyze_hierarchy", "arguments": {"fileKey": "F", "nodeId": "1"}}
        }));
        assert_eq!(shape, Shape::JsonRpcToolsCall);
        assert_eq!(envelope, Envelope::JsonRpc { id: json!(7) });
        assert_eq!(tool, "analyze_hierarchy");
        assert_eq!(args["nodeId"], "1");

        let (_, _, _, args) = call(json!({"method": "tools/call", "params": {"name": "x"}}));
        assert_eq!(args, json!({}));
    }

    #[test]
    fn method_with_null_params() {
        let (shape, _, tool, args) = call(json!({"method": "initialize", "params": null}));
        assert_eq!(shape, Shape::JsonRpc);
        assert_eq!(tool, "initialize");
        assert_eq!(args, Value::Null);
    }

    #[test]
    fn priority_order() {
        let (shape, _, tool, _) = call(json!({
            "name": "get_typography", "arguments": {"a": 1},
            "tool": "get_components", "parameters": {"b": 2}
        }));
        assert_eq!(shape, Shape::ToolCall);
        assert_eq!(tool, "get_typography");

        // Empty arguments string is falsy, so the next dialect is tried.
        let (shape, _, tool, _) = call(json!({
            "name": "get_typography", "arguments": "",
            "tool": "get_components", "parameters": {"b": 2}
        }));
        assert_eq!(shape, Shape::ToolParameters);
        assert_eq!(tool, "get_components");
    }

    #[test]
    fn unrecognized_bodies_fail_closed() {
        for body in [json!({}), json!({"fileKey": "F"}), json!([1, 2]), json!("text")] {
            let err = parse(&body).unwrap_err();
            assert_eq!(err.code(), "INVALID_FORMAT");
            assert_eq!(err.to_body()["error"]["receivedBody"], body);
        }
    }

    #[test]
    fn wraps_results() {
        let wrapped = Envelope::JsonRpc { id: json!("a") }.wrap(json!({"ok": true})).unwrap();
        assert_eq!(wrapped, json!({"jsonrpc": "2.0", "id": "a", "result": {"ok": true}}));

        let wrapped = Envelope::Content.wrap(json!({"ok": true})).unwrap();
        assert_eq!(wrapped["content"][0]["type"], "text");
        assert_eq!(wrapped["content"][0]["text"], "{\n  \"ok\": true\n}");
    }
}
