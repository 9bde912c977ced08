use serde::Serialize;

use crate::{BoundingBox, Color, DocumentNode, Effect, NodeType, Paint};

const MAX_FILLS: usize = 5;
const MAX_STROKES: usize = 3;
const MAX_EFFECTS: usize = 3;
const MAX_CHILDREN: usize = 20;

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Dimensions {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub x: Option<f64>,
    pub y: Option<f64>,
}

impl From<Option<BoundingBox>> for Dimensions {
    fn from(bb: Option<BoundingBox>) -> Self {
        match bb {
            Some(bb) => Self {
                width: Some(bb.width),
                height: Some(bb.height),
                x: Some(bb.x),
                y: Some(bb.y),
            },
            None => Self::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChildSummary {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub dimensions: Option<BoundingBox>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDetails {
    pub mode: String,
    pub padding: Padding,
    pub item_spacing: f64,
    pub counter_axis_spacing: f64,
    pub primary_axis_align_items: Option<String>,
    pub counter_axis_align_items: Option<String>,
}

/// Truncated view of a node: the first few paints and effects, direct
/// children only, and auto-layout settings when present.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NodeDetails {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub visible: Option<bool>,
    pub dimensions: Dimensions,
    pub background_color: Option<Color>,
    pub fills: Vec<Paint>,
    pub strokes: Vec<Paint>,
    pub stroke_weight: Option<f64>,
    pub corner_radius: Option<f64>,
    pub effects: Vec<Effect>,
    pub children: Vec<ChildSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutDetails>,
}

fn head<T: Clone>(items: &[T], n: usize) -> Vec<T> {
    items.iter().take(n).cloned().collect()
}

impl NodeDetails {
    pub fn from_node(node: &DocumentNode) -> Self {
        let layout = match node.layout_mode.as_deref() {
            Some(mode) if mode != "NONE" => Some(LayoutDetails {
                mode: mode.to_string(),
                padding: Padding {
                    top: node.padding_top.unwrap_or(0.0),
                    right: node.padding_right.unwrap_or(0.0),
                    bottom: node.padding_bottom.unwrap_or(0.0),
                    left: node.padding_left.unwrap_or(0.0),
                },
                item_spacing: node.item_spacing.unwrap_or(0.0),
                counter_axis_spacing: node.counter_axis_spacing.unwrap_or(0.0),
                primary_axis_align_items: node.primary_axis_align_items.clone(),
                counter_axis_align_items: node.counter_axis_align_items.clone(),
            }),
            _ => None,
        };

        Self {
            id: node.id.clone(),
            name: node.name.clone(),
            node_type: node.node_type.clone(),
            visible: node.visible,
            dimensions: node.absolute_bounding_box.into(),
            background_color: node.background_color,
            fills: head(&node.fills, MAX_FILLS),
            strokes: head(&node.strokes, MAX_STROKES),
            stroke_weight: node.stroke_weight,
            corner_radius: node.corner_radius,
            effects: head(&node.effects, MAX_EFFECTS),
            children: node
                .children
                .iter()
                .take(MAX_CHILDREN)
                .map(|c| ChildSummary {
                    id: c.id.clone(),
                    name: c.name.clone(),
                    node_type: c.node_type.clone(),
                    dimensions: c.absolute_bounding_box,
                })
                .collect(),
            layout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn truncates_lists_and_children() {
        let children: Vec<serde_json::Value> = (0..25)
            .map(|i| json!({"id": format!("c{i}"), "name": "child", "type": "RECTANGLE"}))
            .collect();
        let fills: Vec<serde_json::Value> = (0..7).map(|_| json!({"type": "SOLID"})).collect();
        let node: DocumentNode = serde_json::from_value(json!({
            "id": "1:1",
            "name": "Frame",
            "type": "FRAME",
            "fills": fills,
            "children": children,
            "absoluteBoundingBox": {"x": 1, "y": 2, "width": 300, "height": 200}
        }))
        .unwrap();

        let details = NodeDetails::from_node(&node);
        assert_eq!(details.fills.len(), 5);
        assert_eq!(details.children.len(), 20);
        assert_eq!(details.dimensions.width, Some(300.0));
        assert!(details.layout.is_none());

        let json = serde_json::to_value(&details).unwrap();
        assert!(json.get("layout").is_none());
        assert_eq!(json["children"][0]["type"], "RECTANGLE");
    }

    #[test]
    fn layout_defaults_missing_padding_to_zero() {
        let node = DocumentNode {
            layout_mode: Some("VERTICAL".into()),
            padding_top: Some(8.0),
            item_spacing: Some(4.0),
            ..Default::default()
        };
        let layout = NodeDetails::from_node(&node).layout.unwrap();
        assert_eq!(layout.mode, "VERTICAL");
        assert_eq!(layout.padding.top, 8.0);
        assert_eq!(layout.padding.left, 0.0);
        assert_eq!(layout.item_spacing, 4.0);
    }
}
