use serde::Serialize;

use crate::{DocumentNode, FontName, NodeType, Paint};

// --- Components ---

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ComponentEntry {
    #[serde(rename_all = "camelCase")]
    Instance {
        id: String,
        name: String,
        component_id: Option<String>,
        component_properties: Option<serde_json::Value>,
        overrides: Option<serde_json::Value>,
    },
    Definition {
        id: String,
        name: String,
        #[serde(rename = "type")]
        node_type: NodeType,
        description: Option<String>,
    },
}

/// Instances and component definitions in traversal order.
pub fn collect_components(root: &DocumentNode) -> Vec<ComponentEntry> {
    root.walk()
        .filter_map(|(_, node)| match node.node_type {
            NodeType::Instance => Some(ComponentEntry::Instance {
                id: node.id.clone(),
                name: node.name.clone(),
                component_id: node.component_id.clone(),
                component_properties: node.component_properties.clone(),
                overrides: node.overrides.clone(),
            }),
            NodeType::Component | NodeType::ComponentSet => Some(ComponentEntry::Definition {
                id: node.id.clone(),
                name: node.name.clone(),
                node_type: node.node_type.clone(),
                description: node.description.clone(),
            }),
            _ => None,
        })
        .collect()
}

// --- Typography ---

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TypographyEntry {
    pub id: String,
    pub name: String,
    pub characters: Option<String>,
    pub font_size: Option<f64>,
    pub font_name: Option<FontName>,
    pub font_weight: Option<f64>,
    pub line_height: Option<serde_json::Value>,
    pub letter_spacing: Option<serde_json::Value>,
    pub text_align_horizontal: Option<String>,
    pub text_align_vertical: Option<String>,
    pub text_case: Option<String>,
    pub text_decoration: Option<String>,
    pub fills: Vec<Paint>,
}

pub fn collect_typography(root: &DocumentNode) -> Vec<TypographyEntry> {
    root.walk()
        .map(|(_, node)| node)
        .filter(|node| node.is_text())
        .map(|node| TypographyEntry {
            id: node.id.clone(),
            name: node.name.clone(),
            characters: node.characters.clone(),
            font_size: node.font_size(),
            font_name: node.font_name.clone().or_else(|| {
                node.font_family().map(|family| FontName {
                    family: Some(family.to_string()),
                    style: None,
                })
            }),
            font_weight: node.font_weight(),
            line_height: node.line_height.clone(),
            letter_spacing: node.letter_spacing.clone(),
            text_align_horizontal: node.text_align_horizontal.clone(),
            text_align_vertical: node.text_align_vertical.clone(),
            text_case: node.text_case.clone(),
            text_decoration: node.text_decoration.clone(),
            fills: node.fills.clone(),
        })
        .collect()
}

// --- Colours ---

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorRole {
    Fill,
    Stroke,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Paint opacity, 1 when unset.
    pub a: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ColorUsage {
    pub node_id: String,
    pub node_name: String,
    #[serde(rename = "type")]
    pub role: ColorRole,
    pub color: Rgba8,
}

/// Every SOLID fill and stroke colour; per node fills precede strokes.
pub fn collect_colors(root: &DocumentNode) -> Vec<ColorUsage> {
    let mut out = Vec::new();
    for (_, node) in root.walk() {
        let paints = node
            .fills
            .iter()
            .map(|p| (ColorRole::Fill, p))
            .chain(node.strokes.iter().map(|p| (ColorRole::Stroke, p)));
        for (role, paint) in paints {
            let Some(color) = paint.color.filter(|_| paint.is_solid()) else {
                continue;
            };
            let rgb = color.to_rgb8();
            out.push(ColorUsage {
                node_id: node.id.clone(),
                node_name: node.name.clone(),
                role,
                color: Rgba8 {
                    r: rgb.r,
                    g: rgb.g,
                    b: rgb.b,
                    a: paint.opacity.unwrap_or(1.0),
                },
            });
        }
    }
    out
}
