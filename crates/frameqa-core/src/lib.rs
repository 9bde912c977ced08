pub mod catalog;
pub mod compliance;
pub mod contrast;
pub mod details;
pub mod finding;
pub mod hierarchy;
pub mod inventory;
pub mod rules;
pub mod spacing;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub use finding::{Finding, Property, Severity, SeverityBuckets, SeveritySummary};

// --- Types (matching the design-data REST payloads) ---

/// Node kind. Kinds the analyzers care about get their own variant; anything
/// else is kept verbatim so it can be echoed back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeType {
    Frame,
    Text,
    Component,
    ComponentSet,
    Instance,
    Other(String),
}

impl NodeType {
    pub fn as_str(&self) -> &str {
        match self {
            NodeType::Frame => "FRAME",
            NodeType::Text => "TEXT",
            NodeType::Component => "COMPONENT",
            NodeType::ComponentSet => "COMPONENT_SET",
            NodeType::Instance => "INSTANCE",
            NodeType::Other(s) => s,
        }
    }
}

impl Default for NodeType {
    fn default() -> Self {
        NodeType::Other(String::new())
    }
}

impl From<String> for NodeType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "FRAME" => NodeType::Frame,
            "TEXT" => NodeType::Text,
            "COMPONENT" => NodeType::Component,
            "COMPONENT_SET" => NodeType::ComponentSet,
            "INSTANCE" => NodeType::Instance,
            _ => NodeType::Other(s),
        }
    }
}

impl From<NodeType> for String {
    fn from(t: NodeType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Colour with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Color {
    #[serde(default)]
    pub r: f64,
    #[serde(default)]
    pub g: f64,
    #[serde(default)]
    pub b: f64,
    #[serde(default = "default_alpha")]
    pub a: f64,
}

fn default_alpha() -> f64 {
    1.0
}

impl Color {
    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Quantize to 0-255 integer channels.
    pub fn to_rgb8(&self) -> Rgb8 {
        Rgb8 {
            r: quantize(self.r),
            g: quantize(self.g),
            b: quantize(self.b),
        }
    }
}

fn quantize(channel: f64) -> u8 {
    (channel * 255.0).round().clamp(0.0, 255.0) as u8
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const WHITE: Rgb8 = Rgb8 { r: 255, g: 255, b: 255 };
    pub const BLACK: Rgb8 = Rgb8 { r: 0, g: 0, b: 0 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RGB({}, {}, {})", self.r, self.g, self.b)
    }
}

/// A fill or stroke. Only `SOLID` paints are analyzed; other upstream fields
/// are carried along untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Paint {
    #[serde(rename = "type", default)]
    pub paint_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Paint {
    pub fn solid(color: Color) -> Self {
        Self {
            paint_type: "SOLID".to_string(),
            color: Some(color),
            ..Default::default()
        }
    }

    pub fn is_solid(&self) -> bool {
        self.paint_type == "SOLID"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Effect {
    #[serde(rename = "type", default)]
    pub effect_type: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct BoundingBox {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct FontName {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

/// REST-style text attributes (`style` object on TEXT nodes).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TypeStyle {
    #[serde(default)]
    pub font_family: Option<String>,
    #[serde(default)]
    pub font_size: Option<f64>,
    #[serde(default)]
    pub font_weight: Option<f64>,
}

/// One node of the document tree. Every field is optional on the wire; a
/// missing field never fails deserialization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub visible: Option<bool>,
    pub absolute_bounding_box: Option<BoundingBox>,
    pub background_color: Option<Color>,
    #[serde(deserialize_with = "lenient_list")]
    pub fills: Vec<Paint>,
    #[serde(deserialize_with = "lenient_list")]
    pub strokes: Vec<Paint>,
    pub stroke_weight: Option<f64>,
    pub corner_radius: Option<f64>,
    #[serde(deserialize_with = "lenient_list")]
    pub effects: Vec<Effect>,

    // Auto layout
    pub layout_mode: Option<String>,
    pub padding_top: Option<f64>,
    pub padding_right: Option<f64>,
    pub padding_bottom: Option<f64>,
    pub padding_left: Option<f64>,
    pub item_spacing: Option<f64>,
    pub counter_axis_spacing: Option<f64>,
    pub primary_axis_align_items: Option<String>,
    pub counter_axis_align_items: Option<String>,

    // Style token references
    pub fill_style_id: Option<String>,
    pub text_style_id: Option<String>,
    pub effect_style_id: Option<String>,

    // Text
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
    pub style: Option<TypeStyle>,

    // Components
    pub component_id: Option<String>,
    pub component_properties: Option<serde_json::Value>,
    pub overrides: Option<serde_json::Value>,
    pub description: Option<String>,

    #[serde(deserialize_with = "lenient_list")]
    pub children: Vec<DocumentNode>,
}

/// Non-array values (e.g. a "mixed" marker) read as an empty list.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Array(_) => serde_json::from_value(value).map_err(D::Error::custom),
        _ => Ok(Vec::new()),
    }
}

impl DocumentNode {
    pub fn is_text(&self) -> bool {
        self.node_type == NodeType::Text
    }

    pub fn solid_fills(&self) -> impl Iterator<Item = &Paint> {
        self.fills.iter().filter(|p| p.is_solid())
    }

    /// Colour of the first SOLID fill that carries one.
    pub fn first_solid_color(&self) -> Option<&Color> {
        self.fills
            .iter()
            .find(|p| p.is_solid())
            .and_then(|p| p.color.as_ref())
    }

    pub fn has_auto_layout(&self) -> bool {
        matches!(self.layout_mode.as_deref(), Some(mode) if mode != "NONE")
    }

    /// Padding sides followed by item spacing, in a fixed order.
    pub fn spacing_values(&self) -> [(&'static str, Option<f64>); 5] {
        [
            ("paddingTop", self.padding_top),
            ("paddingRight", self.padding_right),
            ("paddingBottom", self.padding_bottom),
            ("paddingLeft", self.padding_left),
            ("itemSpacing", self.item_spacing),
        ]
    }

    pub fn font_size(&self) -> Option<f64> {
        self.font_size
            .or_else(|| self.style.as_ref().and_then(|s| s.font_size))
    }

    pub fn font_weight(&self) -> Option<f64> {
        self.font_weight
            .or_else(|| self.style.as_ref().and_then(|s| s.font_weight))
    }

    pub fn font_family(&self) -> Option<&str> {
        self.font_name
            .as_ref()
            .and_then(|f| f.family.as_deref())
            .or_else(|| self.style.as_ref().and_then(|s| s.font_family.as_deref()))
    }

    /// Pre-order walk yielding `(depth, node)`, root at depth 0.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![(0, self)],
        }
    }
}

pub struct Walk<'a> {
    stack: Vec<(usize, &'a DocumentNode)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a DocumentNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().map(|c| (depth + 1, c)));
        Some((depth, node))
    }
}

/// Render a pixel quantity the way the plugin displays it ("12", "12.5").
pub fn px(value: f64) -> String {
    format!("{}px", value)
}

/// Treat `Some("")` the same as a missing reference.
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
