//! Style catalog and design-system summary built from a file's published
//! styles and local variables.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum StyleType {
    Fill,
    Text,
    Effect,
    Grid,
    Other(String),
}

impl From<String> for StyleType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "FILL" => StyleType::Fill,
            "TEXT" => StyleType::Text,
            "EFFECT" => StyleType::Effect,
            "GRID" => StyleType::Grid,
            _ => StyleType::Other(s),
        }
    }
}

impl From<StyleType> for String {
    fn from(t: StyleType) -> Self {
        match t {
            StyleType::Fill => "FILL".to_string(),
            StyleType::Text => "TEXT".to_string(),
            StyleType::Effect => "EFFECT".to_string(),
            StyleType::Grid => "GRID".to_string(),
            StyleType::Other(s) => s,
        }
    }
}

/// Entry of the `meta.styles` listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StyleMeta {
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub style_type: StyleType,
}

/// Entry of the `meta.variables` map.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub resolved_type: String,
    #[serde(default)]
    pub values_by_mode: serde_json::Map<String, serde_json::Value>,
}

/// Reference key sets. Membership is exact string equality.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleCatalog {
    pub color_keys: HashSet<String>,
    pub text_keys: HashSet<String>,
    pub effect_keys: HashSet<String>,
}

impl StyleCatalog {
    pub fn from_styles(styles: &[StyleMeta]) -> Self {
        let mut catalog = Self::default();
        for style in styles {
            let set = match style.style_type {
                StyleType::Fill => &mut catalog.color_keys,
                StyleType::Text => &mut catalog.text_keys,
                StyleType::Effect => &mut catalog.effect_keys,
                _ => continue,
            };
            set.insert(style.key.clone());
        }
        catalog
    }

    pub fn has_color(&self, key: &str) -> bool {
        self.color_keys.contains(key)
    }

    pub fn has_text(&self, key: &str) -> bool {
        self.text_keys.contains(key)
    }

    pub fn has_effect(&self, key: &str) -> bool {
        self.effect_keys.contains(key)
    }
}

// --- Design system summary ---

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StyleEntry {
    pub key: String,
    pub name: String,
    pub description: String,
}

impl From<&StyleMeta> for StyleEntry {
    fn from(s: &StyleMeta) -> Self {
        Self {
            key: s.key.clone(),
            name: s.name.clone(),
            description: s.description.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ColorVariable {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SpacingVariable {
    pub id: String,
    pub name: String,
    /// Value in the first mode, if any.
    pub value: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ColorGroup {
    pub styles_count: usize,
    pub variables_count: usize,
    pub styles: Vec<StyleEntry>,
    pub variables: Vec<ColorVariable>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StyleGroup {
    pub styles_count: usize,
    pub styles: Vec<StyleEntry>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpacingGroup {
    pub variables_count: usize,
    pub variables: Vec<SpacingVariable>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DesignSystemTotals {
    pub total_color_styles: usize,
    pub total_text_styles: usize,
    pub total_effect_styles: usize,
    pub total_spacing_variables: usize,
    pub has_variables: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DesignSystem {
    pub colors: ColorGroup,
    pub typography: StyleGroup,
    pub effects: StyleGroup,
    pub spacing: SpacingGroup,
    pub summary: DesignSystemTotals,
}

impl DesignSystem {
    /// `variables` is `None` when the variables listing could not be fetched.
    pub fn summarize(styles: &[StyleMeta], variables: Option<&[Variable]>) -> Self {
        let pick = |t: StyleType| -> Vec<StyleEntry> {
            styles
                .iter()
                .filter(|s| s.style_type == t)
                .map(StyleEntry::from)
                .collect()
        };
        let color_styles = pick(StyleType::Fill);
        let text_styles = pick(StyleType::Text);
        let effect_styles = pick(StyleType::Effect);

        let mut spacing_vars = Vec::new();
        let mut color_vars = Vec::new();
        for var in variables.unwrap_or_default() {
            match var.resolved_type.as_str() {
                "FLOAT" if var.name.to_lowercase().contains("spacing") => {
                    spacing_vars.push(SpacingVariable {
                        id: var.id.clone(),
                        name: var.name.clone(),
                        value: var.values_by_mode.values().next().cloned(),
                    })
                }
                "COLOR" => color_vars.push(ColorVariable {
                    id: var.id.clone(),
                    name: var.name.clone(),
                }),
                _ => {}
            }
        }

        let summary = DesignSystemTotals {
            total_color_styles: color_styles.len(),
            total_text_styles: text_styles.len(),
            total_effect_styles: effect_styles.len(),
            total_spacing_variables: spacing_vars.len(),
            has_variables: variables.is_some(),
        };

        Self {
            colors: ColorGroup {
                styles_count: color_styles.len(),
                variables_count: color_vars.len(),
                styles: color_styles,
                variables: color_vars,
            },
            typography: StyleGroup {
                styles_count: text_styles.len(),
                styles: text_styles,
            },
            effects: StyleGroup {
                styles_count: effect_styles.len(),
                styles: effect_styles,
            },
            spacing: SpacingGroup {
                variables_count: spacing_vars.len(),
                variables: spacing_vars,
            },
            summary,
        }
    }
}
