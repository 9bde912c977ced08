//! WCAG 2.1 contrast checks for text nodes.
//!
//! The background of a text node is the first SOLID fill of its nearest
//! ancestor (or itself) that has one. Blend modes, paint opacity and
//! overlapping siblings are not composited, so results are an approximation.

use serde::Serialize;

use crate::{DocumentNode, Rgb8};

pub const NORMAL_TEXT_RATIO: f64 = 4.5;
pub const LARGE_TEXT_RATIO: f64 = 3.0;
pub const AAA_RATIO: f64 = 7.0;
const DEFAULT_FONT_SIZE: f64 = 14.0;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum ContrastLevel {
    #[serde(rename = "AAA")]
    Aaa,
    #[serde(rename = "AA")]
    Aa,
    #[serde(rename = "FAIL")]
    Fail,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContrastCheck {
    pub node_id: String,
    pub node_name: String,
    pub text_color: Rgb8,
    pub background_color: Rgb8,
    /// Rounded to two decimals.
    pub contrast_ratio: f64,
    pub required_ratio: f64,
    pub passes: bool,
    pub level: ContrastLevel,
    pub font_size: f64,
    pub is_large_text: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContrastReport {
    pub checks_performed: usize,
    pub all_pass: bool,
    pub fail_count: usize,
    pub checks: Vec<ContrastCheck>,
}

/// WCAG relative luminance of an sRGB colour.
pub fn relative_luminance(c: Rgb8) -> f64 {
    fn linear(channel: u8) -> f64 {
        let c = channel as f64 / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }
    0.2126 * linear(c.r) + 0.7152 * linear(c.g) + 0.0722 * linear(c.b)
}

pub fn contrast_ratio(a: Rgb8, b: Rgb8) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    (la.max(lb) + 0.05) / (la.min(lb) + 0.05)
}

/// Large text gets the relaxed 3:1 threshold.
pub fn is_large_text(font_size: f64, font_weight: Option<f64>) -> bool {
    font_size >= 18.0 || (font_size >= 14.0 && font_weight.is_some_and(|w| w >= 700.0))
}

pub fn level_for(ratio: f64, required: f64) -> ContrastLevel {
    if ratio < required {
        ContrastLevel::Fail
    } else if ratio < AAA_RATIO {
        ContrastLevel::Aa
    } else {
        ContrastLevel::Aaa
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Check every TEXT node under `root` against its inherited background.
pub fn check_contrast(root: &DocumentNode, background: Rgb8) -> ContrastReport {
    let mut checks = Vec::new();
    check_node(root, background, &mut checks);
    let fail_count = checks.iter().filter(|c| !c.passes).count();
    ContrastReport {
        checks_performed: checks.len(),
        all_pass: fail_count == 0,
        fail_count,
        checks,
    }
}

/// Background to start from: the root's own background colour, else white.
pub fn root_background(root: &DocumentNode) -> Rgb8 {
    root.background_color
        .map(|c| c.to_rgb8())
        .unwrap_or(Rgb8::WHITE)
}

fn check_node(node: &DocumentNode, background: Rgb8, out: &mut Vec<ContrastCheck>) {
    let own = node.first_solid_color().map(|c| c.to_rgb8());

    if let (true, Some(text_color)) = (node.is_text(), own) {
        let ratio = contrast_ratio(text_color, background);
        // A zero size is treated as unset.
        let font_size = node
            .font_size()
            .filter(|s| *s != 0.0)
            .unwrap_or(DEFAULT_FONT_SIZE);
        let large = is_large_text(font_size, node.font_weight());
        let required = if large { LARGE_TEXT_RATIO } else { NORMAL_TEXT_RATIO };
        out.push(ContrastCheck {
            node_id: node.id.clone(),
            node_name: node.name.clone(),
            text_color,
            background_color: background,
            contrast_ratio: round2(ratio),
            required_ratio: required,
            passes: ratio >= required,
            level: level_for(ratio, required),
            font_size,
            is_large_text: large,
        });
    }

    let inherited = own.unwrap_or(background);
    for child in &node.children {
        check_node(child, inherited, out);
    }
}
