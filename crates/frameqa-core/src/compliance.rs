use serde::Serialize;

use crate::catalog::StyleCatalog;
use crate::finding::{child_path, Finding, Property, Severity, SeverityBuckets, SeveritySummary};
use crate::spacing::{is_on_grid, nearest_grid_multiple, GRID_UNIT};
use crate::{non_empty, px, DocumentNode};

/// Walk `root` depth-first and report every style-token or grid violation.
///
/// Order is pre-order; within a node fills come first, then typography,
/// effects and spacing.
pub fn find_violations(root: &DocumentNode, catalog: &StyleCatalog) -> Vec<Finding> {
    let mut out = Vec::new();
    check_node(root, "", catalog, &mut out);
    out
}

fn check_node(node: &DocumentNode, parent_path: &str, catalog: &StyleCatalog, out: &mut Vec<Finding>) {
    let path = child_path(parent_path, &node.name);

    check_fills(node, &path, catalog, out);
    if node.is_text() {
        check_text(node, &path, catalog, out);
    }
    if !node.effects.is_empty() {
        check_effects(node, &path, catalog, out);
    }
    if node.has_auto_layout() {
        check_spacing(node, &path, out);
    }

    for child in &node.children {
        check_node(child, &path, catalog, out);
    }
}

fn check_fills(node: &DocumentNode, path: &str, catalog: &StyleCatalog, out: &mut Vec<Finding>) {
    for fill in node.solid_fills() {
        match non_empty(&node.fill_style_id) {
            None => {
                let current = fill
                    .color
                    .map(|c| c.to_rgb8().to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                out.push(Finding::new(
                    node,
                    path,
                    Property::Fill,
                    Severity::Medium,
                    "Using hard-coded color instead of color style",
                    current,
                    "Apply a color style from design system",
                ));
            }
            Some(id) if !catalog.has_color(id) => out.push(Finding::new(
                node,
                path,
                Property::Fill,
                Severity::High,
                "Using color style from outside design system",
                format!("Style ID: {}", id),
                "Use color style from design system library",
            )),
            Some(_) => {}
        }
    }
}

fn check_text(node: &DocumentNode, path: &str, catalog: &StyleCatalog, out: &mut Vec<Finding>) {
    match non_empty(&node.text_style_id) {
        None => {
            let size = node
                .font_size()
                .map(px)
                .unwrap_or_else(|| "unknown".to_string());
            let family = node.font_family().unwrap_or("unknown");
            out.push(Finding::new(
                node,
                path,
                Property::Typography,
                Severity::Medium,
                "Text not using text style",
                format!("{} {}", size, family),
                "Apply text style from design system",
            ));
        }
        Some(id) if !catalog.has_text(id) => out.push(Finding::new(
            node,
            path,
            Property::Typography,
            Severity::High,
            "Using text style from outside design system",
            format!("Style ID: {}", id),
            "Use text style from design system library",
        )),
        Some(_) => {}
    }
}

fn check_effects(node: &DocumentNode, path: &str, catalog: &StyleCatalog, out: &mut Vec<Finding>) {
    match non_empty(&node.effect_style_id) {
        None => {
            let kinds: Vec<&str> = node.effects.iter().map(|e| e.effect_type.as_str()).collect();
            out.push(Finding::new(
                node,
                path,
                Property::Effects,
                Severity::Low,
                "Using custom effects instead of effect style",
                kinds.join(", "),
                "Apply effect style from design system",
            ));
        }
        Some(id) if !catalog.has_effect(id) => out.push(Finding::new(
            node,
            path,
            Property::Effects,
            Severity::Medium,
            "Using effect style from outside design system",
            format!("Style ID: {}", id),
            "Use effect style from design system library",
        )),
        Some(_) => {}
    }
}

fn check_spacing(node: &DocumentNode, path: &str, out: &mut Vec<Finding>) {
    let values = node
        .spacing_values()
        .into_iter()
        .filter_map(|(_, v)| v)
        .filter(|v| *v != 0.0);
    for value in values {
        if is_on_grid(value) {
            continue;
        }
        out.push(Finding::new(
            node,
            path,
            Property::Spacing,
            Severity::Medium,
            format!("Spacing not following {}px grid", GRID_UNIT),
            px(value),
            format!(
                "Change to nearest {}px multiple: {}",
                GRID_UNIT,
                px(nearest_grid_multiple(value))
            ),
        ));
    }
}

/// Saturating heuristic: `round((1 - n / (n + 100)) * 100)`. It is not a
/// fraction of checks performed; kept as-is so scores stay comparable with
/// earlier reports.
pub fn compliance_score(violations: usize) -> u32 {
    let n = violations as f64;
    ((1.0 - n / (n + 100.0)) * 100.0).round() as u32
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceSummary {
    pub compliant: bool,
    pub compliance_score: u32,
    pub violation_count: usize,
    pub summary: SeveritySummary,
}

impl ComplianceSummary {
    pub fn from_findings(findings: &[Finding]) -> Self {
        let buckets = SeverityBuckets::from_findings(findings);
        Self {
            compliant: findings.is_empty(),
            compliance_score: compliance_score(findings.len()),
            violation_count: findings.len(),
            summary: SeveritySummary::from(&buckets),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StyleMeta;
    use crate::{Color, Effect, NodeType, Paint};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn catalog() -> StyleCatalog {
        let styles: Vec<StyleMeta> = serde_json::from_value(json!([
            {"key": "color-ok", "name": "Primary", "style_type": "FILL"},
            {"key": "text-ok", "name": "Body", "style_type": "TEXT"},
            {"key": "fx-ok", "name": "Shadow", "style_type": "EFFECT"}
        ]))
        .unwrap();
        StyleCatalog::from_styles(&styles)
    }

    fn node(name: &str, node_type: NodeType) -> DocumentNode {
        DocumentNode {
            id: format!("id-{name}"),
            name: name.to_string(),
            node_type,
            ..Default::default()
        }
    }

    #[test]
    fn hard_coded_fill_is_one_medium_finding() {
        let mut n = node("Box", NodeType::Frame);
        n.fills = vec![Paint::solid(Color::rgb(1.0, 0.0, 0.0))];
        let findings = find_violations(&n, &catalog());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].property, Property::Fill);
        assert_eq!(findings[0].severity, Severity::Medium);
        assert_eq!(findings[0].current_value, "RGB(255, 0, 0)");
        assert_eq!(findings[0].node_path, "Box");
    }

    #[test]
    fn empty_style_id_counts_as_missing() {
        let mut n = node("Box", NodeType::Frame);
        n.fills = vec![Paint::solid(Color::rgb(0.0, 0.0, 0.0))];
        n.fill_style_id = Some(String::new());
        let findings = find_violations(&n, &catalog());
        assert_eq!(findings[0].severity, Severity::Medium);
    }

    #[test]
    fn foreign_styles_are_flagged() {
        let mut n = node("Label", NodeType::Text);
        n.fills = vec![Paint::solid(Color::rgb(0.0, 0.0, 0.0))];
        n.fill_style_id = Some("elsewhere".into());
        n.text_style_id = Some("other-text".into());
        n.effects = vec![Effect {
            effect_type: "DROP_SHADOW".into(),
            ..Default::default()
        }];
        n.effect_style_id = Some("other-fx".into());

        let findings = find_violations(&n, &catalog());
        let got: Vec<(Property, Severity, &str)> = findings
            .iter()
            .map(|f| (f.property, f.severity, f.current_value.as_str()))
            .collect();
        assert_eq!(
            got,
            vec![
                (Property::Fill, Severity::High, "Style ID: elsewhere"),
                (Property::Typography, Severity::High, "Style ID: other-text"),
                (Property::Effects, Severity::Medium, "Style ID: other-fx"),
            ]
        );
    }

    #[test]
    fn unstyled_text_and_effects() {
        let mut n = node("Label", NodeType::Text);
        n.font_size = Some(14.0);
        n.effects = vec![
            Effect {
                effect_type: "DROP_SHADOW".into(),
                ..Default::default()
            },
            Effect {
                effect_type: "LAYER_BLUR".into(),
                ..Default::default()
            },
        ];
        let findings = find_violations(&n, &catalog());
        assert_eq!(findings[0].current_value, "14px unknown");
        assert_eq!(findings[0].severity, Severity::Medium);
        assert_eq!(findings[1].current_value, "DROP_SHADOW, LAYER_BLUR");
        assert_eq!(findings[1].severity, Severity::Low);
    }

    #[test]
    fn spacing_checked_only_with_auto_layout() {
        let mut n = node("Stack", NodeType::Frame);
        n.padding_top = Some(12.0);
        n.item_spacing = Some(0.0);
        assert!(find_violations(&n, &catalog()).is_empty());

        n.layout_mode = Some("NONE".into());
        assert!(find_violations(&n, &catalog()).is_empty());

        n.layout_mode = Some("VERTICAL".into());
        let findings = find_violations(&n, &catalog());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].property, Property::Spacing);
        assert_eq!(findings[0].current_value, "12px");
        assert_eq!(
            findings[0].recommendation,
            "Change to nearest 8px multiple: 16px"
        );
    }

    #[test]
    fn findings_follow_preorder_with_breadcrumbs() {
        let mut title = node("Title", NodeType::Text);
        title.text_style_id = Some("text-ok".into());
        title.fills = vec![Paint::solid(Color::rgb(0.0, 0.0, 0.0))];
        let mut card = node("Card", NodeType::Frame);
        card.fills = vec![Paint::solid(Color::rgb(1.0, 1.0, 1.0))];
        card.children = vec![title];
        let mut page = node("Page", NodeType::Frame);
        page.children = vec![card];

        let findings = find_violations(&page, &catalog());
        let paths: Vec<&str> = findings.iter().map(|f| f.node_path.as_str()).collect();
        assert_eq!(paths, vec!["Page > Card", "Page > Card > Title"]);
    }

    #[test]
    fn clean_tree_is_compliant() {
        let mut title = node("Title", NodeType::Text);
        title.text_style_id = Some("text-ok".into());
        title.fills = vec![Paint::solid(Color::rgb(0.0, 0.0, 0.0))];
        title.fill_style_id = Some("color-ok".into());
        let mut frame = node("Frame", NodeType::Frame);
        frame.layout_mode = Some("HORIZONTAL".into());
        frame.padding_top = Some(16.0);
        frame.padding_left = Some(24.0);
        frame.item_spacing = Some(8.0);
        frame.effects = vec![Effect {
            effect_type: "DROP_SHADOW".into(),
            ..Default::default()
        }];
        frame.effect_style_id = Some("fx-ok".into());
        frame.children = vec![title];

        let findings = find_violations(&frame, &catalog());
        assert!(findings.is_empty());
        let summary = ComplianceSummary::from_findings(&findings);
        assert!(summary.compliant);
        assert_eq!(summary.compliance_score, 100);
    }

    #[test]
    fn score_is_saturating() {
        assert_eq!(compliance_score(0), 100);
        assert_eq!(compliance_score(1), 99);
        assert_eq!(compliance_score(100), 50);
    }

    #[test]
    fn summary_counts_severities() {
        let mut n = node("Label", NodeType::Text);
        n.fills = vec![Paint::solid(Color::rgb(0.0, 0.0, 0.0))];
        n.fill_style_id = Some("nope".into());
        n.effects = vec![Effect::default()];
        let summary = ComplianceSummary::from_findings(&find_violations(&n, &catalog()));
        assert_eq!(summary.violation_count, 3);
        assert_eq!(summary.summary, SeveritySummary { high: 1, medium: 1, low: 1 });
    }
}
