use serde::Serialize;

use crate::DocumentNode;

/// Spacing values must be integer multiples of this unit.
pub const GRID_UNIT: f64 = 8.0;

pub fn is_on_grid(value: f64) -> bool {
    value % GRID_UNIT == 0.0
}

/// Nearest grid multiple, halves rounding up.
pub fn nearest_grid_multiple(value: f64) -> f64 {
    (value / GRID_UNIT + 0.5).floor() * GRID_UNIT
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpacingIssue {
    pub property: &'static str,
    pub current_value: f64,
    pub expected_value: f64,
    pub difference: f64,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CurrentSpacing {
    pub padding_top: Option<f64>,
    pub padding_right: Option<f64>,
    pub padding_bottom: Option<f64>,
    pub padding_left: Option<f64>,
    pub item_spacing: Option<f64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpacingReport {
    pub node_name: String,
    pub node_id: String,
    pub compliant: bool,
    pub issue_count: usize,
    pub issues: Vec<SpacingIssue>,
    pub current_spacing: CurrentSpacing,
}

/// Grid check of a single node's own padding and item spacing (no recursion).
/// Padding is only inspected when the node declares `paddingTop`.
pub fn analyze_spacing(node: &DocumentNode) -> SpacingReport {
    let [top, right, bottom, left, item] = node.spacing_values();
    let mut issues = Vec::new();

    if node.padding_top.is_some() {
        for (prop, value) in [top, right, bottom, left] {
            if let Some(v) = value {
                if let Some(issue) = grid_issue(prop, v, true) {
                    issues.push(issue);
                }
            }
        }
    }
    if let Some(v) = item.1 {
        if let Some(issue) = grid_issue(item.0, v, false) {
            issues.push(issue);
        }
    }

    SpacingReport {
        node_name: node.name.clone(),
        node_id: node.id.clone(),
        compliant: issues.is_empty(),
        issue_count: issues.len(),
        issues,
        current_spacing: CurrentSpacing {
            padding_top: node.padding_top,
            padding_right: node.padding_right,
            padding_bottom: node.padding_bottom,
            padding_left: node.padding_left,
            item_spacing: node.item_spacing,
        },
    }
}

fn grid_issue(property: &'static str, value: f64, padding: bool) -> Option<SpacingIssue> {
    if is_on_grid(value) {
        return None;
    }
    let expected = nearest_grid_multiple(value);
    let message = if padding {
        format!("{property} is {value}px but should be {expected}px (8px grid)")
    } else {
        format!("{property} is {value}px but should be {expected}px")
    };
    Some(SpacingIssue {
        property,
        current_value: value,
        expected_value: expected,
        difference: (value - expected).abs(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_up_to_grid() {
        assert_eq!(nearest_grid_multiple(12.0), 16.0);
        assert_eq!(nearest_grid_multiple(11.0), 8.0);
        assert_eq!(nearest_grid_multiple(4.0), 8.0);
        assert_eq!(nearest_grid_multiple(3.0), 0.0);
        assert_eq!(nearest_grid_multiple(20.0), 24.0);
    }

    #[test]
    fn multiples_of_eight_are_on_grid() {
        for v in [0.0, 8.0, 16.0, 64.0] {
            assert!(is_on_grid(v));
        }
        for v in [1.0, 4.0, 12.5, 15.0] {
            assert!(!is_on_grid(v));
        }
    }

    #[test]
    fn reports_only_off_grid_values() {
        let node = DocumentNode {
            id: "1:1".into(),
            name: "Stack".into(),
            padding_top: Some(12.0),
            padding_right: Some(16.0),
            padding_bottom: Some(16.0),
            padding_left: Some(16.0),
            item_spacing: Some(10.0),
            ..Default::default()
        };
        let report = analyze_spacing(&node);
        assert!(!report.compliant);
        assert_eq!(report.issue_count, 2);
        assert_eq!(report.issues[0].property, "paddingTop");
        assert_eq!(report.issues[0].expected_value, 16.0);
        assert_eq!(report.issues[0].difference, 4.0);
        assert_eq!(
            report.issues[0].message,
            "paddingTop is 12px but should be 16px (8px grid)"
        );
        assert_eq!(report.issues[1].property, "itemSpacing");
        assert_eq!(report.issues[1].expected_value, 8.0);
    }

    #[test]
    fn padding_ignored_without_padding_top() {
        let node = DocumentNode {
            padding_left: Some(5.0),
            ..Default::default()
        };
        let report = analyze_spacing(&node);
        assert!(report.compliant);
        assert_eq!(report.current_spacing.padding_left, Some(5.0));
    }
}
