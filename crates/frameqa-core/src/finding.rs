use serde::{Deserialize, Serialize};

use crate::DocumentNode;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Property {
    Fill,
    Typography,
    Effects,
    Spacing,
}

/// One severity-tagged observation about a node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub node_id: String,
    pub node_name: String,
    /// Ancestor names and the node's own name joined with `" > "`.
    pub node_path: String,
    pub property: Property,
    pub issue: String,
    pub current_value: String,
    pub recommendation: String,
    pub severity: Severity,
}

impl Finding {
    pub fn new(
        node: &DocumentNode,
        node_path: &str,
        property: Property,
        severity: Severity,
        issue: impl Into<String>,
        current_value: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            node_id: node.id.clone(),
            node_name: node.name.clone(),
            node_path: node_path.to_string(),
            property,
            issue: issue.into(),
            current_value: current_value.into(),
            recommendation: recommendation.into(),
            severity,
        }
    }
}

/// Extend a breadcrumb with the next node name.
pub fn child_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{} > {}", parent, name)
    }
}

/// Findings split by severity, preserving traversal order inside each bucket.
#[derive(Debug, Default)]
pub struct SeverityBuckets<'a> {
    pub high: Vec<&'a Finding>,
    pub medium: Vec<&'a Finding>,
    pub low: Vec<&'a Finding>,
}

impl<'a> SeverityBuckets<'a> {
    pub fn from_findings(findings: &'a [Finding]) -> Self {
        let mut buckets = Self::default();
        for f in findings {
            match f.severity {
                Severity::High => buckets.high.push(f),
                Severity::Medium => buckets.medium.push(f),
                Severity::Low => buckets.low.push(f),
            }
        }
        buckets
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SeveritySummary {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl From<&SeverityBuckets<'_>> for SeveritySummary {
    fn from(b: &SeverityBuckets<'_>) -> Self {
        Self {
            high: b.high.len(),
            medium: b.medium.len(),
            low: b.low.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breadcrumbs_join_with_chevrons() {
        assert_eq!(child_path("", "Page"), "Page");
        assert_eq!(child_path("Page > Card", "Title"), "Page > Card > Title");
    }

    #[test]
    fn buckets_keep_order() {
        let node = DocumentNode {
            id: "1".into(),
            name: "n".into(),
            ..Default::default()
        };
        let mk = |sev, issue: &str| Finding::new(&node, "n", Property::Fill, sev, issue, "", "");
        let findings = vec![
            mk(Severity::Low, "a"),
            mk(Severity::High, "b"),
            mk(Severity::Low, "c"),
        ];
        let buckets = SeverityBuckets::from_findings(&findings);
        let low: Vec<&str> = buckets.low.iter().map(|f| f.issue.as_str()).collect();
        assert_eq!(low, vec!["a", "c"]);
        assert_eq!(
            SeveritySummary::from(&buckets),
            SeveritySummary { high: 1, medium: 0, low: 2 }
        );
    }

    #[test]
    fn serializes_lowercase_enums() {
        let v = serde_json::to_value(Severity::Medium).unwrap();
        assert_eq!(v, "medium");
        let v = serde_json::to_value(Property::Typography).unwrap();
        assert_eq!(v, "typography");
    }
}
