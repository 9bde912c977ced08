use serde::Serialize;
use std::collections::BTreeMap;

use crate::DocumentNode;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

impl Complexity {
    pub fn from_depth(max_depth: usize) -> Self {
        if max_depth > 4 {
            Complexity::High
        } else if max_depth > 2 {
            Complexity::Medium
        } else {
            Complexity::Low
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct SizeSample {
    pub width: f64,
    pub height: f64,
    pub area: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyReport {
    pub max_nesting_depth: usize,
    pub nodes_at_each_depth: BTreeMap<usize, usize>,
    pub hierarchy_complexity: Complexity,
    pub sizes_at_depth: BTreeMap<usize, Vec<SizeSample>>,
}

pub fn analyze_hierarchy(root: &DocumentNode) -> HierarchyReport {
    let mut max_depth = 0;
    let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
    let mut sizes: BTreeMap<usize, Vec<SizeSample>> = BTreeMap::new();

    for (depth, node) in root.walk() {
        max_depth = max_depth.max(depth);
        *counts.entry(depth).or_default() += 1;
        if let Some(bb) = node.absolute_bounding_box {
            sizes.entry(depth).or_default().push(SizeSample {
                width: bb.width,
                height: bb.height,
                area: bb.width * bb.height,
            });
        }
    }

    HierarchyReport {
        max_nesting_depth: max_depth,
        nodes_at_each_depth: counts,
        hierarchy_complexity: Complexity::from_depth(max_depth),
        sizes_at_depth: sizes,
    }
}
