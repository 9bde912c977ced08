/// Design-QA rules enforced by the analyzers. Single source of truth for MCP instructions.
pub const RULES: &str = "\
1. Colors come from the design system. Every SOLID fill must reference a color style. A fill with no \
style is reported as a hard-coded color (medium); a style that is not published by the design system \
file is reported as foreign (high).\n\
2. Text uses text styles. Every TEXT node must reference a text style. Missing style = medium, \
foreign style = high. The finding shows the current size and family so the closest style can be picked.\n\
3. Effects use effect styles. A node with shadows or blurs and no effect style is low severity; \
a foreign effect style is medium.\n\
4. Spacing sits on the 8px grid. For auto-layout frames, every non-zero padding side and the item \
spacing must be a multiple of 8. The recommendation is the nearest multiple (halves round up).\n\
5. Text must be readable. Contrast is measured against the nearest ancestor with a SOLID fill \
(or the frame background, or white). Large text (18px+, or 14px+ at weight 700+) needs 3:1, \
everything else 4.5:1. 7:1 and above is AAA.\n\
6. Keep nesting shallow. Depth above 2 is medium complexity, above 4 is high.\n\
\n\
## Workflow\n\
1. `get_node_details` on the selected frame to confirm the node id and see its layout.\n\
2. `verify_design_system_compliance` with the design system file key for token usage and spacing.\n\
3. `check_wcag_contrast` for readability, `analyze_hierarchy` for structure.\n\
4. `get_components`, `get_typography` and `get_color_analysis` for inventories when a finding needs context.\n\
\n\
The compliance score is a saturating heuristic (100 with no violations, 50 at 100 violations). \
It is not a percentage of checks passed; compare scores between runs, not against a target.";
