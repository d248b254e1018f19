//! Markdown header rendering of an outline tree.

use mindscribe_shared::OutlineNode;

use crate::outline::parse;

/// Render every non-root node as a `#`-prefixed header, in document order.
pub fn to_markdown(root: &OutlineNode) -> String {
    root.iter()
        .filter(|node| !node.is_root())
        .map(|node| format!("{} {}", "#".repeat(node.level), node.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse `+` outline notation and render it as Markdown headers.
pub fn outline_to_markdown(outline: &str) -> String {
    to_markdown(&parse(outline))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{OutlineOptions, parse_with};

    #[test]
    fn renders_headers_in_order() {
        let md = outline_to_markdown("@startmindmap\n+ A\n++ B\n+++ C\n+ D\n@endmindmap");
        assert_eq!(md, "# A\n## B\n### C\n# D");
    }

    #[test]
    fn keeps_original_levels_when_skipped() {
        assert_eq!(outline_to_markdown("+A\n+++C"), "# A\n### C");
    }

    #[test]
    fn empty_outline_renders_nothing() {
        assert_eq!(outline_to_markdown("@startmindmap\n@endmindmap"), "");
    }

    #[test]
    fn markdown_round_trips_through_parser() {
        let tree = parse("+A\n++B\n+C");
        let reparsed = parse_with(&to_markdown(&tree), &OutlineOptions::markdown());
        assert_eq!(reparsed, tree);
    }
}
