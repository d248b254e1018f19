//! Freemind `.mm` writer.
//!
//! Output shape:
//!
//! ```text
//! <map version="1.0.1">
//!   <node TEXT="Root">
//!     <node TEXT="A">
//!       <node TEXT="B"/>
//!     </node>
//!   </node>
//! </map>
//! ```

use std::borrow::Cow;

use tracing::{debug, instrument};

use mindscribe_shared::{AppConfig, MindscribeError, OutlineNode, Result};

/// Document settings for [`serialize_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MindMapOptions {
    /// `TEXT` of the root `<node>`.
    pub root_text: String,
    /// `version` attribute of `<map>`.
    pub map_version: String,
}

impl Default for MindMapOptions {
    fn default() -> Self {
        let config = AppConfig::default();
        Self::from(&config)
    }
}

impl From<&AppConfig> for MindMapOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            root_text: config.mindmap.root_text.clone(),
            map_version: config.mindmap.map_version.clone(),
        }
    }
}

/// Serialize a parsed tree with default options.
pub fn serialize(root: &OutlineNode) -> Result<String> {
    serialize_with(root, &MindMapOptions::default())
}

/// Serialize a tree rooted at the synthetic root as a Freemind document.
///
/// Fails with [`MindscribeError::Validation`] if `root` is not a level-0
/// node or if any child's level is not greater than its parent's. Trees from
/// [`crate::parse`] always pass.
#[instrument(skip_all, fields(nodes = root.descendant_count()))]
pub fn serialize_with(root: &OutlineNode, opts: &MindMapOptions) -> Result<String> {
    validate(root)?;

    let mut xml = String::with_capacity(64 + root.descendant_count() * 32);
    xml.push_str("<map version=\"");
    xml.push_str(&escape_attr(&opts.map_version));
    xml.push_str("\">\n");
    write_node(&mut xml, &opts.root_text, &root.children, 1);
    xml.push_str("</map>\n");

    debug!(bytes = xml.len(), "mind map serialized");
    Ok(xml)
}

fn validate(root: &OutlineNode) -> Result<()> {
    if !root.is_root() {
        return Err(MindscribeError::validation(format!(
            "expected the outline root (level 0), got {:?} at level {}",
            root.text, root.level
        )));
    }

    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        for child in &node.children {
            if child.level <= node.level {
                return Err(MindscribeError::validation(format!(
                    "{:?} at level {} cannot be a child of level {}",
                    child.text, child.level, node.level
                )));
            }
            stack.push(child);
        }
    }
    Ok(())
}

fn write_node(out: &mut String, text: &str, children: &[OutlineNode], depth: usize) {
    indent(out, depth);
    out.push_str("<node TEXT=\"");
    out.push_str(&escape_attr(text));

    if children.is_empty() {
        out.push_str("\"/>\n");
        return;
    }

    out.push_str("\">\n");
    for child in children {
        write_node(out, &child.text, &child.children, depth + 1);
    }
    indent(out, depth);
    out.push_str("</node>\n");
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

/// Escape a value for a double-quoted XML attribute.
///
/// Tab, newline and carriage return become character references so they
/// survive attribute-value normalization. Other control characters and the
/// noncharacters U+FFFE/U+FFFF fall outside the XML 1.0 `Char` production and
/// are dropped.
fn escape_attr(value: &str) -> Cow<'_, str> {
    let needs_escape = value.chars().any(|c| {
        matches!(c, '&' | '<' | '>' | '"' | '\'') || c.is_control() || is_nonchar(c)
    });
    if !needs_escape {
        return Cow::Borrowed(value);
    }

    let mut out = String::with_capacity(value.len() + 16);
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' => out.push_str("&#9;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            c if c.is_control() || is_nonchar(c) => {}
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

fn is_nonchar(c: char) -> bool {
    matches!(c, '\u{FFFE}' | '\u{FFFF}')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    /// Parse `xml` with a conforming XML parser and return the unescaped
    /// `TEXT` attribute of every `<node>` in document order.
    fn node_texts(xml: &str) -> Vec<String> {
        let doc = roxmltree::Document::parse(xml).expect("well-formed XML");
        assert_eq!(doc.root_element().tag_name().name(), "map");
        doc.descendants()
            .filter(|n| n.has_tag_name("node"))
            .map(|n| n.attribute("TEXT").expect("TEXT attribute").to_string())
            .collect()
    }

    #[test]
    fn serializes_nested_nodes() {
        let root = parse("@startmindmap\n+A\n++B\n+C\n@endmindmap");
        let xml = serialize(&root).expect("serialize");
        let expected = "<map version=\"1.0.1\">\n\
                        \x20 <node TEXT=\"Root\">\n\
                        \x20   <node TEXT=\"A\">\n\
                        \x20     <node TEXT=\"B\"/>\n\
                        \x20   </node>\n\
                        \x20   <node TEXT=\"C\"/>\n\
                        \x20 </node>\n\
                        </map>\n";
        assert_eq!(xml, expected);
    }

    #[test]
    fn empty_tree_has_leaf_root() {
        let xml = serialize(&OutlineNode::root()).expect("serialize");
        assert_eq!(xml, "<map version=\"1.0.1\">\n  <node TEXT=\"Root\"/>\n</map>\n");
    }

    #[test]
    fn custom_root_text_is_escaped() {
        let opts = MindMapOptions {
            root_text: "Q&A".into(),
            ..MindMapOptions::default()
        };
        let xml = serialize_with(&OutlineNode::root(), &opts).expect("serialize");
        assert!(xml.contains(r#"<node TEXT="Q&amp;A"/>"#));
    }

    #[test]
    fn escapes_special_characters() {
        assert_eq!(escape_attr("plain"), Cow::Borrowed("plain"));
        assert_eq!(
            escape_attr(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &apos;Jerry&apos;&lt;/a&gt;"
        );
        assert_eq!(escape_attr("a\tb\u{0}c"), "a&#9;bc");
    }

    #[test]
    fn special_labels_round_trip() {
        let outline = "@startmindmap\n+ <script>alert(\"x\")</script>\n++ R&D \"quoted\"\n+++ a > b && c < d\n+ it's &amp; literal\n@endmindmap";
        let root = parse(outline);
        let xml = serialize(&root).expect("serialize");
        let texts = node_texts(&xml);

        let mut expected = vec!["Root".to_string()];
        expected.extend(root.iter().skip(1).map(|n| n.text.clone()));
        assert_eq!(texts, expected);
        assert_eq!(texts[4], "it's &amp; literal");
    }

    #[test]
    fn skipped_levels_are_well_formed() {
        let root = parse("+A\n+++C\n++B\n++++++D\n+E");
        let xml = serialize(&root).expect("serialize");
        let texts = node_texts(&xml);
        assert_eq!(texts, vec!["Root", "A", "C", "B", "D", "E"]);
    }

    #[test]
    fn drops_characters_outside_xml_char_range() {
        assert_eq!(escape_attr("a\u{FFFF}b\u{FFFE}c"), "abc");
        assert_eq!(escape_attr("\u{FFFD}"), Cow::Borrowed("\u{FFFD}"));
    }

    #[test]
    fn noncharacter_labels_are_well_formed() {
        let root = parse("+a\u{FFFF}b\n++c\u{FFFE}d\u{1}\n+tab\there");
        let xml = serialize(&root).expect("serialize");
        assert_eq!(node_texts(&xml), vec!["Root", "ab", "cd", "tab\there"]);
    }

    #[test]
    fn rejects_non_root() {
        let err = serialize(&OutlineNode::new(1, "A")).unwrap_err();
        assert!(matches!(err, MindscribeError::Validation { .. }));
    }

    #[test]
    fn rejects_child_not_deeper_than_parent() {
        let mut parent = OutlineNode::new(2, "parent");
        parent.children.push(OutlineNode::new(2, "sibling?"));
        let mut root = OutlineNode::root();
        root.children.push(parent);

        let err = serialize(&root).unwrap_err();
        assert!(err.to_string().contains("cannot be a child of level 2"));
    }

    #[test]
    fn serialize_is_repeatable() {
        let root = parse("+A\n++B");
        assert_eq!(
            serialize(&root).expect("first"),
            serialize(&root).expect("second")
        );
    }
}
