//! Core domain types: the outline tree and the keyword list.

use std::collections::HashSet;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// OutlineNode
// ---------------------------------------------------------------------------

/// One heading of an outline.
///
/// A tree is rooted at a synthetic container ([`OutlineNode::root`]) with
/// level 0 and no text. Every other node has `level >= 1` and a level
/// strictly greater than its parent's. Children are owned by their parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineNode {
    /// Heading depth; 1 = top-level, 0 = synthetic root.
    pub level: usize,
    /// Heading label with markers and surrounding whitespace stripped.
    pub text: String,
    /// Sub-headings in document order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    /// Create a childless node.
    pub fn new(level: usize, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
            children: Vec::new(),
        }
    }

    /// The synthetic container every parsed tree hangs off.
    pub fn root() -> Self {
        Self::new(0, String::new())
    }

    /// Whether this node is the synthetic root.
    pub fn is_root(&self) -> bool {
        self.level == 0
    }

    /// Number of nodes below this one (not counting itself).
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| 1 + child.descendant_count())
            .sum()
    }

    /// Nesting depth below this node; 0 for a leaf.
    pub fn depth(&self) -> usize {
        self.children
            .iter()
            .map(|child| child.depth() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Pre-order walk over this node and all of its descendants.
    pub fn iter(&self) -> Iter<'_> {
        Iter { stack: vec![self] }
    }
}

impl Default for OutlineNode {
    fn default() -> Self {
        Self::root()
    }
}

/// Pre-order iterator returned by [`OutlineNode::iter`].
pub struct Iter<'a> {
    stack: Vec<&'a OutlineNode>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a OutlineNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

impl<'a> IntoIterator for &'a OutlineNode {
    type Item = &'a OutlineNode;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ---------------------------------------------------------------------------
// Keywords
// ---------------------------------------------------------------------------

/// Ordered list of unique, non-empty keywords.
///
/// Insertion order is kept; empty strings and repeats of an earlier entry
/// are dropped on the way in. Equality and serialization only look at the
/// ordered list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Keywords {
    items: Vec<String>,
    seen: HashSet<String>,
}

impl Keywords {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a keyword. Returns `false` if it was empty or already present.
    pub fn push(&mut self, keyword: impl Into<String>) -> bool {
        let keyword = keyword.into();
        if keyword.is_empty() || self.seen.contains(&keyword) {
            return false;
        }
        self.seen.insert(keyword.clone());
        self.items.push(keyword);
        true
    }

    /// Consume the list, returning the underlying vector.
    pub fn into_vec(self) -> Vec<String> {
        self.items
    }
}

impl PartialEq for Keywords {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Eq for Keywords {}

impl Deref for Keywords {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

impl<S: Into<String>> FromIterator<S> for Keywords {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut keywords = Self::new();
        for keyword in iter {
            keywords.push(keyword);
        }
        keywords
    }
}

impl From<Vec<String>> for Keywords {
    fn from(values: Vec<String>) -> Self {
        values.into_iter().collect()
    }
}

impl From<Keywords> for Vec<String> {
    fn from(keywords: Keywords) -> Self {
        keywords.items
    }
}

impl IntoIterator for Keywords {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Keywords {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> OutlineNode {
        let mut a = OutlineNode::new(1, "A");
        let mut b = OutlineNode::new(2, "B");
        b.children.push(OutlineNode::new(3, "B1"));
        a.children.push(b);
        let mut root = OutlineNode::root();
        root.children.push(a);
        root.children.push(OutlineNode::new(1, "C"));
        root
    }

    #[test]
    fn root_is_synthetic() {
        let root = OutlineNode::root();
        assert!(root.is_root());
        assert!(root.text.is_empty());
        assert_eq!(root.depth(), 0);
    }

    #[test]
    fn counts_and_depth() {
        let tree = sample_tree();
        assert_eq!(tree.descendant_count(), 4);
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.children[1].depth(), 0);
    }

    #[test]
    fn iter_is_pre_order() {
        let tree = sample_tree();
        let labels: Vec<&str> = tree.iter().skip(1).map(|n| n.text.as_str()).collect();
        assert_eq!(labels, vec!["A", "B", "B1", "C"]);
    }

    #[test]
    fn outline_node_json_omits_empty_children() {
        let json = serde_json::to_string(&OutlineNode::new(1, "leaf")).expect("serialize");
        assert_eq!(json, r#"{"level":1,"text":"leaf"}"#);
    }

    #[test]
    fn keywords_drop_empty_and_duplicates() {
        let keywords: Keywords = ["rust", "", "tokio", "rust", "serde"].into_iter().collect();
        assert_eq!(&*keywords, &["rust", "tokio", "serde"]);
    }

    #[test]
    fn keywords_push_reports_insertion() {
        let mut keywords = Keywords::new();
        assert!(keywords.push("a"));
        assert!(!keywords.push("a"));
        assert!(!keywords.push(""));
        assert_eq!(keywords.len(), 1);
    }

    #[test]
    fn keywords_equality_ignores_lookup_set() {
        let mut a: Keywords = ["x", "y"].into_iter().collect();
        a.push("x");
        let b: Keywords = ["x", "y"].into_iter().collect();
        assert_eq!(a, b);
        assert_ne!(a, ["y", "x"].into_iter().collect::<Keywords>());
    }

    #[test]
    fn keywords_large_input_stays_ordered() {
        let n = 200_000;
        let keywords: Keywords = (0..n)
            .map(|i| format!("term-{i}"))
            .chain((0..n).map(|i| format!("term-{i}")))
            .collect();
        assert_eq!(keywords.len(), n);
        assert_eq!(keywords[0], "term-0");
        assert_eq!(keywords[n - 1], format!("term-{}", n - 1));
    }

    #[test]
    fn keywords_serialize_as_array() {
        let keywords: Keywords = ["x", "y"].into_iter().collect();
        let json = serde_json::to_string(&keywords).expect("serialize");
        assert_eq!(json, r#"["x","y"]"#);

        let parsed: Keywords = serde_json::from_str(r#"["x","x",""]"#).expect("deserialize");
        assert_eq!(parsed.into_vec(), vec!["x".to_string()]);
    }
}
