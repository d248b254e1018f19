//! Outline parser.
//!
//! Builds the tree with an explicit stack of open headings. A heading of
//! level `L` closes every open heading of level `>= L`, then becomes the new
//! innermost open heading. Closing a heading attaches it to the one beneath
//! it on the stack, or to the root when the stack is empty. The result: each
//! heading hangs under the nearest earlier heading with a smaller level, so
//! skipped levels (`+` straight to `+++`) are accepted.

use tracing::{debug, instrument};

use mindscribe_shared::{AppConfig, DEFAULT_END_MARKER, DEFAULT_START_MARKER, OutlineNode};

/// Notation settings for [`parse_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineOptions {
    /// Line prefix that opens an outline block.
    pub start_marker: String,
    /// Line prefix that closes an outline block.
    pub end_marker: String,
    /// Character whose leading run gives the heading level.
    pub marker: char,
}

impl Default for OutlineOptions {
    fn default() -> Self {
        Self {
            start_marker: DEFAULT_START_MARKER.into(),
            end_marker: DEFAULT_END_MARKER.into(),
            marker: '+',
        }
    }
}

impl OutlineOptions {
    /// Markdown headers (`#`, `##`, ...) instead of `+` markers.
    pub fn markdown() -> Self {
        Self {
            marker: '#',
            ..Self::default()
        }
    }
}

impl From<&AppConfig> for OutlineOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            start_marker: config.outline.start_marker.clone(),
            end_marker: config.outline.end_marker.clone(),
            marker: config.outline.marker,
        }
    }
}

/// Parse outline notation with the default `+` markers.
pub fn parse(outline: &str) -> OutlineNode {
    parse_with(outline, &OutlineOptions::default())
}

/// Parse outline notation into a tree rooted at [`OutlineNode::root`].
///
/// Never fails. Lines without a leading marker are skipped. When the text
/// contains a start marker, only lines between a start marker and the
/// following end marker are read.
#[instrument(skip_all, fields(len = outline.len(), marker = %opts.marker))]
pub fn parse_with(outline: &str, opts: &OutlineOptions) -> OutlineNode {
    let scoped = outline
        .lines()
        .any(|line| line.trim().starts_with(opts.start_marker.as_str()));
    let mut inside = !scoped;
    let mut builder = TreeBuilder::default();
    let mut skipped = 0usize;

    for line in outline.lines() {
        let line = line.trim();

        if line.starts_with(opts.start_marker.as_str()) {
            inside = true;
            continue;
        }
        if line.starts_with(opts.end_marker.as_str()) {
            if scoped {
                inside = false;
            }
            continue;
        }
        if !inside || line.is_empty() {
            continue;
        }

        match heading(line, opts.marker) {
            Some((level, text)) => builder.push(OutlineNode::new(level, text)),
            None => skipped += 1,
        }
    }

    let root = builder.finish();
    debug!(
        nodes = root.descendant_count(),
        depth = root.depth(),
        skipped,
        "outline parsed"
    );
    root
}

/// Split a trimmed line into its level and label. `None` if unmarked.
fn heading(line: &str, marker: char) -> Option<(usize, &str)> {
    let rest = line.trim_start_matches(marker);
    let level = (line.len() - rest.len()) / marker.len_utf8();
    if level == 0 {
        return None;
    }
    Some((level, rest.trim_start()))
}

#[derive(Default)]
struct TreeBuilder {
    root: OutlineNode,
    open: Vec<OutlineNode>,
}

impl TreeBuilder {
    fn push(&mut self, node: OutlineNode) {
        self.close_from(node.level);
        self.open.push(node);
    }

    /// Close every open node whose level is `>= level`.
    fn close_from(&mut self, level: usize) {
        while self.open.last().is_some_and(|top| top.level >= level) {
            if let Some(done) = self.open.pop() {
                self.attach(done);
            }
        }
    }

    fn attach(&mut self, node: OutlineNode) {
        match self.open.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.root.children.push(node),
        }
    }

    fn finish(mut self) -> OutlineNode {
        self.close_from(1);
        self.root
    }
}
