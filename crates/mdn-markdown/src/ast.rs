//! Arena-backed document tree.
//!
//! Nodes live in a single `Vec` owned by [`Document`] and reference each other
//! through [`NodeId`] indices. A node owns the list of its children; the parent
//! link exists only so a block can detach itself (frontmatter removal).
//!
//! Base-grammar content is stored in [`NodeKind::Markdown`] nodes as the
//! pulldown-cmark event stream of one run of source lines. Links and images
//! are the `Start(Tag::Link)` / `Start(Tag::Image)` events inside those
//! streams.

use std::borrow::Cow;
use std::fmt::Write;
use std::ops::Range;

use pulldown_cmark::Event;

/// Index of a node inside a [`Document`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Named container opened by `{{< name >}}` and closed by `{{< /name >}}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snippet {
    /// Snippet name, matched byte-for-byte against the close tag.
    pub name: String,
    /// Opening tag exactly as written, e.g. `{{< note kind=info >}}`.
    pub raw_open_tag: String,
}

/// Raw `<!-- ... -->` comment. Never rendered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HtmlComment {
    /// Text between the comment markers.
    pub content: String,
}

/// A run of base-grammar content.
#[derive(Clone, Debug)]
pub struct MarkdownBlock<'a> {
    /// Byte ranges of the run in the source document. A run inside a block
    /// quote has one segment per line, without the `>` markers.
    pub segments: Vec<Range<usize>>,
    /// Parsed events; empty until the base grammar phase has run.
    pub events: Vec<Event<'a>>,
}

impl MarkdownBlock<'_> {
    pub(crate) fn new(segments: Vec<Range<usize>>) -> Self {
        Self {
            segments,
            events: Vec::new(),
        }
    }

    /// Text of the run. Borrowed when the run is one contiguous slice.
    #[must_use]
    pub fn text<'s>(&self, source: &'s str) -> Cow<'s, str> {
        match self.segments.as_slice() {
            [segment] => Cow::Borrowed(source.get(segment.clone()).unwrap_or_default()),
            segments => Cow::Owned(
                segments
                    .iter()
                    .filter_map(|segment| source.get(segment.clone()))
                    .collect(),
            ),
        }
    }
}

/// Kind of a document node.
#[derive(Clone, Debug)]
pub enum NodeKind<'a> {
    /// Root of the tree.
    Document,
    /// Block collecting raw source lines (see [`Node::lines`]).
    TextBlock,
    /// Snippet container.
    Snippet(Snippet),
    /// Suppressed HTML comment.
    HtmlComment(HtmlComment),
    /// `>` block quote.
    BlockQuote,
    /// Base-grammar content.
    Markdown(MarkdownBlock<'a>),
}

impl NodeKind<'_> {
    fn label(&self) -> &'static str {
        match self {
            Self::Document => "Document",
            Self::TextBlock => "TextBlock",
            Self::Snippet(_) => "Snippet",
            Self::HtmlComment(_) => "HtmlComment",
            Self::BlockQuote => "BlockQuote",
            Self::Markdown(_) => "Markdown",
        }
    }
}

/// A node in the document arena.
#[derive(Clone, Debug)]
pub struct Node<'a> {
    /// Node payload.
    pub kind: NodeKind<'a>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    lines: Vec<Range<usize>>,
}

impl<'a> Node<'a> {
    fn new(kind: NodeKind<'a>) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            lines: Vec::new(),
        }
    }

    /// Raw source segments collected by the owning block parser.
    #[must_use]
    pub fn lines(&self) -> &[Range<usize>] {
        &self.lines
    }

    /// Record a raw source segment.
    pub fn push_line(&mut self, segment: Range<usize>) {
        self.lines.push(segment);
    }
}

/// Parsed document tree, borrowing from the source text.
#[derive(Clone, Debug)]
pub struct Document<'a> {
    nodes: Vec<Node<'a>>,
}

impl Default for Document<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Document<'a> {
    /// Create a document containing only the root node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::Document)],
        }
    }

    /// Root node id.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Borrow a node.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node<'a> {
        &self.nodes[id.0]
    }

    /// Mutably borrow a node.
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node<'a> {
        &mut self.nodes[id.0]
    }

    /// Children of a node, in document order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Parent of a node, or `None` for the root and detached nodes.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Create a node and append it as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, kind: NodeKind<'a>) -> NodeId {
        let id = NodeId(self.nodes.len());
        let mut node = Node::new(kind);
        node.parent = Some(parent);
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Detach `child` from `parent`.
    ///
    /// The node stays in the arena but is no longer reachable from the root,
    /// so it is skipped by [`walk`](Self::walk) and by rendering.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].children.retain(|&id| id != child);
        if self.nodes[child.0].parent == Some(parent) {
            self.nodes[child.0].parent = None;
        }
    }

    /// Attached nodes below `id` (inclusive), in pre-order.
    #[must_use]
    pub fn walk(&self, id: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            order.push(next);
            pending.extend(self.children(next).iter().rev());
        }
        order
    }

    /// Render the attached tree as an indented outline, one node per line.
    #[must_use]
    pub fn dump(&self, source: &str) -> String {
        let mut out = String::new();
        self.dump_node(self.root(), source, 0, &mut out);
        out
    }

    fn dump_node(&self, id: NodeId, source: &str, depth: usize, out: &mut String) {
        let node = self.node(id);
        let indent = "  ".repeat(depth);
        let _ = match &node.kind {
            NodeKind::Snippet(snippet) => {
                writeln!(out, "{indent}Snippet name={:?}", snippet.name)
            }
            NodeKind::HtmlComment(comment) => {
                writeln!(out, "{indent}HtmlComment content={:?}", comment.content)
            }
            NodeKind::Markdown(block) => {
                writeln!(out, "{indent}Markdown source={:?}", block.text(source))
            }
            kind => writeln!(out, "{indent}{}", kind.label()),
        };
        for &child in self.children(id) {
            self.dump_node(child, source, depth + 1, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(content: &str) -> NodeKind<'static> {
        NodeKind::HtmlComment(HtmlComment {
            content: content.to_owned(),
        })
    }

    #[test]
    fn test_append_child_links_parent() {
        let mut doc = Document::new();
        let root = doc.root();
        let child = doc.append_child(root, comment("a"));

        assert_eq!(doc.children(root), &[child]);
        assert_eq!(doc.parent(child), Some(root));
    }

    #[test]
    fn test_remove_child_detaches_node() {
        let mut doc = Document::new();
        let root = doc.root();
        let first = doc.append_child(root, comment("a"));
        let second = doc.append_child(root, comment("b"));

        doc.remove_child(root, first);

        assert_eq!(doc.children(root), &[second]);
        assert_eq!(doc.parent(first), None);
        assert!(!doc.walk(root).contains(&first));
    }

    #[test]
    fn test_walk_is_pre_order() {
        let mut doc = Document::new();
        let root = doc.root();
        let outer = doc.append_child(
            root,
            NodeKind::Snippet(Snippet {
                name: "outer".to_owned(),
                raw_open_tag: "{{< outer >}}".to_owned(),
            }),
        );
        let inner = doc.append_child(outer, comment("inner"));
        let after = doc.append_child(root, comment("after"));

        assert_eq!(doc.walk(root), vec![root, outer, inner, after]);
    }

    #[test]
    fn test_dump_outline() {
        let source = "hello\n";
        let mut doc = Document::new();
        let root = doc.root();
        doc.append_child(root, NodeKind::Markdown(MarkdownBlock::new(vec![0..6])));
        doc.append_child(root, comment(" c "));

        assert_eq!(
            doc.dump(source),
            "Document\n  Markdown source=\"hello\\n\"\n  HtmlComment content=\" c \"\n"
        );
    }

    #[test]
    fn test_text_joins_segments() {
        let source = "> one\n> two\n";
        let split = MarkdownBlock::new(vec![2..6, 8..12]);
        let whole = MarkdownBlock::new(vec![0..12]);

        assert_eq!(split.text(source), "one\ntwo\n");
        assert!(matches!(whole.text(source), Cow::Borrowed(_)));
    }
}
