//! HTML document tree stored as an arena of nodes addressed by [`NodeId`].
//!
//! Parent and sibling links are plain indices, so the tree has back-references
//! without owning cycles. A `Document` is built once per HTML file, walked,
//! and dropped when that file's references have been emitted.

use std::path::Path;

use tree_sitter::Node as SyntaxNode;

use crate::error::Error;
use crate::grammar;

/// Handle to a node inside one [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// What a node is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// An HTML comment.
    Comment,
    /// The `<!DOCTYPE>` declaration.
    Doctype,
    /// The root. Exactly one per document, always `NodeId` zero.
    Document,
    /// An element, with its lowercased tag name.
    Element(String),
    /// Text content.
    Text,
}

/// One attribute of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Lowercased attribute name.
    pub key: String,
    /// Raw attribute value as written in the source.
    pub value: String,
    /// Byte offset of the first value character in the source file.
    pub value_start: usize,
}

/// A node and its links. Links are indices into the owning document.
#[derive(Debug, Clone)]
pub struct Node {
    /// Attributes in source order. Empty for anything but elements.
    pub attributes: Vec<Attribute>,
    /// First child, if any.
    first_child: Option<NodeId>,
    /// Node kind.
    pub kind: NodeKind,
    /// Last child, kept so appends are O(1).
    last_child: Option<NodeId>,
    /// Next sibling, if any.
    next_sibling: Option<NodeId>,
    /// Parent. `None` only for the document root.
    parent: Option<NodeId>,
    /// Previous sibling, if any.
    prev_sibling: Option<NodeId>,
}

/// An HTML document tree.
#[derive(Debug, Clone)]
pub struct Document {
    /// Arena storage. Index zero is the root.
    nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        return Self::new();
    }
}

impl Document {
    /// An empty document holding only its root.
    pub fn new() -> Self {
        return Self {
            nodes: vec![Node {
                attributes: Vec::new(),
                first_child: None,
                kind: NodeKind::Document,
                last_child: None,
                next_sibling: None,
                parent: None,
                prev_sibling: None,
            }],
        };
    }

    /// The document root.
    pub const fn root(&self) -> NodeId {
        return NodeId(0);
    }

    /// Append a new last child under `parent` and return its handle.
    pub fn append(&mut self, parent: NodeId, kind: NodeKind, attributes: Vec<Attribute>) -> NodeId {
        let id = NodeId(self.nodes.len());
        let prev = self.node(parent).and_then(|p| return p.last_child);

        self.nodes.push(Node {
            attributes,
            first_child: None,
            kind,
            last_child: None,
            next_sibling: None,
            parent: Some(parent),
            prev_sibling: prev,
        });

        if let Some(prev_node) = prev.and_then(|p| return self.nodes.get_mut(p.0)) {
            prev_node.next_sibling = Some(id);
        }
        if let Some(parent_node) = self.nodes.get_mut(parent.0) {
            if parent_node.first_child.is_none() {
                parent_node.first_child = Some(id);
            }
            parent_node.last_child = Some(id);
        }
        return id;
    }

    /// Look up a node. Handles are only minted by this document, so `None`
    /// means the handle came from another document.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        return self.nodes.get(id.0);
    }

    /// Parent of a node, `None` for the root.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        return self.node(id).and_then(|n| return n.parent);
    }

    /// Immediately preceding sibling of any kind.
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        return self.node(id).and_then(|n| return n.prev_sibling);
    }

    /// Strict ancestors, innermost first, ending at the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        return std::iter::successors(self.parent(id), move |&n| return self.parent(n));
    }

    /// Children in order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let first = self.node(id).and_then(|n| return n.first_child);
        return std::iter::successors(first, move |&n| {
            return self.node(n).and_then(|c| return c.next_sibling);
        });
    }

    /// Every node in document order (pre-order), root first.
    pub fn descendants(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            order.push(id);
            let mut children: Vec<NodeId> = self.children(id).collect();
            children.reverse();
            stack.extend(children);
        }
        return order;
    }
}

/// Parse HTML into a document tree.
///
/// Tag and attribute names are lowercased. Attribute values stay raw source
/// text so byte offsets computed from `value_start` match the file exactly.
///
/// # Errors
///
/// Returns `Error::FileTooLarge` if the source exceeds the size limit,
/// `Error::ParseFailed` if tree-sitter cannot parse it,
/// or `Error::UnsupportedLanguage` if the path has no HTML grammar.
pub fn parse_document(file_path: &Path, source: &str) -> Result<Document, Error> {
    let language = grammar::language_for_path(file_path)?;
    let tree = grammar::parse_source(file_path, source, &language)?;

    let mut document = Document::new();
    let root = document.root();
    append_syntax_children(&mut document, root, tree.root_node(), source);
    return Ok(document);
}

/// Mirror the children of a syntax node under `parent`.
fn append_syntax_children(document: &mut Document, parent: NodeId, syntax: SyntaxNode<'_>, source: &str) {
    let mut cursor = syntax.walk();
    for child in syntax.named_children(&mut cursor) {
        append_syntax_node(document, parent, child, source);
    }
}

/// Mirror one syntax node. Recovery (`ERROR`) nodes are transparent: their
/// children attach to the enclosing element.
fn append_syntax_node(document: &mut Document, parent: NodeId, syntax: SyntaxNode<'_>, source: &str) {
    match syntax.kind() {
        "element" | "script_element" | "style_element" => {
            let Some(tag) = element_tag(syntax) else {
                return;
            };
            let (name, attributes) = tag_name_and_attributes(tag, source);
            let id = document.append(parent, NodeKind::Element(name), attributes);
            append_syntax_children(document, id, syntax, source);
        },
        "text" | "raw_text" => {
            document.append(parent, NodeKind::Text, Vec::new());
        },
        "comment" => {
            document.append(parent, NodeKind::Comment, Vec::new());
        },
        "doctype" => {
            document.append(parent, NodeKind::Doctype, Vec::new());
        },
        "ERROR" => append_syntax_children(document, parent, syntax, source),
        // Tags were consumed with their element; stray end tags carry nothing.
        _ => {},
    }
}

/// The opening tag of an element node.
fn element_tag(element: SyntaxNode<'_>) -> Option<SyntaxNode<'_>> {
    let mut cursor = element.walk();
    return element
        .named_children(&mut cursor)
        .find(|c| return matches!(c.kind(), "start_tag" | "self_closing_tag"));
}

/// Read the lowercased tag name and the attributes of a start or
/// self-closing tag.
pub(crate) fn tag_name_and_attributes(tag: SyntaxNode<'_>, source: &str) -> (String, Vec<Attribute>) {
    let mut name = String::new();
    let mut attributes = Vec::new();

    let mut cursor = tag.walk();
    for child in tag.named_children(&mut cursor) {
        match child.kind() {
            "tag_name" => {
                name = child.utf8_text(source.as_bytes()).unwrap_or("").to_ascii_lowercase();
            },
            "attribute" => {
                if let Some(attribute) = attribute_from_syntax(child, source) {
                    attributes.push(attribute);
                }
            },
            _ => {},
        }
    }
    return (name, attributes);
}

/// Build an attribute from an `attribute` node. A bare attribute (`hidden`)
/// gets an empty value starting right after its name.
fn attribute_from_syntax(attribute: SyntaxNode<'_>, source: &str) -> Option<Attribute> {
    let mut key = None;
    let mut value = String::new();
    let mut value_start = attribute.end_byte();

    let mut cursor = attribute.walk();
    for child in attribute.named_children(&mut cursor) {
        match child.kind() {
            "attribute_name" => {
                key = Some(child.utf8_text(source.as_bytes()).ok()?.to_ascii_lowercase());
            },
            "attribute_value" => {
                value = child.utf8_text(source.as_bytes()).ok()?.to_string();
                value_start = child.start_byte();
            },
            "quoted_attribute_value" => {
                (value, value_start) = quoted_value(child, source)?;
            },
            _ => {},
        }
    }

    return Some(Attribute { key: key?, value, value_start });
}

/// Text and start of a quoted value. An empty `""` has no inner value node,
/// so its start is the byte after the opening quote.
fn quoted_value(quoted: SyntaxNode<'_>, source: &str) -> Option<(String, usize)> {
    let mut cursor = quoted.walk();
    let inner = quoted
        .named_children(&mut cursor)
        .find(|c| return c.kind() == "attribute_value");

    return match inner {
        Some(value) => Some((value.utf8_text(source.as_bytes()).ok()?.to_string(), value.start_byte())),
        None => Some((String::new(), quoted.start_byte().saturating_add(1))),
    };
}
