//! Which stylesheets an HTML document links with `<link rel="stylesheet">`.

use std::path::{Path, PathBuf};

use tree_sitter::Node;

use crate::dom;
use crate::error::Error;
use crate::grammar;
use crate::paths::normalize_slash_path;

/// Normalised, forward-slash paths of the stylesheets one document links.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StylesheetLinks {
    /// Linked paths in source order, duplicates kept.
    paths: Vec<String>,
}

impl StylesheetLinks {
    /// Build a link set from already normalised paths.
    pub fn from_paths(paths: Vec<String>) -> Self {
        return Self { paths };
    }

    /// Whether a unit file (as listed in the unit) is linked by this document.
    pub fn contains(&self, file: &str) -> bool {
        let normalized = normalize_slash_path(Path::new(file));
        return self.paths.iter().any(|p| return *p == normalized);
    }

    /// True when the document links no stylesheet at all.
    pub fn is_empty(&self) -> bool {
        return self.paths.is_empty();
    }

    /// Linked paths in source order.
    pub fn paths(&self) -> &[String] {
        return &self.paths;
    }
}

/// Collect every `<link rel="stylesheet" href=...>` tag of an HTML file.
///
/// Walks the tags in source order, so links outside `<head>` count too. Each
/// `href` is resolved against the document's directory and normalised.
///
/// # Errors
///
/// Returns `Error::FileTooLarge` if the source exceeds the size limit,
/// `Error::ParseFailed` if tree-sitter cannot parse it,
/// or `Error::UnsupportedLanguage` if the path has no HTML grammar.
pub fn linked_stylesheets(file_path: &Path, source: &str) -> Result<StylesheetLinks, Error> {
    let language = grammar::language_for_path(file_path)?;
    let tree = grammar::parse_source(file_path, source, &language)?;
    let document_dir = file_path.parent().unwrap_or(Path::new(""));

    let mut paths = Vec::new();
    for_each_tag(tree.root_node(), |tag| {
        if let Some(href) = stylesheet_href(tag, source)
            && let Some(path) = resolve_href(document_dir, &href)
        {
            paths.push(path);
        }
    });

    return Ok(StylesheetLinks::from_paths(paths));
}

/// Visit every start and self-closing tag in document order.
fn for_each_tag<'t>(root: Node<'t>, mut visit: impl FnMut(Node<'t>)) {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        let is_tag = matches!(node.kind(), "start_tag" | "self_closing_tag");
        if is_tag {
            visit(node);
        }
        if !is_tag && cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

/// The `href` of a tag when it is `<link rel="stylesheet">`.
fn stylesheet_href(tag: Node<'_>, source: &str) -> Option<String> {
    let (name, attributes) = dom::tag_name_and_attributes(tag, source);
    if name != "link" {
        return None;
    }

    let mut is_stylesheet = false;
    let mut href = None;
    for attribute in attributes {
        match attribute.key.as_str() {
            "href" => href = Some(attribute.value),
            "rel" => is_stylesheet = attribute.value == "stylesheet",
            _ => {},
        }
    }
    return href.filter(|_| return is_stylesheet);
}

/// Resolve an `href` to a unit-relative path.
///
/// Remote URLs resolve to nothing. A leading `/` is the unit root. Query
/// strings and fragments are dropped.
fn resolve_href(document_dir: &Path, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with("//") || href.contains("://") {
        return None;
    }
    let href = href.split(['?', '#']).next().unwrap_or(href);

    let joined = match href.strip_prefix('/') {
        Some(root_relative) => PathBuf::from(root_relative),
        None => document_dir.join(href),
    };
    return Some(normalize_slash_path(&joined));
}
