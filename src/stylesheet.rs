//! Stylesheet rules read off the tree-sitter CSS syntax tree.
//!
//! The rest of the crate only sees [`StylesheetRule`]s: selector chains and
//! declarations with the 1-based positions a text parser reports. Turning
//! those back into byte spans is the offset locator's job.

use std::path::Path;

use tree_sitter::Node;

use crate::error::Error;
use crate::grammar;
use crate::offsets::Position;

/// One selector chain of a rule, as written (e.g. `.panel > .panel-body`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorChain {
    /// Where the chain starts.
    pub position: Position,
    /// Raw chain text.
    pub text: String,
}

/// One `property: value` declaration of a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Where the property name starts.
    pub position: Position,
    /// Property name as written, vendor prefix included.
    pub property: String,
}

/// A rule set: its comma-separated selector chains and its declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StylesheetRule {
    /// Declarations in source order.
    pub declarations: Vec<Declaration>,
    /// Selector chains in source order.
    pub selectors: Vec<SelectorChain>,
}

/// Parse a stylesheet into its rule sets, in document order.
///
/// Rule sets nested in at-rule blocks (`@media`, `@supports`) or inside
/// other rule sets are included. A rule set containing a syntax error, and
/// any text tree-sitter could not place at all, is logged and dropped; the
/// rest of the file is kept.
///
/// # Errors
///
/// Returns `Error::FileTooLarge` if the source exceeds the size limit,
/// `Error::ParseFailed` if tree-sitter produces no tree,
/// or `Error::UnsupportedLanguage` if the path has no CSS grammar.
pub fn parse_stylesheet(file_path: &Path, source: &str) -> Result<Vec<StylesheetRule>, Error> {
    let language = grammar::language_for_path(file_path)?;
    let tree = grammar::parse_source(file_path, source, &language)?;

    let mut rules = Vec::new();
    collect_rule_sets(tree.root_node(), file_path, source, &mut rules);
    return Ok(rules);
}

/// One-based line of the first error or missing node, depth first.
fn first_error_line(node: Node<'_>) -> Option<usize> {
    if node.is_error() || node.is_missing() {
        return Some(node.start_position().row.saturating_add(1));
    }
    let mut cursor = node.walk();
    return node
        .children(&mut cursor)
        .filter(|c| return c.has_error())
        .find_map(first_error_line);
}

/// Walk the tree and collect every well-formed `rule_set`, parents before
/// nested rules.
///
/// An erroneous rule set or recovery node is dropped, but well-formed rule
/// sets the recovery swallowed into it are still collected.
fn collect_rule_sets(node: Node<'_>, file_path: &Path, source: &str, rules: &mut Vec<StylesheetRule>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        let is_rule_set = child.kind() == "rule_set";
        if child.is_error() || (is_rule_set && child.has_error()) {
            let line = first_error_line(child).unwrap_or_else(|| return child.start_position().row.saturating_add(1));
            log::warn!("{}:{line}: syntax error, skipping rule", file_path.display());
        } else if is_rule_set {
            rules.push(rule_from_rule_set(child, source));
        }
        collect_rule_sets(child, file_path, source, rules);
    }
}

/// Build a rule from a `rule_set` node's `selectors` and `block` children.
fn rule_from_rule_set(rule_set: Node<'_>, source: &str) -> StylesheetRule {
    let mut rule = StylesheetRule {
        declarations: Vec::new(),
        selectors: Vec::new(),
    };

    let mut cursor = rule_set.walk();
    for child in rule_set.children(&mut cursor) {
        match child.kind() {
            "selectors" => rule.selectors = selector_chains(child, source),
            "block" => rule.declarations = block_declarations(child, source),
            _ => {},
        }
    }
    return rule;
}

/// Each named child of `selectors` is one comma-separated chain.
fn selector_chains(selectors: Node<'_>, source: &str) -> Vec<SelectorChain> {
    let mut cursor = selectors.walk();
    return selectors
        .named_children(&mut cursor)
        .filter(|n| return n.kind() != "comment")
        .filter_map(|n| {
            let text = n.utf8_text(source.as_bytes()).ok()?;
            return Some(SelectorChain {
                position: position_of(n, source)?,
                text: text.to_string(),
            });
        })
        .collect();
}

/// The property names of the declarations directly inside a block.
fn block_declarations(block: Node<'_>, source: &str) -> Vec<Declaration> {
    let mut cursor = block.walk();
    return block
        .named_children(&mut cursor)
        .filter(|n| return n.kind() == "declaration")
        .filter_map(|decl| {
            let property = decl.named_child(0).filter(|p| return p.kind() == "property_name")?;
            let text = property.utf8_text(source.as_bytes()).ok()?;
            return Some(Declaration {
                position: position_of(property, source)?,
                property: text.to_string(),
            });
        })
        .collect();
}

/// Convert a node's start point into a 1-based position whose column counts
/// characters. Tree-sitter columns are byte offsets within the line.
fn position_of(node: Node<'_>, source: &str) -> Option<Position> {
    let point = node.start_position();
    let start = node.start_byte();
    let line_start = start.checked_sub(point.column)?;
    let prefix = source.get(line_start..start)?;

    return Some(Position {
        column: u32::try_from(prefix.chars().count()).ok()?.checked_add(1)?,
        line: u32::try_from(point.row).ok()?.checked_add(1)?,
    });
}
