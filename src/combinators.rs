//! Candidate selector strings for every combinator form an element can be
//! reached by.
//!
//! Given an element and the selector it was matched with, each function walks
//! the document (read-only) and spells out the descendant (` `), child (`>`),
//! adjacent-sibling (`+`) or general-sibling (`~`) chains that end at it.

use crate::dom::{Document, NodeId, NodeKind};
use crate::types::{Selector, SelectorKind};

/// An element together with the selector it was matched on.
#[derive(Debug, Clone, Copy)]
pub struct SelectorNode<'a> {
    /// The element.
    pub node: NodeId,
    /// Its matched selector, the right end of every candidate.
    pub selector: &'a Selector,
}

/// A candidate chain and the ancestor its leftmost token belongs to.
struct Chain {
    /// Node contributing the leftmost token.
    node: NodeId,
    /// Chain text.
    text: String,
}

/// The selectors an element's `id` and `class` attributes address, in
/// attribute order then token order. Values split on single spaces; empty
/// tokens and other attributes address nothing. Non-elements have none.
pub fn selector_tokens(document: &Document, id: NodeId) -> Vec<Selector> {
    let Some(node) = document.node(id) else {
        return Vec::new();
    };
    if !matches!(node.kind, NodeKind::Element(_)) {
        return Vec::new();
    }

    let mut tokens = Vec::new();
    for attribute in &node.attributes {
        let Some(kind) = SelectorKind::from_attribute(&attribute.key) else {
            continue;
        };
        tokens.extend(
            attribute
                .value
                .split(' ')
                .filter(|t| return !t.is_empty())
                .map(|t| return Selector::from_token(kind, t)),
        );
    }
    return tokens;
}

/// Every descendant-combinator chain ending at the element.
///
/// Walks strictly upward to the root. Each ancestor token is prefixed to the
/// element's own selector and to every chain already built from ancestors
/// below it, so multi-level chains (`#app #wrap .sel`) are produced, not just
/// ancestor pairs. Output is in walk order, innermost ancestor first.
pub fn descendant_selectors(document: &Document, target: SelectorNode<'_>) -> Vec<String> {
    return upward_chains(document, target, " ", |_, _| return true);
}

/// Every child-combinator chain ending at the element.
///
/// Same walk as [`descendant_selectors`], but a link is only added across a
/// true parent-child edge, so no chain skips a generation.
pub fn child_selectors(document: &Document, target: SelectorNode<'_>) -> Vec<String> {
    return upward_chains(document, target, " > ", |below, ancestor| {
        return document.parent(below) == Some(ancestor);
    });
}

/// Adjacent-sibling chains: the immediately preceding sibling's tokens
/// joined with `+`. No further siblings are examined.
pub fn adjacent_sibling_selectors(document: &Document, target: SelectorNode<'_>) -> Vec<String> {
    return previous_sibling_chains(document, target, " + ");
}

/// General-sibling chains: the immediately preceding sibling's tokens joined
/// with `~`.
///
/// Deliberately narrower than CSS: earlier siblings are not examined. This
/// pins existing behaviour; widening it changes which definitions resolve.
pub fn general_sibling_selectors(document: &Document, target: SelectorNode<'_>) -> Vec<String> {
    return previous_sibling_chains(document, target, " ~ ");
}

/// Shared upward walk for the descendant and child forms.
///
/// `links(below, ancestor)` decides whether a chain whose leftmost token
/// sits on `below` (or the target itself) may be extended by `ancestor`.
fn upward_chains(
    document: &Document,
    target: SelectorNode<'_>,
    combinator: &str,
    links: impl Fn(NodeId, NodeId) -> bool,
) -> Vec<String> {
    let mut chains: Vec<Chain> = Vec::new();

    for ancestor in document.ancestors(target.node) {
        for token in selector_tokens(document, ancestor) {
            // Chains added for earlier tokens of this ancestor sit on the same
            // node and are never extended by it.
            let extended: Vec<Chain> = chains
                .iter()
                .filter(|c| return c.node != ancestor && links(c.node, ancestor))
                .map(|c| {
                    return Chain {
                        node: ancestor,
                        text: format!("{token}{combinator}{}", c.text),
                    };
                })
                .collect();
            chains.extend(extended);

            if links(target.node, ancestor) {
                chains.push(Chain {
                    node: ancestor,
                    text: format!("{token}{combinator}{}", target.selector),
                });
            }
        }
    }

    return chains.into_iter().map(|c| return c.text).collect();
}

/// Shared body of the two sibling forms.
fn previous_sibling_chains(document: &Document, target: SelectorNode<'_>, combinator: &str) -> Vec<String> {
    let Some(prev) = document.prev_sibling(target.node) else {
        return Vec::new();
    };
    return selector_tokens(document, prev)
        .into_iter()
        .map(|token| return format!("{token}{combinator}{}", target.selector))
        .collect();
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "test assertions")]
mod tests {
    use super::*;
    use crate::dom::Attribute;

    fn attrs(pairs: &[(&str, &str)]) -> Vec<Attribute> {
        return pairs
            .iter()
            .map(|(key, value)| {
                return Attribute {
                    key: (*key).to_string(),
                    value: (*value).to_string(),
                    value_start: 0,
                };
            })
            .collect();
    }

    fn element(document: &mut Document, parent: NodeId, pairs: &[(&str, &str)]) -> NodeId {
        return document.append(parent, NodeKind::Element("div".to_string()), attrs(pairs));
    }

    fn sorted(mut selectors: Vec<String>) -> Vec<String> {
        selectors.sort();
        return selectors;
    }

    fn expected(selectors: &[&str]) -> Vec<String> {
        return sorted(selectors.iter().map(|s| return (*s).to_string()).collect());
    }

    #[test]
    fn descendant_chains_compose_across_every_level() {
        let mut document = Document::new();
        let root = document.root();
        let app = element(&mut document, root, &[("id", "app")]);
        let wrapper = element(&mut document, app, &[("id", "container-wrapper"), ("class", "col-xs-6")]);
        let container = element(
            &mut document,
            wrapper,
            &[("id", "container container2"), ("class", "section col-xs-12 center")],
        );
        let inner = element(&mut document, container, &[("class", "container-inner col-xs-12")]);

        let selector = Selector::parse(".container-inner").unwrap();
        let got = descendant_selectors(&document, SelectorNode { node: inner, selector: &selector });

        assert_eq!(
            sorted(got),
            expected(&[
                "#app .container-inner",
                "#app #container-wrapper .container-inner",
                "#app #container-wrapper #container .container-inner",
                "#app #container-wrapper #container2 .container-inner",
                "#app #container-wrapper .section .container-inner",
                "#app #container-wrapper .col-xs-12 .container-inner",
                "#app #container-wrapper .center .container-inner",
                "#app .col-xs-6 .container-inner",
                "#app .col-xs-6 #container .container-inner",
                "#app .col-xs-6 #container2 .container-inner",
                "#app .col-xs-6 .section .container-inner",
                "#app .col-xs-6 .col-xs-12 .container-inner",
                "#app .col-xs-6 .center .container-inner",
                "#app #container .container-inner",
                "#app #container2 .container-inner",
                "#app .section .container-inner",
                "#app .col-xs-12 .container-inner",
                "#app .center .container-inner",
                "#container-wrapper .container-inner",
                "#container-wrapper #container .container-inner",
                "#container-wrapper #container2 .container-inner",
                "#container-wrapper .section .container-inner",
                "#container-wrapper .col-xs-12 .container-inner",
                "#container-wrapper .center .container-inner",
                ".col-xs-6 .container-inner",
                ".col-xs-6 #container .container-inner",
                ".col-xs-6 #container2 .container-inner",
                ".col-xs-6 .section .container-inner",
                ".col-xs-6 .col-xs-12 .container-inner",
                ".col-xs-6 .center .container-inner",
                "#container .container-inner",
                "#container2 .container-inner",
                ".section .container-inner",
                ".col-xs-12 .container-inner",
                ".center .container-inner",
            ])
        );
    }

    #[test]
    fn descendant_walk_is_innermost_first() {
        let mut document = Document::new();
        let root = document.root();
        let outer = element(&mut document, root, &[("id", "outer")]);
        let inner = element(&mut document, outer, &[("class", "inner")]);
        let leaf = element(&mut document, inner, &[("class", "leaf")]);

        let selector = Selector::parse(".leaf").unwrap();
        let got = descendant_selectors(&document, SelectorNode { node: leaf, selector: &selector });
        assert_eq!(got, vec![".inner .leaf", "#outer .inner .leaf", "#outer .leaf"]);
    }

    #[test]
    fn child_chains_only_follow_parent_edges() {
        let mut document = Document::new();
        let root = document.root();
        let wrapper = element(&mut document, root, &[("id", "container-wrapper"), ("class", "col-xs-6")]);
        let container = element(&mut document, wrapper, &[("id", "container container2"), ("class", "section")]);
        let inner = element(&mut document, container, &[("id", "container-inner"), ("class", "container-inner")]);

        let selector = Selector::parse(".container-inner").unwrap();
        let got = child_selectors(&document, SelectorNode { node: inner, selector: &selector });

        assert_eq!(
            sorted(got),
            expected(&[
                "#container > .container-inner",
                "#container2 > .container-inner",
                ".section > .container-inner",
                "#container-wrapper > #container > .container-inner",
                "#container-wrapper > #container2 > .container-inner",
                "#container-wrapper > .section > .container-inner",
                ".col-xs-6 > #container > .container-inner",
                ".col-xs-6 > #container2 > .container-inner",
                ".col-xs-6 > .section > .container-inner",
            ])
        );
    }

    #[test]
    fn child_chain_breaks_at_a_tokenless_parent() {
        let mut document = Document::new();
        let root = document.root();
        let app = element(&mut document, root, &[("id", "app")]);
        let plain = element(&mut document, app, &[("title", "no selectors here")]);
        let leaf = element(&mut document, plain, &[("class", "leaf")]);

        let selector = Selector::parse(".leaf").unwrap();
        let node = SelectorNode { node: leaf, selector: &selector };
        assert!(child_selectors(&document, node).is_empty());
        assert_eq!(descendant_selectors(&document, node), vec!["#app .leaf"]);
    }

    #[test]
    fn adjacent_uses_only_the_previous_sibling() {
        let mut document = Document::new();
        let root = document.root();
        element(&mut document, root, &[("class", "far-away")]);
        element(&mut document, root, &[("id", "toolbar-aside"), ("class", "section col-xs-6 center")]);
        let aside = element(&mut document, root, &[("id", "content-aside"), ("class", "aside")]);

        let selector = Selector::parse(".aside").unwrap();
        let got = adjacent_sibling_selectors(&document, SelectorNode { node: aside, selector: &selector });
        assert_eq!(
            sorted(got),
            expected(&["#toolbar-aside + .aside", ".section + .aside", ".col-xs-6 + .aside", ".center + .aside"])
        );
    }

    #[test]
    fn general_uses_only_the_previous_sibling() {
        let mut document = Document::new();
        let root = document.root();
        element(&mut document, root, &[("class", "far-away")]);
        element(&mut document, root, &[("id", "aside-second-sibling"), ("class", "col-xs-6"), ("href", "#x")]);
        let aside = element(&mut document, root, &[("class", "aside")]);

        let selector = Selector::parse(".aside").unwrap();
        let got = general_sibling_selectors(&document, SelectorNode { node: aside, selector: &selector });
        assert_eq!(sorted(got), expected(&["#aside-second-sibling ~ .aside", ".col-xs-6 ~ .aside"]));
    }

    #[test]
    fn first_child_has_no_sibling_chains() {
        let mut document = Document::new();
        let root = document.root();
        let parent = element(&mut document, root, &[("class", "list")]);
        let first = element(&mut document, parent, &[("class", "item")]);

        let selector = Selector::parse(".item").unwrap();
        let node = SelectorNode { node: first, selector: &selector };
        assert!(adjacent_sibling_selectors(&document, node).is_empty());
        assert!(general_sibling_selectors(&document, node).is_empty());
    }

    #[test]
    fn text_sibling_blocks_sibling_chains() {
        let mut document = Document::new();
        let root = document.root();
        element(&mut document, root, &[("class", "before")]);
        document.append(root, NodeKind::Text, Vec::new());
        let after = element(&mut document, root, &[("class", "after")]);

        let selector = Selector::parse(".after").unwrap();
        let node = SelectorNode { node: after, selector: &selector };
        assert!(adjacent_sibling_selectors(&document, node).is_empty());
    }

    #[test]
    fn tokens_skip_empty_pieces_and_other_attributes() {
        let mut document = Document::new();
        let root = document.root();
        let node = element(&mut document, root, &[("class", "a  b"), ("data-id", "c"), ("id", "d")]);

        let tokens: Vec<String> = selector_tokens(&document, node).iter().map(ToString::to_string).collect();
        assert_eq!(tokens, vec![".a", ".b", "#d"]);
        assert!(selector_tokens(&document, root).is_empty());
    }
}
