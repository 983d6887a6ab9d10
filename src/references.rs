//! References from HTML `id`/`class` tokens to the selector definitions
//! they use.

use std::collections::HashMap;
use std::ops::Range;
use std::path::Path;

use crate::combinators::{self, SelectorNode};
use crate::definitions::FrozenDefinitions;
use crate::dom::{self, Document, NodeId, NodeKind};
use crate::error::Error;
use crate::linkage;
use crate::types::{Definition, RefTarget, Reference, Selector, SelectorKind};

/// Signature shared by the four combinator forms.
type CombinatorFn = fn(&Document, SelectorNode<'_>) -> Vec<String>;

/// Combinator forms in the order their candidates are tried.
const COMBINATOR_PRIORITY: [CombinatorFn; 4] = [
    combinators::descendant_selectors,
    combinators::child_selectors,
    combinators::adjacent_sibling_selectors,
    combinators::general_sibling_selectors,
];

/// Visible definitions by name, first definition per name winning.
struct NameIndex<'d> {
    /// Definition for each name.
    by_name: HashMap<&'d str, &'d Definition>,
    /// Whether any name spans more than one compound selector. Combinator
    /// candidates always do, so without such a name they cannot match.
    has_chains: bool,
}

impl<'d> NameIndex<'d> {
    /// Index the given definitions, keeping the first per name.
    fn new(visible: &[&'d Definition]) -> Self {
        let mut by_name = HashMap::new();
        for &definition in visible {
            by_name.entry(definition.name()).or_insert(definition);
        }
        let has_chains = by_name.keys().any(|name| return name.contains([' ', '>', '+', '~']));
        return Self { by_name, has_chains };
    }

    /// Definition named exactly `name`.
    fn get(&self, name: &str) -> Option<&'d Definition> {
        return self.by_name.get(name).copied();
    }
}

/// References for one HTML document.
///
/// A document linking no stylesheet, or only stylesheets that define
/// nothing, yields no references and is never parsed into a tree.
///
/// # Errors
///
/// Returns `Error::FileTooLarge`, `Error::ParseFailed`, or
/// `Error::UnsupportedLanguage` from parsing the document.
pub fn document_references(
    definitions: &FrozenDefinitions,
    file: &str,
    source: &str,
) -> Result<Vec<Reference>, Error> {
    let path = Path::new(file);
    let links = linkage::linked_stylesheets(path, source)?;
    if links.is_empty() {
        log::debug!("{file}: no linked stylesheets");
        return Ok(Vec::new());
    }
    log::debug!("{file}: links {}", links.paths().join(", "));

    let visible = definitions.visible_from(&links);
    if visible.is_empty() {
        log::debug!("{file}: linked stylesheets define no selectors");
        return Ok(Vec::new());
    }

    let document = dom::parse_document(path, source)?;
    return Ok(resolve_document(&document, file, &visible));
}

/// Walk every element and emit a reference for each `id`/`class` token that
/// resolves against `visible`. Unresolved tokens are skipped silently.
pub fn resolve_document(document: &Document, file: &str, visible: &[&Definition]) -> Vec<Reference> {
    let index = NameIndex::new(visible);
    let mut refs = Vec::new();

    for id in document.descendants() {
        let Some(node) = document.node(id) else {
            continue;
        };
        if !matches!(node.kind, NodeKind::Element(_)) {
            continue;
        }

        for attribute in &node.attributes {
            let Some(kind) = SelectorKind::from_attribute(&attribute.key) else {
                continue;
            };

            // Every token advances the cursor, matched or not, so spans stay
            // exact after unknown or empty tokens.
            let mut start = attribute.value_start;
            for token in attribute.value.split(' ') {
                let end = start.saturating_add(token.len());
                if !token.is_empty()
                    && let Some(definition) = resolve_token(document, id, &Selector::from_token(kind, token), &index)
                {
                    refs.push(Reference {
                        definition_site: false,
                        file: file.to_string(),
                        span: byte_span(start, end),
                        target: RefTarget::Definition {
                            path: definition.path.clone(),
                        },
                    });
                }
                start = end.saturating_add(1);
            }
        }
    }

    return refs;
}

/// Best definition for one token: a direct name match first, then the first
/// combinator candidate that names a definition, trying descendant, child,
/// adjacent, and general forms in that order.
///
/// Definitions built from stylesheets are keyed by a single component, so
/// they never take the combinator path; only chain-named definitions do.
fn resolve_token<'d>(
    document: &Document,
    node: NodeId,
    candidate: &Selector,
    index: &NameIndex<'d>,
) -> Option<&'d Definition> {
    if let Some(definition) = index.get(candidate.as_str()) {
        return Some(definition);
    }
    if !index.has_chains {
        return None;
    }

    let target = SelectorNode { node, selector: candidate };
    return COMBINATOR_PRIORITY
        .iter()
        .flat_map(|form| return form(document, target))
        .find_map(|chain| return index.get(&chain));
}

/// Byte offsets narrowed for output. `None` if they overflow `u32`.
fn byte_span(start: usize, end: usize) -> Option<Range<u32>> {
    return Some(u32::try_from(start).ok()?..u32::try_from(end).ok()?);
}

#[cfg(test)]
#[allow(clippy::indexing_slicing, clippy::unwrap_used, reason = "test assertions")]
mod tests {
    use super::*;
    use crate::definitions::{DefinitionSet, build_stylesheet};
    use crate::selector::DEFAULT_DOCS_URL;
    use crate::stylesheet::parse_stylesheet;

    fn frozen(stylesheets: &[(&str, &str)]) -> FrozenDefinitions {
        let mut set = DefinitionSet::new();
        for (file, source) in stylesheets {
            let rules = parse_stylesheet(Path::new(file), source).unwrap();
            build_stylesheet(&mut set, file, source, &rules, DEFAULT_DOCS_URL);
        }
        return set.freeze();
    }

    fn spans(source: &str, refs: &[Reference]) -> Vec<(String, String)> {
        return refs
            .iter()
            .map(|r| {
                let span = r.span.clone().unwrap();
                let start = usize::try_from(span.start).unwrap();
                let end = usize::try_from(span.end).unwrap();
                let RefTarget::Definition { path } = &r.target else {
                    panic!("document references always target definitions");
                };
                return (source[start..end].to_string(), path.clone());
            })
            .collect();
    }

    #[test]
    fn resolves_tokens_of_linked_stylesheets() {
        let definitions = frozen(&[("css/site.css", "#app { } .btn { } .btn-sm { }")]);
        let html = r#"<link rel="stylesheet" href="css/site.css">
<div id="app"><a class="btn unknown  btn-sm">go</a></div>"#;

        let refs = document_references(&definitions, "index.html", html).unwrap();
        assert_eq!(
            spans(html, &refs),
            vec![
                ("app".to_string(), "css/site.css#app".to_string()),
                ("btn".to_string(), "css/site.css.btn".to_string()),
                ("btn-sm".to_string(), "css/site.css.btn-sm".to_string()),
            ]
        );
        assert!(refs.iter().all(|r| return !r.definition_site && r.file == "index.html"));
    }

    #[test]
    fn unlinked_document_gets_nothing() {
        let definitions = frozen(&[("css/site.css", ".btn { }")]);
        let html = r#"<a class="btn">go</a>"#;
        assert!(document_references(&definitions, "index.html", html).unwrap().is_empty());
    }

    #[test]
    fn definitions_from_other_stylesheets_are_invisible() {
        let definitions = frozen(&[("a.css", ".only-a { }"), ("b.css", ".only-b { }")]);
        let html = r#"<link rel="stylesheet" href="b.css"><p class="only-a only-b"></p>"#;

        let refs = document_references(&definitions, "page.html", html).unwrap();
        assert_eq!(spans(html, &refs), vec![("only-b".to_string(), "b.css.only-b".to_string())]);
    }

    #[test]
    fn stylesheet_paths_resolve_from_the_document_directory() {
        let definitions = frozen(&[("css/site.css", ".nav { }")]);
        let html = r#"<link rel="stylesheet" href="../css/site.css"><nav class="nav"></nav>"#;

        let refs = document_references(&definitions, "pages/about.html", html).unwrap();
        assert_eq!(refs.len(), 1);
    }

    #[test]
    fn first_visible_definition_wins_by_name() {
        let definitions = frozen(&[("a.css", ".card { }"), ("b.css", ".card { }")]);
        let html = r#"<link rel="stylesheet" href="b.css"><link rel="stylesheet" href="a.css"><div class="card"></div>"#;

        let refs = document_references(&definitions, "x.html", html).unwrap();
        assert_eq!(spans(html, &refs), vec![("card".to_string(), "a.css.card".to_string())]);
    }

    #[test]
    fn combinator_candidates_resolve_chain_named_definitions() {
        let mut document = Document::new();
        let root = document.root();
        let attrs = |key: &str, value: &str| {
            return vec![dom::Attribute {
                key: key.to_string(),
                value: value.to_string(),
                value_start: 0,
            }];
        };
        let list = document.append(root, NodeKind::Element("ul".to_string()), attrs("id", "menu"));
        document.append(list, NodeKind::Element("li".to_string()), attrs("class", "first"));
        let item = document.append(list, NodeKind::Element("li".to_string()), attrs("class", "item"));
        document.append(item, NodeKind::Element("a".to_string()), attrs("class", "link"));

        let child = Definition::new("m.css", Selector::parse("#menu > .item").unwrap(), Some(0..13));
        let adjacent = Definition::new("m.css", Selector::parse(".first + .item").unwrap(), Some(20..34));
        let descendant = Definition::new("m.css", Selector::parse("#menu .item .link").unwrap(), Some(40..58));
        let visible = vec![&adjacent, &child, &descendant];

        let refs = resolve_document(&document, "m.html", &visible);
        let targets: Vec<&RefTarget> = refs.iter().map(|r| return &r.target).collect();
        assert_eq!(
            targets,
            vec![
                &RefTarget::Definition { path: "m.css#menu > .item".to_string() },
                &RefTarget::Definition { path: "m.css#menu .item .link".to_string() },
            ]
        );
    }

    #[test]
    fn document_with_no_visible_definitions_short_circuits() {
        let definitions = frozen(&[("empty.css", "div { color: red }")]);
        let html = r#"<link rel="stylesheet" href="empty.css"><div class="x"></div>"#;
        assert!(document_references(&definitions, "x.html", html).unwrap().is_empty());
    }
}
