//! Selector definitions and property documentation references built from
//! parsed stylesheet rules.
//!
//! Definitions accumulate in a [`DefinitionSet`] during the stylesheet pass.
//! The HTML pass only accepts [`FrozenDefinitions`], so every stylesheet must
//! be processed before the first document is resolved.

use std::collections::HashSet;

use crate::linkage::StylesheetLinks;
use crate::offsets;
use crate::selector;
use crate::stylesheet::StylesheetRule;
use crate::types::{Definition, RefTarget, Reference};

/// Definitions under construction. At most one per `(name, path)`; the
/// first occurrence wins.
#[derive(Debug, Default)]
pub struct DefinitionSet {
    /// Definitions in insertion order.
    definitions: Vec<Definition>,
    /// `(name, path)` keys already taken.
    seen: HashSet<(String, String)>,
}

impl DefinitionSet {
    /// An empty set.
    pub fn new() -> Self {
        return Self::default();
    }

    /// Insert a definition unless one with the same name and path exists.
    /// Returns whether it was inserted; duplicates are dropped, not merged.
    pub fn insert(&mut self, definition: Definition) -> bool {
        let key = (definition.name().to_string(), definition.path.clone());
        if !self.seen.insert(key) {
            return false;
        }
        self.definitions.push(definition);
        return true;
    }

    /// End the stylesheet pass. Nothing can be added afterwards.
    pub fn freeze(self) -> FrozenDefinitions {
        return FrozenDefinitions {
            definitions: self.definitions,
        };
    }
}

/// The complete, read-only definition set of a unit.
#[derive(Debug, Default)]
pub struct FrozenDefinitions {
    /// Definitions in insertion order.
    definitions: Vec<Definition>,
}

impl FrozenDefinitions {
    /// All definitions in insertion order.
    pub fn as_slice(&self) -> &[Definition] {
        return &self.definitions;
    }

    /// Take ownership of the definitions for output.
    pub fn into_vec(self) -> Vec<Definition> {
        return self.definitions;
    }

    /// Definitions whose stylesheet a document links.
    pub fn visible_from(&self, links: &StylesheetLinks) -> Vec<&Definition> {
        return self
            .definitions
            .iter()
            .filter(|d| return links.contains(&d.file))
            .collect();
    }
}

/// Add the definitions of one stylesheet to `set` and return the references
/// the stylesheet itself produces.
///
/// Each new definition gets a definition-site reference to itself. Each
/// declaration gets a reference to the documentation page of its property.
/// Chains that are empty or have no id/class component are skipped.
pub fn build_stylesheet(
    set: &mut DefinitionSet,
    file: &str,
    source: &str,
    rules: &[StylesheetRule],
    docs_url: &str,
) -> Vec<Reference> {
    let mut refs = Vec::new();

    for rule in rules {
        for chain in &rule.selectors {
            if chain.text.trim().is_empty() {
                log::warn!("{file}:{}: empty selector, skipping", chain.position.line);
                continue;
            }
            let Some(canonical) = selector::normalize(&chain.text) else {
                log::debug!("{file}:{}: no id/class in `{}`", chain.position.line, chain.text);
                continue;
            };

            let span = offsets::find_offsets(source, chain.position, &chain.text);
            let definition = Definition::new(file, canonical, span.clone());
            let path = definition.path.clone();
            if set.insert(definition) {
                refs.push(Reference {
                    definition_site: true,
                    file: file.to_string(),
                    span,
                    target: RefTarget::Definition { path },
                });
            }
        }

        for declaration in &rule.declarations {
            refs.push(Reference {
                definition_site: false,
                file: file.to_string(),
                span: offsets::find_offsets(source, declaration.position, &declaration.property),
                target: RefTarget::Documentation {
                    url: selector::documentation_url(docs_url, &declaration.property),
                },
            });
        }
    }

    return refs;
}
