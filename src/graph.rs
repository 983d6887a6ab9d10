//! Two-pass graph construction for one source unit.
//!
//! Every stylesheet is processed before any document, so a document can
//! reference selectors from stylesheets listed after it in the unit.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::definitions::{DefinitionSet, FrozenDefinitions, build_stylesheet};
use crate::error::Error;
use crate::grammar::{self, SourceKind};
use crate::references;
use crate::stylesheet;
use crate::types::{Definition, Reference};
use crate::unit::SourceUnit;

/// Definitions and references of one unit, in emission order.
#[derive(Debug, Default)]
pub struct Graph {
    /// Definitions in insertion order.
    pub definitions: Vec<Definition>,
    /// Stylesheet references first, then document references.
    pub references: Vec<Reference>,
}

/// Build the graph of `unit`, reading its files relative to `root`.
///
/// Files that cannot be read or parsed are logged and skipped, as are
/// malformed rules inside an otherwise readable stylesheet. Files that are
/// neither stylesheets nor HTML documents are ignored.
pub fn build_graph(root: &Path, unit: &SourceUnit, config: &Config) -> Graph {
    let unit_dir = root.join(&unit.dir);
    let mut references = Vec::new();

    let mut set = DefinitionSet::new();
    for file in files_of_kind(unit, SourceKind::Css) {
        let Some(source) = read_unit_file(&unit_dir, file) else {
            continue;
        };
        let rules = match stylesheet::parse_stylesheet(Path::new(file), &source) {
            Ok(rules) => rules,
            Err(e) => {
                log::warn!("skipping stylesheet: {e}");
                continue;
            },
        };
        references.extend(build_stylesheet(&mut set, file, &source, &rules, &config.docs_url));
    }
    let definitions = set.freeze();
    log::debug!("{}: {} definitions", unit.name, definitions.as_slice().len());

    for file in files_of_kind(unit, SourceKind::Html) {
        references.extend(document_pass(&unit_dir, &definitions, file));
    }

    return Graph {
        definitions: definitions.into_vec(),
        references,
    };
}

/// References of one HTML document, or none if it cannot be read or parsed.
fn document_pass(unit_dir: &Path, definitions: &FrozenDefinitions, file: &str) -> Vec<Reference> {
    let Some(source) = read_unit_file(unit_dir, file) else {
        return Vec::new();
    };
    return match references::document_references(definitions, file, &source) {
        Ok(found) => {
            log::debug!("{file}: {} references", found.len());
            found
        },
        Err(e) => {
            log::warn!("skipping document: {e}");
            Vec::new()
        },
    };
}

/// Unit files of one kind, in unit order.
fn files_of_kind(unit: &SourceUnit, kind: SourceKind) -> impl Iterator<Item = &str> {
    return unit
        .files
        .iter()
        .map(String::as_str)
        .filter(move |f| return grammar::source_kind(Path::new(f)) == Some(kind));
}

/// Read a unit file, logging and returning `None` on failure.
fn read_unit_file(unit_dir: &Path, file: &str) -> Option<String> {
    let path: PathBuf = unit_dir.join(file);
    return match std::fs::read_to_string(&path) {
        Ok(source) => Some(source),
        Err(e) => {
            log::warn!("failed to read {}: {}", path.display(), Error::Io(e));
            None
        },
    };
}
