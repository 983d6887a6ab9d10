//! CLI commands: discover and build-graph. Both read a JSON request from
//! stdin and write a JSON response to stdout.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::{Config, RequestConfig};
use crate::error::Error;
use crate::graph;
use crate::scanner;
use crate::unit::{self, GraphOutput, SourceUnit};

/// Walk the working directory and print it as a one-unit JSON array.
///
/// # Errors
///
/// Returns errors from reading stdin, parsing the request or the config,
/// walking the tree, or writing stdout.
pub fn discover() -> Result<(), Error> {
    let input = std::io::read_to_string(std::io::stdin())?;
    let root = current_dir()?;
    let unit = discover_in(&root, &input)?;

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &[unit])?;
    writeln!(stdout)?;
    return Ok(());
}

/// Build the graph of the unit on stdin and print it as JSON.
///
/// # Errors
///
/// Returns errors from reading stdin, decoding the unit, loading the
/// config, or writing stdout.
pub fn build_graph() -> Result<(), Error> {
    let input = std::io::read_to_string(std::io::stdin())?;
    let root = current_dir()?;
    let output = build_graph_in(&root, &input)?;

    write_json(&output)?;
    return Ok(());
}

/// `discover` against an explicit root and request body.
///
/// # Errors
///
/// Returns `Error::Json` for a malformed request, config errors from
/// `.selgraph.toml`, or `Error::Walk` from the traversal.
fn discover_in(root: &Path, input: &str) -> Result<SourceUnit, Error> {
    let request = RequestConfig::parse(input)?;
    let config = Config::load(root)?.with_request(request);
    let unit = scanner::discover(root, &config)?;
    log::debug!("discovered {} files in unit {}", unit.files.len(), unit.name);
    return Ok(unit);
}

/// `build-graph` against an explicit root and request body.
///
/// # Errors
///
/// Returns unit decoding errors or config errors from `.selgraph.toml`.
fn build_graph_in(root: &Path, input: &str) -> Result<GraphOutput, Error> {
    let unit = unit::decode_units(input)?;
    let config = Config::load(root)?;
    let graph = graph::build_graph(root, &unit, &config);
    log::debug!(
        "unit {}: {} definitions, {} references",
        unit.name,
        graph.definitions.len(),
        graph.references.len()
    );
    return Ok(GraphOutput::from_graph(&unit, graph));
}

/// The absolute working directory, so the unit name is its basename even
/// when invoked as `.`.
///
/// # Errors
///
/// Returns `Error::Io` if the working directory is unavailable.
fn current_dir() -> Result<PathBuf, Error> {
    return Ok(std::env::current_dir()?);
}

/// Write a value to stdout as compact JSON followed by a newline.
///
/// # Errors
///
/// Returns `Error::Json` or `Error::Io` if serialization or the write fails.
fn write_json<T: Serialize>(value: &T) -> Result<(), Error> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer(&mut stdout, value)?;
    writeln!(stdout)?;
    return Ok(());
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "test assertions")]
mod tests {
    use super::*;

    #[test]
    fn discover_then_build_graph() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("site.css"), ".card { padding: 0 }").unwrap();
        std::fs::write(
            dir.path().join("index.html"),
            r#"<link rel="stylesheet" href="site.css"><div class="card"></div>"#,
        )
        .unwrap();

        let unit = discover_in(dir.path(), "").unwrap();
        assert_eq!(unit.files, vec!["index.html", "site.css"]);

        let request = serde_json::to_string(&[unit]).unwrap();
        let output = build_graph_in(dir.path(), &request).unwrap();
        assert_eq!(output.defs.len(), 1);
        // Definition site, documentation for `padding`, one HTML usage.
        assert_eq!(output.refs.len(), 3);
    }

    #[test]
    fn malformed_discover_request_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(discover_in(dir.path(), "{").unwrap_err(), Error::Json(_)));
    }
}
