//! Source unit descriptors and the JSON shapes of the build-graph response.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::graph::Graph;
use crate::types::{Definition, RefTarget, Reference};

/// Unit type shared by every unit and every selector definition.
pub const UNIT_TYPE: &str = "basic-css";

/// `defUnitType` of references that point at external documentation.
const DOCUMENTATION_UNIT_TYPE: &str = "URL";

/// `defUnit` of references that point at external documentation.
const DOCUMENTATION_UNIT: &str = "MDN";

/// Offset written when a span could not be located.
pub const MISSING_OFFSET: u32 = u32::MAX;

/// A set of source files analysed together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceUnit {
    /// Unit name, the basename of the discovered directory.
    #[serde(alias = "Name")]
    pub name: String,
    /// Always [`UNIT_TYPE`] for units this tool produces.
    #[serde(rename = "type", alias = "Type", default = "default_unit_type")]
    pub unit_type: String,
    /// Directory the file paths are relative to.
    #[serde(alias = "Dir", default = "default_dir")]
    pub dir: String,
    /// Unit-relative file paths, forward slashes.
    #[serde(alias = "Files", default, deserialize_with = "files_or_null")]
    pub files: Vec<String>,
}

impl SourceUnit {
    /// A unit of the given name rooted at `.` with no files yet.
    pub fn new(name: String) -> Self {
        return Self {
            name,
            unit_type: UNIT_TYPE.to_string(),
            dir: default_dir(),
            files: Vec::new(),
        };
    }
}

/// Serde default for [`SourceUnit::unit_type`].
fn default_unit_type() -> String {
    return UNIT_TYPE.to_string();
}

/// Serde default for [`SourceUnit::dir`].
fn default_dir() -> String {
    return ".".to_string();
}

/// Accept `"files": null` as an empty list.
fn files_or_null<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let files: Option<Vec<String>> = Option::deserialize(deserializer)?;
    return Ok(files.unwrap_or_default());
}

/// Decode the build-graph request: a list holding exactly one unit, or a
/// bare unit object.
///
/// # Errors
///
/// Returns `Error::Json` if the input is neither shape, `Error::NoUnits` for
/// an empty list, or `Error::MultipleUnits` for more than one unit.
pub fn decode_units(input: &str) -> Result<SourceUnit, Error> {
    let units = match serde_json::from_str::<Vec<SourceUnit>>(input) {
        Ok(units) => units,
        Err(_) => vec![serde_json::from_str::<SourceUnit>(input)?],
    };

    let count = units.len();
    let mut units = units.into_iter();
    return match (units.next(), count) {
        (None, _) => Err(Error::NoUnits),
        (Some(unit), 1) => Ok(unit),
        (Some(_), count) => Err(Error::MultipleUnits { count }),
    };
}

/// Opaque definition payload.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct DefData {
    /// Always `"selector"`.
    pub keyword: &'static str,
    /// `"id"` or `"class"`.
    pub kind: &'static str,
}

/// One definition as written to the response.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DefOutput {
    /// Unit type of the defining unit.
    pub unit_type: &'static str,
    /// Name of the defining unit.
    pub unit: String,
    /// Unit-scoped definition path.
    pub path: String,
    /// Canonical selector.
    pub name: String,
    /// Stylesheet the definition lives in.
    pub file: String,
    /// Start byte of the selector chain.
    pub def_start: u32,
    /// End byte of the selector chain.
    pub def_end: u32,
    /// Selector keyword and kind.
    pub data: DefData,
}

/// One reference as written to the response.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RefOutput {
    /// Unit type of the target, or `"URL"` for documentation.
    pub def_unit_type: &'static str,
    /// Unit of the target, or `"MDN"` for documentation.
    pub def_unit: String,
    /// Target definition path, or the documentation URL.
    pub def_path: String,
    /// Unit the referencing file belongs to.
    pub unit: String,
    /// Referencing file.
    pub file: String,
    /// Start byte of the referencing token.
    pub start: u32,
    /// End byte of the referencing token.
    pub end: u32,
    /// True only for a definition's reference to itself.
    pub def: bool,
}

/// The full build-graph response.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct GraphOutput {
    /// Every definition in insertion order.
    pub defs: Vec<DefOutput>,
    /// Every reference in emission order.
    pub refs: Vec<RefOutput>,
}

impl GraphOutput {
    /// Convert a built graph into its wire form for `unit`.
    pub fn from_graph(unit: &SourceUnit, graph: Graph) -> Self {
        let defs = graph
            .definitions
            .into_iter()
            .map(|d| return def_output(unit, d))
            .collect();
        let refs = graph
            .references
            .into_iter()
            .map(|r| return ref_output(unit, r))
            .collect();
        return Self { defs, refs };
    }
}

/// Wire form of a definition.
fn def_output(unit: &SourceUnit, definition: Definition) -> DefOutput {
    let (def_start, def_end) = definition_site_offsets(definition.span.as_ref());
    return DefOutput {
        unit_type: UNIT_TYPE,
        unit: unit.name.clone(),
        data: DefData {
            keyword: "selector",
            kind: definition.selector.kind().as_str(),
        },
        name: definition.selector.to_string(),
        path: definition.path,
        file: definition.file,
        def_start,
        def_end,
    };
}

/// Wire form of a reference.
fn ref_output(unit: &SourceUnit, reference: Reference) -> RefOutput {
    let (start, end) = if reference.definition_site {
        definition_site_offsets(reference.span.as_ref())
    } else {
        offsets(reference.span.as_ref())
    };
    let (def_unit_type, def_unit, def_path) = match reference.target {
        RefTarget::Definition { path } => (UNIT_TYPE, unit.name.clone(), path),
        RefTarget::Documentation { url } => (DOCUMENTATION_UNIT_TYPE, DOCUMENTATION_UNIT.to_string(), url),
    };
    return RefOutput {
        def_unit_type,
        def_unit,
        def_path,
        unit: unit.name.clone(),
        file: reference.file,
        start,
        end,
        def: reference.definition_site,
    };
}

/// Span bounds, or [`MISSING_OFFSET`] for both on a miss.
fn offsets(span: Option<&std::ops::Range<u32>>) -> (u32, u32) {
    return span.map_or((MISSING_OFFSET, MISSING_OFFSET), |s| return (s.start, s.end));
}

/// Span bounds of a definition site. A start of 0 is written as 1, since
/// consumers treat a zero start as "no position".
fn definition_site_offsets(span: Option<&std::ops::Range<u32>>) -> (u32, u32) {
    let (start, end) = offsets(span);
    if start == 0 {
        return (1, end);
    }
    return (start, end);
}
