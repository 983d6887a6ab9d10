//! Tree-sitter grammar resolution and source file classification by extension.
use std::path::Path;

use tree_sitter::{Language, Parser, Tree};

use crate::error::Error;

/// Maximum source file size (16 MiB).
const MAX_FILE_SIZE: u64 = 16 * 1024 * 1024;

/// The two kinds of source file a unit is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// A stylesheet, `.css`.
    Css,
    /// An HTML document, `.htm` or `.html`.
    Html,
}

/// Lowercased extension of a path, empty when there is none.
fn extension_of(path: &Path) -> String {
    return path
        .extension()
        .and_then(|e| return e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
}

/// Classify a path as stylesheet or HTML, or `None` for anything else.
///
/// Minified files (`*.min.css`, `*.min.htm`, `*.min.html`) are generated
/// output and classify as `None`. The `.css` check is case-sensitive, the
/// HTML checks are not.
pub fn source_kind(path: &Path) -> Option<SourceKind> {
    let name = path.file_name().and_then(|n| return n.to_str()).unwrap_or("");
    if path.extension().is_some_and(|e| return e == "css") && !name.ends_with(".min.css") {
        return Some(SourceKind::Css);
    }

    let lowered = name.to_ascii_lowercase();
    let is_html = match extension_of(path).as_str() {
        "htm" => !lowered.ends_with(".min.htm"),
        "html" => !lowered.ends_with(".min.html"),
        _ => false,
    };
    return is_html.then_some(SourceKind::Html);
}

/// Map a file extension to its tree-sitter language.
///
/// # Errors
///
/// Returns `Error::UnsupportedLanguage` for unknown extensions.
pub fn language_for_path(path: &Path) -> Result<Language, Error> {
    let ext = extension_of(path);

    return match ext.as_str() {
        "css" => Ok(tree_sitter_css::LANGUAGE.into()),
        "htm" | "html" => Ok(tree_sitter_html::LANGUAGE.into()),
        _ => Err(Error::UnsupportedLanguage { ext }),
    };
}

/// Parse source into a tree-sitter tree after checking the size limit.
///
/// # Errors
///
/// Returns `Error::FileTooLarge` if the source exceeds the size limit,
/// or `Error::ParseFailed` if the language cannot be set or parsing fails.
pub fn parse_source(file_path: &Path, source: &str, language: &Language) -> Result<Tree, Error> {
    let source_len: u64 = source.len().try_into().unwrap_or(u64::MAX);
    if source_len > MAX_FILE_SIZE {
        return Err(Error::FileTooLarge {
            file: file_path.to_path_buf(),
            size_bytes: source_len,
            max_bytes: MAX_FILE_SIZE,
        });
    }

    let mut parser = Parser::new();
    parser.set_language(language).map_err(|e| {
        return Error::ParseFailed {
            file: file_path.to_path_buf(),
            reason: e.to_string(),
        };
    })?;

    return parser.parse(source, None).ok_or_else(|| {
        return Error::ParseFailed {
            file: file_path.to_path_buf(),
            reason: "tree-sitter returned None".to_string(),
        };
    });
}
