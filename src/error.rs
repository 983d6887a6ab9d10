//! Crate-level error types for selgraph diagnostics.
use std::path::PathBuf;

/// Every error names the file, unit, or reason that caused it, so a fatal
/// diagnostic is useful without a debugger. Whether a variant aborts the run
/// or is logged and skipped is decided by the caller, not here.
#[allow(clippy::error_impl_error, reason = "crate-internal error type in binary")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// `.selgraph.toml` or the request config holds a value we cannot use.
    #[error("invalid config: {reason}")]
    ConfigInvalid {
        /// Description of the rejected setting.
        reason: String,
    },

    /// Source file exceeds the size limit.
    #[error("file too large ({size_bytes} bytes, max {max_bytes}): {}", file.display())]
    FileTooLarge {
        /// File that exceeded the size limit.
        file: PathBuf,
        /// Maximum allowed file size in bytes.
        max_bytes: u64,
        /// Actual file size in bytes.
        size_bytes: u64,
    },

    /// Underlying I/O error from the filesystem or the standard streams.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// A request on stdin was not valid JSON for the expected shape.
    #[error("json: {0}")]
    Json(
        /// The wrapped JSON error.
        #[from]
        serde_json::Error,
    ),

    /// `build-graph` was handed more than one source unit.
    #[error("unexpected multiple units: got {count}, expected exactly one")]
    MultipleUnits {
        /// Number of units found in the request.
        count: usize,
    },

    /// `build-graph` was handed an empty unit list.
    #[error("input contains no source unit data")]
    NoUnits,

    /// Tree-sitter failed to parse a source file, or the tree holds errors.
    #[error("parse failed: {}: {reason}", file.display())]
    ParseFailed {
        /// File that failed to parse.
        file: PathBuf,
        /// Description of the parse failure.
        reason: String,
    },

    /// TOML deserialization of `.selgraph.toml` failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// No tree-sitter grammar registered for this file extension.
    #[error("no grammar for extension: .{ext}")]
    UnsupportedLanguage {
        /// File extension without the leading dot.
        ext: String,
    },

    /// Directory traversal failed during `discover`.
    #[error("walk: {0}")]
    Walk(
        /// The wrapped traversal error.
        #[from]
        walkdir::Error,
    ),
}
