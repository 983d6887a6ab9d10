use std::path::Path;

use walkdir::WalkDir;

use crate::config::Config;
use crate::error::Error;
use crate::grammar;
use crate::paths::normalize_slash_path;
use crate::unit::SourceUnit;

/// Walk the tree under `root` and describe it as a single unit.
///
/// The unit is named after the basename of `root` and lists every stylesheet
/// and HTML document (minified files excluded) that passes the config's
/// include/exclude filters, as forward-slash paths relative to `root`, in
/// file-name order.
///
/// # Errors
///
/// Returns `Error::Walk` if a directory cannot be traversed.
pub fn discover(root: &Path, config: &Config) -> Result<SourceUnit, Error> {
    let name = root
        .file_name()
        .map_or_else(|| return ".".to_string(), |n| return n.to_string_lossy().into_owned());
    let mut unit = SourceUnit::new(name);

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() || grammar::source_kind(entry.path()).is_none() {
            continue;
        }

        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        let relative = normalize_slash_path(relative);
        if !config.should_scan(&relative) {
            log::debug!("excluded by config: {relative}");
            continue;
        }
        unit.files.push(relative);
    }

    return Ok(unit);
}
