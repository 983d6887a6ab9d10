//! Lexical path normalisation shared by linkage and discovery.

use std::path::{Component, Path};

/// Collapse `.` and `..` components without touching the filesystem and
/// render the result with forward slashes. Preserves leading `..` when there
/// is nothing left to pop.
pub fn normalize_slash_path(path: &Path) -> String {
    let mut components: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        push_normalized_component(&mut components, component);
    }
    return components
        .iter()
        .map(|c| return c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
}

/// Handle a single path component during normalization.
/// Pops the last component for `..` when possible, preserves it otherwise.
fn push_normalized_component<'a>(components: &mut Vec<Component<'a>>, component: Component<'a>) {
    match component {
        Component::CurDir => {},
        Component::ParentDir => {
            let can_pop = matches!(components.last(), Some(c) if !matches!(c, Component::ParentDir));
            if can_pop {
                components.pop();
            } else {
                components.push(component);
            }
        },
        other => components.push(other),
    }
}
