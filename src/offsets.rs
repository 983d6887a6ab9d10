//! Byte offsets from parser-reported (line, column) positions.

use std::ops::Range;

/// A 1-based position as reported by a text parser. `column` counts
/// characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// One-based column, in characters from the start of the line.
    pub column: u32,
    /// One-based line number.
    pub line: u32,
}

/// Locate `token` in `text` given the position the parser reported for it.
///
/// Scans the text once, counting `\n` to track line and column. Returns the
/// span `[start, start + token.len())`, or `None` if the position is never
/// reached (e.g. the parser reported a position past EOF).
pub fn find_offsets(text: &str, position: Position, token: &str) -> Option<Range<u32>> {
    let mut line = 1_u32;
    let mut column = 1_u32;

    for (offset, ch) in text.char_indices() {
        if line == position.line && column == position.column {
            let start = u32::try_from(offset).ok()?;
            let len = u32::try_from(token.len()).ok()?;
            return Some(start..start.checked_add(len)?);
        }
        if ch == '\n' {
            line = line.saturating_add(1);
            column = 1;
        } else {
            column = column.saturating_add(1);
        }
    }

    return None;
}
