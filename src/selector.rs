//! Selector chain normalization and property documentation paths.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::Selector;

/// Root of the MDN CSS reference, used unless the config overrides it.
pub const DEFAULT_DOCS_URL: &str = "https://developer.mozilla.org/en-US/docs/Web/CSS/";

/// An id/class component inside one compound selector. Stops at the next
/// sigil, pseudo-class, attribute selector, or parenthesis.
#[allow(clippy::expect_used, reason = "hardcoded pattern, compile-time invariant")]
static COMPONENT: LazyLock<Regex> =
    LazyLock::new(|| return Regex::new(r"[.#][^.#:\[\]()\s]+").expect("valid regex"));

/// Vendor prefixes folded away so prefixed and standard properties share docs.
#[allow(clippy::expect_used, reason = "hardcoded pattern, compile-time invariant")]
static VENDOR_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| return Regex::new(r"^(?:-webkit-|-moz-|-ms-|-o-)").expect("valid regex"));

/// Descendant whitespace and the `>`, `+`, `~` combinators.
fn is_combinator(ch: char) -> bool {
    return matches!(ch, '>' | '+' | '~') || ch.is_whitespace();
}

/// Reduce a selector chain to the rightmost id/class component of its last
/// compound selector, the key its definition is stored under.
///
/// `h1.title` → `.title`, `.panel > .panel-body` → `.panel-body`. Chains
/// whose last compound has no id/class component (`div`, `.panel a`) yield
/// `None`; the caller skips them rather than failing.
pub fn normalize(chain: &str) -> Option<Selector> {
    let outer = strip_groups(chain);
    let last = outer.split(is_combinator).filter(|f| return !f.is_empty()).last()?;
    let component = COMPONENT.find_iter(last).last()?;
    return Selector::parse(component.as_str());
}

/// Remove `(...)` and `[...]` groups, nested or quoted, so sigils inside
/// `:not(.b)` or `[href="#top"]` never become the key.
fn strip_groups(chain: &str) -> String {
    let mut out = String::with_capacity(chain.len());
    let mut depth = 0_u32;
    let mut quote: Option<char> = None;
    for ch in chain.chars() {
        if let Some(open) = quote {
            if ch == open {
                quote = None;
            }
            continue;
        }
        match ch {
            '(' | '[' => depth = depth.saturating_add(1),
            ')' | ']' => depth = depth.saturating_sub(1),
            '"' | '\'' if depth > 0 => quote = Some(ch),
            _ if depth == 0 => out.push(ch),
            _ => {},
        }
    }
    return out;
}

/// Documentation URL for a CSS property. Vendor-prefixed properties resolve
/// to the same page as the standard one.
pub fn documentation_url(docs_url: &str, property: &str) -> String {
    let unprefixed = VENDOR_PREFIX.replace(property, "");
    return format!("{docs_url}{unprefixed}");
}
