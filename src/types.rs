//! Core domain types for selgraph selectors, definitions, and references.
use std::fmt;
use std::ops::Range;

/// Which HTML attribute a selector addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectorKind {
    /// Class selector, `.name`, matched against the `class` attribute.
    Class,
    /// Id selector, `#name`, matched against the `id` attribute.
    Id,
}

impl SelectorKind {
    /// Kind addressed by an HTML attribute key. Any key other than `id` and
    /// `class` addresses nothing.
    pub fn from_attribute(key: &str) -> Option<Self> {
        return match key {
            "class" => Some(Self::Class),
            "id" => Some(Self::Id),
            _ => None,
        };
    }

    /// The kind name used in the definition `data` payload.
    pub const fn as_str(self) -> &'static str {
        return match self {
            Self::Class => "class",
            Self::Id => "id",
        };
    }

    /// The sigil a selector of this kind starts with.
    pub const fn prefix(self) -> char {
        return match self {
            Self::Class => '.',
            Self::Id => '#',
        };
    }
}

/// A single addressable selector: `#` or `.` followed by a non-empty token.
/// Newtype prevents mixing canonical selectors with raw chain text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Selector(String);

impl Selector {
    /// Build the selector an attribute token addresses, e.g. `class` + `btn` → `.btn`.
    pub fn from_token(kind: SelectorKind, token: &str) -> Self {
        return Self(format!("{}{token}", kind.prefix()));
    }

    /// Accept text that already has selector shape. Returns `None` for
    /// anything without a leading sigil or without a token after it.
    pub fn parse(text: &str) -> Option<Self> {
        let mut chars = text.chars();
        let sigil = chars.next()?;
        if !matches!(sigil, '#' | '.') || chars.as_str().is_empty() {
            return None;
        }
        return Some(Self(text.to_string()));
    }

    /// The selector text, sigil included.
    pub fn as_str(&self) -> &str {
        return &self.0;
    }

    /// Id or class, read from the sigil.
    pub fn kind(&self) -> SelectorKind {
        if self.0.starts_with('#') {
            return SelectorKind::Id;
        }
        return SelectorKind::Class;
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f.write_str(&self.0);
    }
}

/// One canonical selector defined by one stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    /// Stylesheet path as listed in the unit, forward slashes.
    pub file: String,
    /// Unit-scoped definition path, `<file><selector>`.
    pub path: String,
    /// Canonical selector this definition is keyed by.
    pub selector: Selector,
    /// Byte span of the full selector chain. `None` when the parser's
    /// position could not be located in the file text.
    pub span: Option<Range<u32>>,
}

impl Definition {
    /// Create a definition and derive its unit-scoped path.
    pub fn new(file: &str, selector: Selector, span: Option<Range<u32>>) -> Self {
        return Self {
            path: format!("{file}{selector}"),
            file: file.to_string(),
            selector,
            span,
        };
    }

    /// Display name, identical to the canonical selector text.
    pub fn name(&self) -> &str {
        return self.selector.as_str();
    }
}

/// What a reference points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefTarget {
    /// A selector definition inside the unit, by definition path.
    Definition {
        /// The target definition's unit-scoped path.
        path: String,
    },
    /// External documentation for a CSS property. Never resolves to a definition.
    Documentation {
        /// Full documentation URL.
        url: String,
    },
}

/// A byte span in some file pointing at a definition or at documentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// True only for a definition's reference to itself.
    pub definition_site: bool,
    /// File containing the reference, forward slashes.
    pub file: String,
    /// Byte span of the referencing token. `None` on an offset lookup miss.
    pub span: Option<Range<u32>>,
    /// What the reference resolves to.
    pub target: RefTarget,
}
