//! The caller-supplied token catalog: descriptors, patterns and groups.
//!
//! A [`TokenDescriptor`] bundles everything the engine needs to know about one token
//! kind - its pattern, output group, longer-alternative, and mode transitions - into
//! one record, built by the caller before constructing a [`crate::Lexer`].

use std::collections::BTreeMap;

/// A token's matcher: either a regular expression, or the `NOT_APPLICABLE` sentinel
/// marking a category-only descriptor that is never matched directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// A regular expression, in the syntax accepted by the `regex` crate.
    Regex(String),
    /// Category marker: never compiled, never matched, but still a valid `longer_alt` target
    /// reference (which always resolves to "no alternative" for such descriptors).
    NotApplicable,
}

/// A token's output channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Group {
    /// Emitted in the primary token stream.
    Default,
    /// Matched and discarded (whitespace, comments, ...).
    Skipped,
    /// Routed into a named bucket in [`crate::LexResult::groups`].
    Named(String),
}

impl Default for Group {
    fn default() -> Self {
        Group::Default
    }
}

/// One entry in the caller-supplied token catalog.
///
/// `class` is the opaque identity returned on every token of this kind; the engine never
/// inspects it beyond equality and hashing, so callers are free to use an enum, an interned
/// string, or any other `Clone + Eq + Hash + Debug` type.
#[derive(Debug, Clone)]
pub struct TokenDescriptor<K> {
    pub class: K,
    pub pattern: Pattern,
    pub group: Group,
    pub longer_alt: Option<K>,
    pub push_mode: Option<String>,
    pub pop_mode: bool,
    pub line_breaks: Option<bool>,
}

impl<K> TokenDescriptor<K> {
    /// A descriptor matched by `pattern`, in the default group, with no mode transitions.
    pub fn new(class: K, pattern: impl Into<String>) -> Self {
        Self {
            class,
            pattern: Pattern::Regex(pattern.into()),
            group: Group::Default,
            longer_alt: None,
            push_mode: None,
            pop_mode: false,
            line_breaks: None,
        }
    }

    /// A category-only descriptor: never matched, `pattern = NOT_APPLICABLE`.
    pub fn not_applicable(class: K) -> Self {
        Self {
            class,
            pattern: Pattern::NotApplicable,
            group: Group::Default,
            longer_alt: None,
            push_mode: None,
            pop_mode: false,
            line_breaks: None,
        }
    }

    /// Routes matches of this descriptor to the `SKIPPED` sentinel group.
    pub fn skipped(mut self) -> Self {
        self.group = Group::Skipped;
        self
    }

    /// Routes matches of this descriptor into a named bucket.
    pub fn group(mut self, name: impl Into<String>) -> Self {
        self.group = Group::Named(name.into());
        self
    }

    /// Declares a longer-alternative descriptor to re-try after a successful match.
    pub fn longer_alt(mut self, alt: K) -> Self {
        self.longer_alt = Some(alt);
        self
    }

    /// Declares a mode to push after this descriptor's token is consumed.
    pub fn push_mode(mut self, mode: impl Into<String>) -> Self {
        self.push_mode = Some(mode.into());
        self
    }

    /// Marks this descriptor as popping the current mode after its token is consumed.
    pub fn pop_mode(mut self) -> Self {
        self.pop_mode = true;
        self
    }

    /// Explicitly declares whether this pattern can match a line terminator, overriding
    /// the analyzer's derive-by-inspection default.
    pub fn line_breaks(mut self, can_terminate_line: bool) -> Self {
        self.line_breaks = Some(can_terminate_line);
        self
    }
}

/// The name implicitly given to a single-mode catalog.
pub const DEFAULT_MODE: &str = "default_mode";

/// Constructor input: either a single flat catalog, or a mapping of mode name to catalog.
#[derive(Debug, Clone)]
pub enum Catalog<K> {
    Single(Vec<TokenDescriptor<K>>),
    Modes(BTreeMap<String, Vec<TokenDescriptor<K>>>),
}

impl<K> From<Vec<TokenDescriptor<K>>> for Catalog<K> {
    fn from(descriptors: Vec<TokenDescriptor<K>>) -> Self {
        Catalog::Single(descriptors)
    }
}

impl<K> From<BTreeMap<String, Vec<TokenDescriptor<K>>>> for Catalog<K> {
    fn from(modes: BTreeMap<String, Vec<TokenDescriptor<K>>>) -> Self {
        Catalog::Modes(modes)
    }
}

impl<K> Catalog<K> {
    /// Normalizes into a mode map plus the mode name that should be used when the caller
    /// did not otherwise specify one. A `BTreeMap` (rather than a hash map) keeps mode
    /// iteration - and therefore validation/compilation error ordering - deterministic.
    pub(crate) fn into_modes(self) -> (BTreeMap<String, Vec<TokenDescriptor<K>>>, String) {
        match self {
            Catalog::Single(descriptors) => {
                let mut modes = BTreeMap::new();
                modes.insert(DEFAULT_MODE.to_string(), descriptors);
                (modes, DEFAULT_MODE.to_string())
            }
            Catalog::Modes(modes) => {
                let fallback_initial = modes
                    .contains_key(DEFAULT_MODE)
                    .then(|| DEFAULT_MODE.to_string())
                    .or_else(|| modes.keys().next().cloned())
                    .unwrap_or_else(|| DEFAULT_MODE.to_string());
                (modes, fallback_initial)
            }
        }
    }
}
