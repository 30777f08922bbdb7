//! Compiled-mode tables: the output of the catalog analyzer (component B), consumed
//! only by the lex loop (component C). Immutable once built.

use std::collections::BTreeMap;

use regex::Regex;

use crate::descriptor::Group;

pub(crate) struct CompiledPattern<K> {
    pub regex: Regex,
    pub class: K,
    pub group: Group,
    pub longer_alt_idx: Option<usize>,
    pub can_line_terminate: bool,
    pub push_mode: Option<String>,
    pub pop_mode: bool,
}

pub(crate) struct CompiledMode<K> {
    pub patterns: Vec<CompiledPattern<K>>,
}

pub(crate) struct LexerTables<K> {
    pub modes: BTreeMap<String, CompiledMode<K>>,
    /// Every distinct named group mentioned anywhere in the catalog, so that
    /// `LexResult::groups` always has a (possibly empty) bucket for it.
    pub empty_groups: Vec<String>,
}

impl<K> LexerTables<K> {
    pub(crate) fn empty() -> Self {
        Self {
            modes: BTreeMap::new(),
            empty_groups: Vec::new(),
        }
    }
}
