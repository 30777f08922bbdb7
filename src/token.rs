//! Output types of a `tokenize` call.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::LexError;

/// One emitted (or grouped) token.
///
/// `end_line`/`end_column` are `None` exactly in the trailing-line-terminator special
/// case described in the main scan loop: a token whose only line terminator is its final
/// character reports no end position of its own, since that position is meaningful only
/// as the *start* of whatever follows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<K> {
    pub class: K,
    pub image: Arc<str>,
    pub start_offset: usize,
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: Option<u32>,
    pub end_column: Option<u32>,
}

/// The full output of one `tokenize` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexResult<K> {
    pub tokens: Vec<Token<K>>,
    pub groups: HashMap<String, Vec<Token<K>>>,
    pub errors: Vec<LexError>,
}
