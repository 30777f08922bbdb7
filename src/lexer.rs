//! Lex loop (component C) and the public `Lexer` entry point.

use std::collections::HashMap;
use std::sync::Arc;

use crate::analyzer::compile_catalog;
use crate::compiled::{CompiledMode, LexerTables};
use crate::descriptor::{Catalog, Group};
use crate::error::{DefinitionError, LexError, LexerBuildError};
use crate::position::{count_line_terminators, find_last_line_terminator_index};
use crate::token::{LexResult, Token};
use crate::validator::validate_catalog;

/// Bound satisfied by any type usable as a token class identity. A blanket impl over
/// every type meeting the requirements, so callers never implement it by hand.
///
/// `Send + Sync + 'static` is what lets a built `Lexer` be wrapped in an `Arc` and
/// shared across threads for concurrent, independent `tokenize` calls (see the crate's
/// concurrency notes): nothing about scanning mutates the compiled tables.
pub trait TokenClass: Clone + Eq + std::hash::Hash + std::fmt::Debug + Send + Sync + 'static {}

impl<T> TokenClass for T where T: Clone + Eq + std::hash::Hash + std::fmt::Debug + Send + Sync + 'static {}

/// Constructor-time configuration.
#[derive(Debug, Clone)]
pub struct LexerOptions {
    /// When `true`, a catalog that fails validation does not fail `Lexer::new`; instead
    /// the errors are recorded and any later `tokenize` call fails with them.
    pub defer_definition_errors_handling: bool,
    /// Overrides the mode `tokenize` starts in. Defaults to `"default_mode"` for a
    /// single-catalog definition, or to that same name (if present) / the
    /// lexicographically first mode name otherwise.
    pub initial_mode: Option<String>,
}

impl Default for LexerOptions {
    fn default() -> Self {
        Self {
            defer_definition_errors_handling: false,
            initial_mode: None,
        }
    }
}

/// A compiled, immutable lexer. Build once with [`Lexer::new`], then call
/// [`Lexer::tokenize`] as many times as needed - including concurrently from multiple
/// threads, since nothing here is mutated after construction.
pub struct Lexer<K: TokenClass> {
    tables: LexerTables<K>,
    initial_mode: String,
    /// Populated only when construction used deferred error handling and the catalog
    /// was invalid; otherwise always empty.
    pub definition_errors: Vec<DefinitionError>,
}

impl<K: TokenClass> Lexer<K> {
    /// Validates and compiles `catalog`. Fails fatally on the first call unless
    /// `options.defer_definition_errors_handling` is set, in which case the errors are
    /// stashed on [`Lexer::definition_errors`] and surfaced again by `tokenize`.
    pub fn new(catalog: impl Into<Catalog<K>>, options: LexerOptions) -> Result<Self, LexerBuildError> {
        let (modes_src, default_initial) = catalog.into().into_modes();
        let errors = validate_catalog(&modes_src);

        if !errors.is_empty() {
            if options.defer_definition_errors_handling {
                log::debug!(
                    "lexer definition has {} error(s); deferring per LexerOptions",
                    errors.len()
                );
                return Ok(Self {
                    tables: LexerTables::empty(),
                    initial_mode: options.initial_mode.unwrap_or(default_initial),
                    definition_errors: errors,
                });
            }
            return Err(LexerBuildError { errors });
        }

        let tables = compile_catalog(&modes_src);
        log::debug!(
            "compiled lexer catalog: {} mode(s), {} named group(s)",
            tables.modes.len(),
            tables.empty_groups.len()
        );

        Ok(Self {
            tables,
            initial_mode: options.initial_mode.unwrap_or(default_initial),
            definition_errors: Vec::new(),
        })
    }

    /// Tokenizes `input`, starting in this lexer's configured initial mode.
    pub fn tokenize(&self, input: &str) -> Result<LexResult<K>, LexerBuildError> {
        self.tokenize_from(input, &self.initial_mode)
    }

    /// Tokenizes `input`, starting in `initial_mode` instead of the configured default.
    pub fn tokenize_from(&self, input: &str, initial_mode: &str) -> Result<LexResult<K>, LexerBuildError> {
        if !self.definition_errors.is_empty() {
            return Err(LexerBuildError {
                errors: self.definition_errors.clone(),
            });
        }

        let result = run_lex_loop(&self.tables, input, initial_mode);
        log::debug!(
            "tokenize: {} token(s), {} error(s)",
            result.tokens.len(),
            result.errors.len()
        );
        Ok(result)
    }
}

fn run_lex_loop<K: TokenClass>(tables: &LexerTables<K>, input: &str, initial_mode: &str) -> LexResult<K> {
    run_lex_loop_traced(tables, input, initial_mode).0
}

/// Same scan as [`run_lex_loop`], but additionally returns the byte ranges consumed by
/// every step of the loop (matches of any disposition, and skipped error spans) in
/// scan order. Used by property tests to check that the scan accounts for every byte
/// of the input exactly once; production callers have no use for it.
pub(crate) fn run_lex_loop_traced<K: TokenClass>(
    tables: &LexerTables<K>,
    input: &str,
    initial_mode: &str,
) -> (LexResult<K>, Vec<(usize, usize)>) {
    let mut mode_stack: Vec<&str> = vec![initial_mode];
    let mut offset = 0usize;
    let mut line: u32 = 1;
    let mut column: u32 = 1;

    let mut tokens = Vec::new();
    let mut groups: HashMap<String, Vec<Token<K>>> = tables
        .empty_groups
        .iter()
        .map(|name| (name.clone(), Vec::new()))
        .collect();
    let mut errors = Vec::new();
    let mut coverage: Vec<(usize, usize)> = Vec::new();

    let len = input.len();

    while offset < len {
        let current_mode_name = *mode_stack.last().expect("mode stack is never empty");
        let Some(mode) = tables.modes.get(current_mode_name) else {
            log::debug!("mode '{current_mode_name}' is not defined; stopping scan");
            break;
        };

        let remaining = &input[offset..];

        match find_first_match(mode, remaining) {
            Some((idx, lexeme)) => {
                let (idx, lexeme) = apply_longer_alt(mode, idx, lexeme, remaining);
                let pat = &mode.patterns[idx];

                debug_assert!(!lexeme.is_empty(), "validator must reject patterns matching the empty string");

                let char_len = lexeme.chars().count() as u32;
                let byte_len = lexeme.len();

                let start_offset = offset;
                let start_line = line;
                let start_column = column;
                let mut end_line = Some(start_line);
                let mut end_column = Some(start_column + char_len - 1);

                if pat.can_line_terminate {
                    let lt_count = count_line_terminators(lexeme);
                    if lt_count > 0 {
                        let last_lt_idx = find_last_line_terminator_index(lexeme)
                            .expect("lt_count > 0 implies a terminator exists")
                            as u32;
                        let last_char_is_lt = last_lt_idx == char_len - 1;

                        line += lt_count as u32;
                        column = char_len - last_lt_idx;

                        if lt_count == 1 && last_char_is_lt {
                            end_line = None;
                            end_column = None;
                        } else {
                            end_line = Some(line - u32::from(last_char_is_lt));
                            end_column = Some(column - 1 + u32::from(last_char_is_lt));
                        }
                    } else {
                        column += char_len;
                    }
                } else {
                    column += char_len;
                }

                match &pat.group {
                    Group::Skipped => {}
                    Group::Default => {
                        tokens.push(Token {
                            class: pat.class.clone(),
                            image: Arc::from(lexeme),
                            start_offset,
                            start_line,
                            start_column,
                            end_line,
                            end_column,
                        });
                    }
                    Group::Named(name) => {
                        let token = Token {
                            class: pat.class.clone(),
                            image: Arc::from(lexeme),
                            start_offset,
                            start_line,
                            start_column,
                            end_line,
                            end_column,
                        };
                        groups.entry(name.clone()).or_default().push(token);
                    }
                }

                coverage.push((start_offset, start_offset + byte_len));
                offset += byte_len;

                // Pop before push: a single token can both pop and push, replacing the
                // top of the stack in one step.
                if pat.pop_mode {
                    if mode_stack.len() > 1 {
                        log::trace!("popping mode '{current_mode_name}'");
                        mode_stack.pop();
                    } else {
                        log::trace!("refusing to pop last remaining mode '{current_mode_name}'");
                        errors.push(LexError {
                            line: start_line,
                            column: start_column,
                            length: 0,
                            message: format!(
                                "cannot pop mode '{current_mode_name}': it is the only mode on the stack"
                            ),
                        });
                    }
                }
                if let Some(next_mode) = &pat.push_mode {
                    log::trace!("pushing mode '{next_mode}'");
                    mode_stack.push(next_mode.as_str());
                }
            }
            None => {
                let err_start = offset;
                let (skip_errors, new_offset, new_line, new_column) =
                    recover_from_error(input, mode, offset, line, column);
                errors.extend(skip_errors);
                coverage.push((err_start, new_offset));
                offset = new_offset;
                line = new_line;
                column = new_column;
            }
        }
    }

    (LexResult { tokens, groups, errors }, coverage)
}

/// Scans pattern indices in declaration order; the first one that matches at the start
/// of `remaining` wins. Every compiled pattern is internally anchored (see
/// `regex_util::anchored`), so a match can only ever start at offset zero.
fn find_first_match<'a, K>(mode: &CompiledMode<K>, remaining: &'a str) -> Option<(usize, &'a str)> {
    for (idx, pat) in mode.patterns.iter().enumerate() {
        if let Some(m) = pat.regex.find(remaining) {
            debug_assert_eq!(m.start(), 0, "internally anchored patterns must match at offset zero");
            return Some((idx, m.as_str()));
        }
    }
    None
}

/// If the winning pattern declares a `longer_alt`, re-tries it and swaps in the
/// alternative only when it matches a strictly longer lexeme.
fn apply_longer_alt<'a, K>(
    mode: &CompiledMode<K>,
    idx: usize,
    lexeme: &'a str,
    remaining: &'a str,
) -> (usize, &'a str) {
    let Some(alt_idx) = mode.patterns[idx].longer_alt_idx else {
        return (idx, lexeme);
    };
    match mode.patterns[alt_idx].regex.find(remaining) {
        Some(alt_match) if alt_match.len() > lexeme.len() => (alt_idx, alt_match.as_str()),
        _ => (idx, lexeme),
    }
}

/// Skips one character at a time, tracking line/column, until some pattern in `mode`
/// matches again or the input is exhausted. Returns the accumulated (zero-or-one)
/// errors plus the resulting scan position.
fn recover_from_error<K>(
    input: &str,
    mode: &CompiledMode<K>,
    mut offset: usize,
    mut line: u32,
    mut column: u32,
) -> (Vec<LexError>, usize, u32, u32) {
    let err_offset = offset;
    let err_line = line;
    let err_column = column;
    let len = input.len();

    while offset < len {
        let ch = input[offset..].chars().next().expect("offset < len implies a char");
        let ch_len = ch.len_utf8();

        let is_bare_cr = ch == '\r' && input[offset + ch_len..].chars().next() != Some('\n');
        if ch == '\n' || is_bare_cr {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
        offset += ch_len;

        if offset < len && find_first_match(mode, &input[offset..]).is_some() {
            break;
        }
    }

    let skipped = &input[err_offset..offset];
    let error = LexError {
        line: err_line,
        column: err_column,
        length: skipped.chars().count(),
        message: format!("unexpected character(s): {skipped:?}"),
    };

    (vec![error], offset, line, column)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::analyzer::compile_catalog;
    use crate::descriptor::{Catalog, TokenDescriptor, DEFAULT_MODE};

    use super::run_lex_loop_traced;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Class {
        Word,
        Number,
        Whitespace,
    }

    fn build_tables() -> crate::compiled::LexerTables<Class> {
        let catalog: Catalog<Class> = vec![
            TokenDescriptor::new(Class::Word, "[a-zA-Z]+"),
            TokenDescriptor::new(Class::Number, "[0-9]+"),
            TokenDescriptor::new(Class::Whitespace, "\\s+").skipped(),
        ]
        .into();
        let (modes, _) = catalog.into_modes();
        compile_catalog(&modes)
    }

    proptest! {
        #[test]
        fn every_byte_is_accounted_for_exactly_once(
            input in "[a-zA-Z0-9 \n\t!@#,.]{0,64}"
        ) {
            let tables = build_tables();
            let (_, coverage) = run_lex_loop_traced(&tables, &input, DEFAULT_MODE);

            let mut expected_next = 0usize;
            for (start, end) in &coverage {
                prop_assert_eq!(*start, expected_next);
                prop_assert!(end > start);
                expected_next = *end;
            }
            prop_assert_eq!(expected_next, input.len());
        }

        #[test]
        fn emitted_token_start_offsets_strictly_increase(
            input in "[a-zA-Z0-9 \n\t!@#,.]{0,64}"
        ) {
            let tables = build_tables();
            let (result, _) = run_lex_loop_traced(&tables, &input, DEFAULT_MODE);

            let mut last: Option<usize> = None;
            for token in &result.tokens {
                if let Some(prev) = last {
                    prop_assert!(token.start_offset > prev);
                }
                last = Some(token.start_offset);
            }
        }
    }
}
