//! The two error channels described by the engine: fatal definition errors (caught once,
//! at construction) and non-fatal lexing errors (accumulated per `tokenize` call).

use std::fmt;

/// One of the enumerated definition-error kinds the pattern validator can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionErrorKind {
    MissingPattern,
    InvalidPattern,
    EoiAnchorFound,
    UnsupportedFlagsFound,
    DuplicatePatternsFound,
    InvalidGroupTypeFound,
    PushModeDoesNotExist,
}

impl fmt::Display for DefinitionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DefinitionErrorKind::MissingPattern => "MISSING_PATTERN",
            DefinitionErrorKind::InvalidPattern => "INVALID_PATTERN",
            DefinitionErrorKind::EoiAnchorFound => "EOI_ANCHOR_FOUND",
            DefinitionErrorKind::UnsupportedFlagsFound => "UNSUPPORTED_FLAGS_FOUND",
            DefinitionErrorKind::DuplicatePatternsFound => "DUPLICATE_PATTERNS_FOUND",
            DefinitionErrorKind::InvalidGroupTypeFound => "INVALID_GROUP_TYPE_FOUND",
            DefinitionErrorKind::PushModeDoesNotExist => "PUSH_MODE_DOES_NOT_EXIST",
        };
        f.write_str(name)
    }
}

/// A single definition error, scoped to the mode it was found in.
#[derive(Debug, Clone, thiserror::Error)]
#[error("[{mode}] {kind}: {message}")]
pub struct DefinitionError {
    pub kind: DefinitionErrorKind,
    pub mode: String,
    pub message: String,
}

/// Returned by [`crate::Lexer::new`] when the catalog fails validation and deferred
/// handling was not requested; also returned by `tokenize` when it *was* requested and
/// the caller goes on to tokenize anyway.
#[derive(Debug, Clone)]
pub struct LexerBuildError {
    pub errors: Vec<DefinitionError>,
}

impl fmt::Display for LexerBuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "lexer definition is invalid ({} error(s)):", self.errors.len())?;
        for err in &self.errors {
            writeln!(f, "  - {err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for LexerBuildError {}

/// A single, non-fatal lexing error accumulated while scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub line: u32,
    pub column: u32,
    /// Number of characters skipped during resync.
    pub length: usize,
    pub message: String,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {} ({} character(s) skipped)",
            self.line, self.column, self.message, self.length
        )
    }
}
