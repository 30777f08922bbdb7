//! A fault-tolerant, table-driven lexical analyzer engine.
//!
//! # Architecture
//!
//! The engine is organized around four cooperating components:
//!
//! - **Pattern validator** ([`validator`]): rejects a malformed catalog up front,
//!   collecting every problem instead of stopping at the first one.
//! - **Catalog analyzer** ([`analyzer`]): compiles a validated catalog into the
//!   per-mode arrays the scan loop consumes - patterns, owning class, group,
//!   longer-alternative index, line-termination capability, mode transitions.
//! - **Lex loop** ([`lexer`]): the scanner itself. Longest-match-with-override
//!   dispatch, precise line/column tracking across mixed `\r`/`\n`/`\r\n` input,
//!   mode-stack transitions, and skip-and-resync error recovery.
//! - **Position accountant** ([`position`]): pure helpers for counting line
//!   terminators and locating the last one in a matched lexeme.
//!
//! # Usage
//!
//! ```
//! use modal_lexer::{Lexer, LexerOptions, TokenDescriptor};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
//! enum Class { Do, While, Identifier, Whitespace }
//!
//! let catalog = vec![
//!     TokenDescriptor::new(Class::Do, "do").longer_alt(Class::Identifier),
//!     TokenDescriptor::new(Class::While, "while").longer_alt(Class::Identifier),
//!     TokenDescriptor::new(Class::Identifier, "[a-zA-Z_][a-zA-Z0-9_]*"),
//!     TokenDescriptor::new(Class::Whitespace, "\\s+").skipped(),
//! ];
//!
//! let lexer = Lexer::new(catalog, LexerOptions::default()).unwrap();
//! let result = lexer.tokenize("do while donald").unwrap();
//!
//! assert_eq!(result.tokens.len(), 3);
//! assert_eq!(result.tokens[2].class, Class::Identifier);
//! assert_eq!(&*result.tokens[2].image, "donald");
//! ```
//!
//! # Modes
//!
//! A catalog can instead be a mapping of mode name to descriptor list, and a
//! descriptor can declare `push_mode`/`pop_mode` to drive a mode stack for
//! context-sensitive grammars (content vs. attribute lexing in a markup language,
//! for example). See [`TokenDescriptor::push_mode`] and [`TokenDescriptor::pop_mode`].
//!
//! # Error recovery
//!
//! Lexing errors never abort a `tokenize` call: on unmatched input the engine skips
//! one character at a time, tracking position, until some pattern matches again (or
//! the input runs out), then records one [`LexError`] for the skipped span and
//! resumes. The returned [`LexResult::tokens`] is always well-formed even when
//! [`LexResult::errors`] is non-empty.

mod analyzer;
mod compiled;
mod descriptor;
mod error;
mod lexer;
mod position;
mod regex_util;
mod token;
mod validator;

pub use descriptor::{Catalog, Group, Pattern, TokenDescriptor, DEFAULT_MODE};
pub use error::{DefinitionError, DefinitionErrorKind, LexError, LexerBuildError};
pub use lexer::{Lexer, LexerOptions, TokenClass};
pub use position::{count_line_terminators, find_last_line_terminator_index};
pub use token::{LexResult, Token};
