//! Property-based tests for the universal invariants that must hold for any valid
//! catalog and any input, not just the concrete scenarios in `lexer_contract_tests.rs`.

use modal_lexer::{Lexer, LexerOptions, TokenDescriptor};
use proptest::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Class {
    Word,
    Number,
    Whitespace,
}

fn build_lexer() -> Lexer<Class> {
    let catalog = vec![
        TokenDescriptor::new(Class::Word, "[a-zA-Z]+"),
        TokenDescriptor::new(Class::Number, "[0-9]+"),
        TokenDescriptor::new(Class::Whitespace, "\\s+").skipped(),
    ];
    Lexer::new(catalog, LexerOptions::default()).expect("catalog is valid")
}

proptest! {
    #[test]
    fn same_catalog_and_input_always_produce_the_same_result(
        input in "[a-zA-Z0-9 \n\t!@#,.]{0,64}"
    ) {
        let first = build_lexer().tokenize(&input).unwrap();
        let second = build_lexer().tokenize(&input).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn token_start_offsets_never_exceed_the_input_length(
        input in "[a-zA-Z0-9 \n\t!@#,.]{0,64}"
    ) {
        let result = build_lexer().tokenize(&input).unwrap();
        for token in &result.tokens {
            prop_assert!(token.start_offset <= input.len());
            prop_assert!(token.start_offset + token.image.len() <= input.len());
        }
    }
}

#[test]
fn empty_input_is_a_no_op_for_any_valid_catalog() {
    let lexer = build_lexer();
    let result = lexer.tokenize("").unwrap();
    assert!(result.tokens.is_empty());
    assert!(result.errors.is_empty());
    assert!(result.groups.is_empty());
}
