//! Catalog analyzer (component B): compiles a validated catalog into the per-mode
//! parallel arrays the lex loop scans. Assumes the caller already ran the validator and
//! got back zero errors - it does not re-validate.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use regex::Regex;

use crate::compiled::{CompiledMode, CompiledPattern, LexerTables};
use crate::descriptor::{Pattern, TokenDescriptor};
use crate::regex_util::{anchored, can_pattern_line_terminate};

pub(crate) fn compile_catalog<K>(
    modes: &BTreeMap<String, Vec<TokenDescriptor<K>>>,
) -> LexerTables<K>
where
    K: Clone + Eq + std::hash::Hash,
{
    let mut compiled_modes = BTreeMap::new();
    let mut group_names: BTreeSet<String> = BTreeSet::new();

    for (mode_name, descriptors) in modes {
        compiled_modes.insert(mode_name.clone(), compile_mode(descriptors, &mut group_names));
    }

    LexerTables {
        modes: compiled_modes,
        empty_groups: group_names.into_iter().collect(),
    }
}

fn compile_mode<K>(
    descriptors: &[TokenDescriptor<K>],
    group_names: &mut BTreeSet<String>,
) -> CompiledMode<K>
where
    K: Clone + Eq + std::hash::Hash,
{
    // Descriptors whose pattern is NOT_APPLICABLE are category markers: they never enter
    // the compiled pattern array, but a `longer_alt` reference to one simply fails to
    // resolve below (the map is only ever populated with matchable descriptors).
    let mut class_to_idx: HashMap<K, usize> = HashMap::new();
    let mut matchable: Vec<(&TokenDescriptor<K>, Regex)> = Vec::new();

    for descriptor in descriptors {
        if let Pattern::Regex(raw) = &descriptor.pattern {
            let regex = Regex::new(&anchored(raw))
                .expect("catalog analyzer requires a pre-validated catalog");
            class_to_idx.insert(descriptor.class.clone(), matchable.len());
            matchable.push((descriptor, regex));
        }
    }

    let mut patterns = Vec::with_capacity(matchable.len());

    for (descriptor, regex) in matchable {
        if let crate::descriptor::Group::Named(name) = &descriptor.group {
            group_names.insert(name.clone());
        }

        let can_line_terminate = descriptor.line_breaks.unwrap_or_else(|| match &descriptor.pattern {
            Pattern::Regex(raw) => can_pattern_line_terminate(raw),
            Pattern::NotApplicable => false,
        });

        let longer_alt_idx = descriptor
            .longer_alt
            .as_ref()
            .and_then(|alt_class| class_to_idx.get(alt_class).copied());

        patterns.push(CompiledPattern {
            regex,
            class: descriptor.class.clone(),
            group: descriptor.group.clone(),
            longer_alt_idx,
            can_line_terminate,
            push_mode: descriptor.push_mode.clone(),
            pop_mode: descriptor.pop_mode,
        });
    }

    CompiledMode { patterns }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::TokenDescriptor;

    #[test]
    fn resolves_longer_alt_to_an_index() {
        let descriptors = vec![
            TokenDescriptor::new("Do", "do").longer_alt("Identifier"),
            TokenDescriptor::new("Identifier", "[a-zA-Z_][a-zA-Z0-9_]*"),
        ];
        let mut groups = BTreeSet::new();
        let mode = compile_mode(&descriptors, &mut groups);
        assert_eq!(mode.patterns[0].longer_alt_idx, Some(1));
    }

    #[test]
    fn not_applicable_descriptors_are_excluded_from_the_pattern_array() {
        let descriptors = vec![
            TokenDescriptor::not_applicable("Keyword"),
            TokenDescriptor::new("Let", "let").longer_alt("Keyword"),
        ];
        let mut groups = BTreeSet::new();
        let mode = compile_mode(&descriptors, &mut groups);
        assert_eq!(mode.patterns.len(), 1);
        assert_eq!(mode.patterns[0].longer_alt_idx, None);
    }

    #[test]
    fn derives_line_termination_when_not_declared() {
        let descriptors = vec![TokenDescriptor::new("Ws", "\\s+")];
        let mut groups = BTreeSet::new();
        let mode = compile_mode(&descriptors, &mut groups);
        assert!(mode.patterns[0].can_line_terminate);
    }

    #[test]
    fn collects_named_groups_across_the_catalog() {
        let descriptors = vec![
            TokenDescriptor::new("Comment", "//[^\\n]*").group("comments"),
            TokenDescriptor::new("Ws", "\\s+").skipped(),
        ];
        let mut groups = BTreeSet::new();
        compile_mode(&descriptors, &mut groups);
        assert!(groups.contains("comments"));
    }
}
