//! Pattern validator (component A): rejects malformed catalogs before anything is
//! compiled. Runs once per mode at construction and never aborts on the first error -
//! it collects every problem so construction can fail with one complete report.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use regex::Regex;

use crate::descriptor::{Group, Pattern, TokenDescriptor};
use crate::error::{DefinitionError, DefinitionErrorKind};
use crate::regex_util::{anchored, contains_eoi_anchor, contains_unsupported_flags};

pub(crate) fn validate_catalog<K: std::fmt::Debug>(
    modes: &BTreeMap<String, Vec<TokenDescriptor<K>>>,
) -> Vec<DefinitionError> {
    let mode_names: BTreeSet<&str> = modes.keys().map(String::as_str).collect();
    let mut errors = Vec::new();

    for (mode_name, descriptors) in modes {
        // raw pattern text -> index of the first descriptor that used it, for
        // duplicate detection scoped to this mode only (the same pattern text in two
        // different modes is normal - e.g. a shared whitespace-skip rule).
        let mut seen_patterns: HashMap<&str, usize> = HashMap::new();

        for (i, descriptor) in descriptors.iter().enumerate() {
            validate_pattern(mode_name, descriptor, &mut seen_patterns, i, &mut errors);
            validate_group(mode_name, descriptor, &mut errors);
            validate_push_mode(mode_name, descriptor, &mode_names, &mut errors);
        }
    }

    errors
}

fn validate_pattern<K: std::fmt::Debug>(
    mode_name: &str,
    descriptor: &TokenDescriptor<K>,
    seen_patterns: &mut HashMap<&str, usize>,
    index: usize,
    errors: &mut Vec<DefinitionError>,
) {
    let raw = match &descriptor.pattern {
        Pattern::NotApplicable => return,
        Pattern::Regex(raw) => raw,
    };

    if raw.trim().is_empty() {
        errors.push(DefinitionError {
            kind: DefinitionErrorKind::MissingPattern,
            mode: mode_name.to_string(),
            message: format!("descriptor {:?} has no pattern", descriptor.class),
        });
        return;
    }

    if contains_eoi_anchor(raw) {
        errors.push(DefinitionError {
            kind: DefinitionErrorKind::EoiAnchorFound,
            mode: mode_name.to_string(),
            message: format!(
                "descriptor {:?} pattern `{raw}` contains a forbidden end-of-input anchor ($)",
                descriptor.class
            ),
        });
    }

    if contains_unsupported_flags(raw) {
        errors.push(DefinitionError {
            kind: DefinitionErrorKind::UnsupportedFlagsFound,
            mode: mode_name.to_string(),
            message: format!(
                "descriptor {:?} pattern `{raw}` uses the multi-line flag, which is forbidden",
                descriptor.class
            ),
        });
    }

    match Regex::new(&anchored(raw)) {
        Ok(compiled) => {
            if compiled.is_match("") {
                errors.push(DefinitionError {
                    kind: DefinitionErrorKind::InvalidPattern,
                    mode: mode_name.to_string(),
                    message: format!(
                        "descriptor {:?} pattern `{raw}` can match the empty string, \
                         which would make the scan loop never advance",
                        descriptor.class
                    ),
                });
            }
        }
        Err(source) => {
            errors.push(DefinitionError {
                kind: DefinitionErrorKind::InvalidPattern,
                mode: mode_name.to_string(),
                message: format!(
                    "descriptor {:?} pattern `{raw}` is not a valid regular expression: {source}",
                    descriptor.class
                ),
            });
        }
    }

    if let Some(&_first_index) = seen_patterns.get(raw.as_str()) {
        errors.push(DefinitionError {
            kind: DefinitionErrorKind::DuplicatePatternsFound,
            mode: mode_name.to_string(),
            message: format!(
                "pattern `{raw}` is used by more than one descriptor in mode `{mode_name}`"
            ),
        });
    } else {
        seen_patterns.insert(raw.as_str(), index);
    }
}

fn validate_group<K: std::fmt::Debug>(
    mode_name: &str,
    descriptor: &TokenDescriptor<K>,
    errors: &mut Vec<DefinitionError>,
) {
    if let Group::Named(name) = &descriptor.group {
        if name.trim().is_empty() {
            errors.push(DefinitionError {
                kind: DefinitionErrorKind::InvalidGroupTypeFound,
                mode: mode_name.to_string(),
                message: format!(
                    "descriptor {:?} has a blank named group",
                    descriptor.class
                ),
            });
        }
    }
}

fn validate_push_mode<K: std::fmt::Debug>(
    mode_name: &str,
    descriptor: &TokenDescriptor<K>,
    mode_names: &BTreeSet<&str>,
    errors: &mut Vec<DefinitionError>,
) {
    if let Some(target) = &descriptor.push_mode {
        if !mode_names.contains(target.as_str()) {
            errors.push(DefinitionError {
                kind: DefinitionErrorKind::PushModeDoesNotExist,
                mode: mode_name.to_string(),
                message: format!(
                    "descriptor {:?} pushes mode `{target}`, which is not defined in this catalog",
                    descriptor.class
                ),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::TokenDescriptor;

    fn modes_of(
        descriptors: Vec<TokenDescriptor<&'static str>>,
    ) -> BTreeMap<String, Vec<TokenDescriptor<&'static str>>> {
        let mut m = BTreeMap::new();
        m.insert("default_mode".to_string(), descriptors);
        m
    }

    #[test]
    fn clean_catalog_has_no_errors() {
        let modes = modes_of(vec![
            TokenDescriptor::new("Id", "[a-zA-Z_][a-zA-Z0-9_]*"),
            TokenDescriptor::new("Ws", "\\s+").skipped(),
        ]);
        assert!(validate_catalog(&modes).is_empty());
    }

    #[test]
    fn rejects_dollar_anchor() {
        let modes = modes_of(vec![TokenDescriptor::new("Foo", "foo$")]);
        let errors = validate_catalog(&modes);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, DefinitionErrorKind::EoiAnchorFound);
    }

    #[test]
    fn rejects_multiline_flag() {
        let modes = modes_of(vec![TokenDescriptor::new("Foo", "(?m)^foo")]);
        let errors = validate_catalog(&modes);
        assert!(errors.iter().any(|e| e.kind == DefinitionErrorKind::UnsupportedFlagsFound));
    }

    #[test]
    fn rejects_duplicate_patterns() {
        let modes = modes_of(vec![
            TokenDescriptor::new("Foo", "foo"),
            TokenDescriptor::new("Bar", "foo"),
        ]);
        let errors = validate_catalog(&modes);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, DefinitionErrorKind::DuplicatePatternsFound);
    }

    #[test]
    fn rejects_unknown_push_mode() {
        let modes = modes_of(vec![TokenDescriptor::new("Foo", "foo").push_mode("Missing")]);
        let errors = validate_catalog(&modes);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, DefinitionErrorKind::PushModeDoesNotExist);
    }

    #[test]
    fn rejects_pattern_matching_empty_string() {
        let modes = modes_of(vec![TokenDescriptor::new("Foo", "a*")]);
        let errors = validate_catalog(&modes);
        assert!(errors.iter().any(|e| e.kind == DefinitionErrorKind::InvalidPattern));
    }

    #[test]
    fn rejects_invalid_regex_syntax() {
        let modes = modes_of(vec![TokenDescriptor::new("Foo", "(unclosed")]);
        let errors = validate_catalog(&modes);
        assert!(errors.iter().any(|e| e.kind == DefinitionErrorKind::InvalidPattern));
    }

    #[test]
    fn rejects_blank_named_group() {
        let modes = modes_of(vec![TokenDescriptor::new("Foo", "foo").group("  ")]);
        let errors = validate_catalog(&modes);
        assert!(errors.iter().any(|e| e.kind == DefinitionErrorKind::InvalidGroupTypeFound));
    }
}
