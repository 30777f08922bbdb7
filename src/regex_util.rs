//! Shared helpers for binding the required regex contract (anchored-at-offset-zero,
//! no end-of-input anchor, no multi-line flag) onto the `regex` crate, which has no
//! native "match only at this exact position" mode.

/// Wraps a caller pattern so that matching it against a text slice can only ever
/// succeed at offset zero of that slice. `regex::Regex::find` searches forward for
/// the first match, but `^` without the multi-line flag binds to the absolute start
/// of the haystack, so prefixing it turns "first match anywhere" into "match here or
/// nowhere".
pub(crate) fn anchored(pattern: &str) -> String {
    format!("^(?:{pattern})")
}

/// Heuristic check for a `$` end-of-input anchor in the raw pattern text, ignoring
/// escaped `\$` and `$` written literally inside a character class.
pub(crate) fn contains_eoi_anchor(pattern: &str) -> bool {
    let mut chars = pattern.chars();
    let mut in_class = false;

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '[' if !in_class => in_class = true,
            ']' if in_class => in_class = false,
            '$' if !in_class => return true,
            _ => {}
        }
    }

    false
}

/// Heuristic check for an inline multi-line flag group, e.g. `(?m)` or `(?ms:...)`.
/// The `regex` crate has no separate "global" execution flag to forbid (unlike the
/// JS-style engines this design was written against): `Regex::find` is inherently a
/// single, non-global match, so only the multi-line flag needs policing here.
pub(crate) fn contains_unsupported_flags(pattern: &str) -> bool {
    let bytes = pattern.as_bytes();
    let mut i = 0;

    while i + 1 < bytes.len() {
        if bytes[i] == b'(' && bytes[i + 1] == b'?' {
            let mut j = i + 2;
            while j < bytes.len() && bytes[j] != b':' && bytes[j] != b')' && bytes[j] != b'-' {
                if bytes[j] == b'm' {
                    return true;
                }
                j += 1;
            }
        }
        i += 1;
    }

    false
}

/// Derive-by-inspection fallback for a descriptor that didn't declare `line_breaks`
/// explicitly: a conservative scan for constructs that can match `\n` or `\r`.
pub(crate) fn can_pattern_line_terminate(pattern: &str) -> bool {
    pattern.contains("\\n")
        || pattern.contains("\\r")
        || pattern.contains("\\s")
        || pattern.contains('\n')
        || pattern.contains('\r')
        || (pattern.contains('.') && pattern.contains("(?s"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_unescaped_dollar_outside_class() {
        assert!(contains_eoi_anchor("abc$"));
        assert!(!contains_eoi_anchor("abc\\$"));
        assert!(!contains_eoi_anchor("[a$]"));
    }

    #[test]
    fn detects_inline_multiline_flag() {
        assert!(contains_unsupported_flags("(?m)^foo"));
        assert!(contains_unsupported_flags("(?ms:foo)"));
        assert!(!contains_unsupported_flags("(?i)foo"));
        assert!(!contains_unsupported_flags("foo"));
    }

    #[test]
    fn derives_line_terminating_patterns() {
        assert!(can_pattern_line_terminate(r"\s+"));
        assert!(can_pattern_line_terminate(r"(\r\n|\r|\n)"));
        assert!(!can_pattern_line_terminate(r"[a-z]+"));
    }
}
