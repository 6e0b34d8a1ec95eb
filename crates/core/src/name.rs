//! Character name validation.

use std::sync::LazyLock;

use regex::Regex;

/// Letters, at most one `-` or `_` somewhere in the middle, letters.
static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z]+[_-]?[a-zA-Z]+$").expect("name pattern is a valid regex"));

/// Returns true if `name` is an acceptable character name.
///
/// Names are one or more ASCII letters, optionally followed by a single
/// `-` or `_` separator and one or more further letters. This keeps
/// arbitrary strings out of store keys and metric labels.
pub fn is_valid(name: &str) -> bool {
    NAME_PATTERN.is_match(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_and_separated_names() {
        for name in ["Test_name", "Test-Name", "Testchar", "ab", "a_b", "Sorc-Ess"] {
            assert!(is_valid(name), "{name} should be accepted");
        }
    }

    #[test]
    fn test_rejects_malformed_names() {
        for name in ["test123", "_test", "test_", "te--st", "te_-st", "", "a", "te st", "tést", "a-b-c"] {
            assert!(!is_valid(name), "{name:?} should be rejected");
        }
    }

    #[test]
    fn test_rejects_trailing_newline() {
        assert!(!is_valid("Testchar\n"));
    }
}
