//! Normalization helpers used by validation and comparison.

const NO_BREAK_SPACE: char = '\u{00A0}';

/// Lowercased with every space, no-break space and newline removed.
///
/// Used for blank checks and for comparing provider output against its source.
pub fn normalized(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| !matches!(*c, ' ' | NO_BREAK_SPACE | '\n'))
        .collect()
}

pub fn is_blank(text: &str) -> bool {
    normalized(text).is_empty()
}

/// Strips trailing spaces and no-break spaces, then trailing newlines.
pub fn trim_trailing_whitespace_and_newlines(text: &str) -> &str {
    text.trim_end_matches([' ', NO_BREAK_SPACE]).trim_end_matches('\n')
}

pub fn trim_bordered_newlines(text: &str) -> &str {
    text.trim_matches('\n')
}
