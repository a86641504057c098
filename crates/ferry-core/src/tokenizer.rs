//! Masks protected spans before text is handed to a provider and splices them
//! back into the provider's output.
//!
//! Protected spans arrive wrapped in [`DELIMITER`]. Each wrapped span is replaced
//! by a single [`MARKER`] which providers pass through untranslated. Restoration
//! is positional: the n-th marker in the output receives the n-th token.

use std::collections::HashSet;

/// Wraps protected spans in the source text
pub const DELIMITER: char = '⌘';
/// Stands in for a protected span while the text is being translated
pub const MARKER: char = '⁂';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokenized {
    /// Text with every token replaced by [`MARKER`]
    pub processed: String,
    /// Canonical (delimited) tokens, in order of occurrence
    pub tokens: Vec<String>,
}

pub fn tokenize(text: &str) -> Tokenized {
    let components: Vec<&str> = text.split(DELIMITER).collect();
    let extracted: Vec<&str> = components.iter().skip(1).step_by(2).copied().collect();
    let all_unique = extracted.iter().collect::<HashSet<_>>().len() == extracted.len();

    let mut processed = text.to_string();
    let mut tokens = Vec::new();

    for token in extracted {
        let canonical = format!("{DELIMITER}{token}{DELIMITER}");
        if all_unique && !processed.contains(&canonical) {
            continue;
        }
        if token.is_empty() {
            continue;
        }

        processed = processed.replace(&canonical, &MARKER.to_string());
        tokens.push(canonical);
    }

    Tokenized { processed, tokens }
}

/// Substitutes each marker in `output` with its token, in order.
///
/// Output whose marker count does not match the token count is returned as is.
pub fn restore(output: &str, tokens: &[String]) -> String {
    let components: Vec<&str> = output.split(MARKER).collect();
    if components.len() < 2 || tokens.len() != components.len() - 1 {
        return output.to_string();
    }

    let mut result = String::with_capacity(output.len());
    for (component, token) in components.iter().zip(tokens) {
        result.push_str(component);
        result.extend(token.chars().filter(|c| *c != MARKER));
    }
    if let Some(last) = components.last() {
        result.push_str(last);
    }

    result
}

/// Removes every delimiter and marker character
pub fn strip_processing_characters(text: &str) -> String {
    text.chars().filter(|c| *c != DELIMITER && *c != MARKER).collect()
}

pub fn strip_delimiters(text: &str) -> String {
    text.chars().filter(|c| *c != DELIMITER).collect()
}
