pub use ferry_types::text::*;

pub fn has_letters(text: &str) -> bool {
    text.chars().any(char::is_alphabetic)
}

pub fn index_of_first_letter(text: &str) -> Option<usize> {
    text.chars().position(char::is_alphabetic)
}

/// Mirrors the case of the first letter of `reference` onto `text`.
///
/// Only applies when both strings have their first letter at the same character
/// index; otherwise `text` is returned unchanged.
pub fn capitalized_relative_to(text: &str, reference: &str) -> String {
    let Some(index) = index_of_first_letter(text) else {
        return text.to_string();
    };
    if index_of_first_letter(reference) != Some(index) {
        return text.to_string();
    }
    let Some(reference_letter) = reference.chars().nth(index) else {
        return text.to_string();
    };

    let mut result = String::with_capacity(text.len());
    for (i, c) in text.chars().enumerate() {
        if i != index {
            result.push(c);
        } else if reference_letter.is_uppercase() {
            result.extend(c.to_uppercase());
        } else if reference_letter.is_lowercase() {
            result.extend(c.to_lowercase());
        } else {
            result.push(c);
        }
    }

    result
}
