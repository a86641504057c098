use serde::{Deserialize, Serialize};

use crate::Validatable;
use crate::text::is_blank;

/// Text submitted for translation.
///
/// `alternate` holds a pre-substituted form of `original` (for example with
/// protected spans already delimited); when present it is what gets translated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TranslationInput {
    pub original: String,
    pub alternate: Option<String>,
}

impl TranslationInput {
    pub fn new(original: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            alternate: None,
        }
    }

    pub fn with_alternate(original: impl Into<String>, alternate: Option<String>) -> Self {
        Self {
            original: original.into(),
            alternate,
        }
    }

    pub fn value(&self) -> &str {
        self.alternate.as_deref().unwrap_or(&self.original)
    }
}

impl Validatable for TranslationInput {
    fn is_well_formed(&self) -> bool {
        !is_blank(self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alternate_takes_precedence() {
        let input = TranslationInput::with_alternate("Hello", Some("Hi".into()));
        assert_eq!(input.value(), "Hi");
        assert_eq!(TranslationInput::new("Hello").value(), "Hello");
    }

    #[test]
    fn blank_alternate_is_not_well_formed() {
        let input = TranslationInput::with_alternate("Hello", Some(" \n".into()));
        assert!(!input.is_well_formed());
        assert!(!TranslationInput::new("").is_well_formed());
        assert!(TranslationInput::new("Hello").is_well_formed());
    }
}
