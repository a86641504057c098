use serde::{Deserialize, Serialize};

use crate::{LanguagePair, TranslationInput, Validatable};

/// A completed translation of `input` into `output`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    pub input: TranslationInput,
    pub output: String,
    pub language_pair: LanguagePair,
}

impl Translation {
    pub fn new(
        input: TranslationInput,
        output: impl Into<String>,
        language_pair: LanguagePair,
    ) -> Self {
        Self {
            input,
            output: output.into(),
            language_pair,
        }
    }
}

impl Validatable for Translation {
    fn is_well_formed(&self) -> bool {
        self.input.is_well_formed()
            && self.language_pair.is_well_formed()
            && TranslationInput::new(self.output.as_str()).is_well_formed()
    }
}
