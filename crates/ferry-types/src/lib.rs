pub mod error;
pub mod input;
pub mod language_pair;
pub mod text;
pub mod translation;

pub use error::TranslationError;
pub use input::TranslationInput;
pub use language_pair::LanguagePair;
pub use translation::Translation;

/// Shape validation shared by every value object crossing the public API
pub trait Validatable {
    fn is_well_formed(&self) -> bool;
}

impl Validatable for [TranslationInput] {
    fn is_well_formed(&self) -> bool {
        !self.is_empty() && self.iter().all(Validatable::is_well_formed)
    }
}

impl Validatable for [Translation] {
    fn is_well_formed(&self) -> bool {
        !self.is_empty() && self.iter().all(Validatable::is_well_formed)
    }
}
