use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Validatable;
use crate::text::{is_blank, normalized};

/// Source and target two-letter language codes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LanguagePair {
    pub from: String,
    pub to: String,
}

impl LanguagePair {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Parses `"en-fr"`. A lone code yields an idempotent pair, and anything after
    /// the first hyphen is joined into the target code.
    pub fn parse(value: &str) -> Option<Self> {
        let mut components = value.split('-');
        let from = normalized(components.next()?);
        let rest: Vec<&str> = components.collect();

        if rest.is_empty() {
            return Some(Self::new(from.clone(), from));
        }

        Some(Self::new(from, normalized(&rest.concat())))
    }

    pub fn is_idempotent(&self) -> bool {
        self.from == self.to
    }
}

impl fmt::Display for LanguagePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

impl Validatable for LanguagePair {
    fn is_well_formed(&self) -> bool {
        let is_valid = |code: &str| !is_blank(code) && code.chars().count() == 2;
        is_valid(&self.from) && is_valid(&self.to)
    }
}
