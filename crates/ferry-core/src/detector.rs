use std::ops::Range;

use ferry_types::TranslationInput;
use regex::Regex;

use crate::tokenizer::DELIMITER;

/// Finds substrings that must survive translation verbatim
pub trait SpanDetector: Send + Sync {
    /// Byte ranges of protected spans, sorted and non-overlapping
    fn detect(&self, text: &str) -> Vec<Range<usize>>;
}

const URL_PATTERN: &str = r#"(?i)\b(?:https?://|www\.)[^\s<>"]*[^\s<>".,;:!?)\]]"#;
const EMAIL_PATTERN: &str = r"(?i)\b[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}\b";
const PHONE_PATTERN: &str =
    r"(?:\+\d{1,3}[\s.-]?)?(?:\(\d{2,4}\)[\s.-]?|\b\d{2,4}[\s.-])\d{3,4}[\s.-]\d{3,4}\b";
const ADDRESS_PATTERN: &str = concat!(
    r"\b\d{1,5}\s+(?:[A-Z][a-z]+\s+){1,3}",
    r"(?:Street|St|Avenue|Ave|Road|Rd|Boulevard|Blvd|Lane|Ln|Drive|Dr|Court|Ct|Way|Place|Pl)\b\.?",
);

/// Links, e-mail addresses, phone numbers and street addresses
pub struct RegexDetector {
    patterns: Vec<Regex>,
}

impl RegexDetector {
    pub fn new() -> Result<Self, regex::Error> {
        let patterns = [URL_PATTERN, EMAIL_PATTERN, PHONE_PATTERN, ADDRESS_PATTERN]
            .iter()
            .map(|pattern| Regex::new(pattern))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }
}

impl SpanDetector for RegexDetector {
    fn detect(&self, text: &str) -> Vec<Range<usize>> {
        let mut matches: Vec<Range<usize>> = self
            .patterns
            .iter()
            .flat_map(|pattern| pattern.find_iter(text).map(|m| m.range()))
            .collect();

        // Earliest start wins, longer span first on ties
        matches.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

        let mut spans: Vec<Range<usize>> = Vec::with_capacity(matches.len());
        for span in matches {
            if spans.last().is_some_and(|last| span.start < last.end) {
                continue;
            }
            spans.push(span);
        }

        spans
    }
}

/// Never finds anything
pub struct NoopDetector;

impl SpanDetector for NoopDetector {
    fn detect(&self, _text: &str) -> Vec<Range<usize>> {
        Vec::new()
    }
}

/// Wraps every detected span of `text` in the delimiter character
pub fn delimit(text: &str, detector: &dyn SpanDetector) -> Option<String> {
    let spans = detector.detect(text);
    if spans.is_empty() {
        return None;
    }

    let mut result = String::with_capacity(text.len() + spans.len() * 2 * DELIMITER.len_utf8());
    let mut cursor = 0;
    for span in spans {
        result.push_str(&text[cursor..span.start]);
        result.push(DELIMITER);
        result.push_str(&text[span.clone()]);
        result.push(DELIMITER);
        cursor = span.end;
    }
    result.push_str(&text[cursor..]);

    Some(result)
}

/// Returns `input` with its value's protected spans delimited in `alternate`
pub fn with_delimited_spans(
    input: &TranslationInput,
    detector: &dyn SpanDetector,
) -> TranslationInput {
    match delimit(input.value(), detector) {
        Some(delimited) => {
            TranslationInput::with_alternate(input.original.clone(), Some(delimited))
        }
        None => input.clone(),
    }
}
