//! Per-backend strategy table.
//!
//! Each provider knows how to address its web front-end, which scripts pull the
//! result out of the rendered page, and how to judge and clean up what those
//! scripts return.

use std::fmt;
use std::str::FromStr;

use ferry_core::text::{is_blank, normalized, trim_bordered_newlines};
use ferry_types::{LanguagePair, TranslationError};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::browser::BrowserError;

/// Characters left as is when embedding text in a request URL (RFC 3986 unreserved)
const TEXT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

const GOOGLE_SCRIPT: &str = "document.getElementsByClassName('lRu31')[0].innerText;";
const GOOGLE_ALTERNATE_SCRIPT: &str = "document.getElementsByClassName('lRu31')[1].innerText;";

const DEEPL_SCRIPT: &str =
    "var result = document.querySelectorAll('[aria-labelledby=\"translation-results-heading\"]'); result[result.length - 1].innerText;";
const DEEPL_ALTERNATE_SCRIPT: &str =
    "var result = document.querySelectorAll('[aria-labelledby=\"translation-target-heading\"]'); result[result.length - 1].innerText";

const REVERSO_SCRIPT: &str = "document.getElementsByClassName('text__translation')[0].innerText;";
const REVERSO_ALTERNATE_SCRIPT: &str =
    "document.getElementsByClassName('translation-input__main translation-input__result')[0].innerText;";

/// Puts Reverso back on the requested language pair after it silently swapped it
pub const REVERSO_RESTORE_SCRIPT: &str =
    "document.getElementsByClassName('original-language-pair-link')[0].click();";

/// Google may interpose a cookie consent page before the translator
pub const CONSENT_URL: &str = "https://consent.google.com/";
pub const CONSENT_SCRIPT: &str = "document.getElementsByClassName('VfPpkd-RLmnJb')[3].click();";

const DEEPL_LANGUAGES: [&str; 26] = [
    "bg", "cs", "da", "de", "el", "en", "es", "et", "fi", "fr", "hu", "id", "it", "ja", "lt",
    "lv", "nl", "pl", "pt", "ro", "ru", "sk", "sl", "sv", "tr", "zh",
];

const REVERSO_LANGUAGES: [(&str, &str); 26] = [
    ("ar", "ara"),
    ("cz", "cze"),
    ("da", "dan"),
    ("de", "ger"),
    ("el", "gre"),
    ("en", "eng"),
    ("es", "spa"),
    ("fa", "per"),
    ("fr", "fra"),
    ("he", "heb"),
    ("hi", "hin"),
    ("hu", "hun"),
    ("it", "ita"),
    ("ja", "jpn"),
    ("ko", "kor"),
    ("nl", "dut"),
    ("pl", "pol"),
    ("pt", "por"),
    ("ro", "rum"),
    ("ru", "rus"),
    ("sk", "slo"),
    ("sv", "swe"),
    ("th", "tha"),
    ("tr", "tur"),
    ("uk", "ukr"),
    ("zh", "chi"),
];

const SEE_MORE: &str = "See more translations";

/// Web translation front-ends, in default fallback order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Google,
    DeepL,
    Reverso,
}

/// What one evaluation of the extraction script amounted to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Output(String),
    Retry {
        error: TranslationError,
        use_alternate: bool,
    },
}

impl Provider {
    pub const PRIORITY: [Provider; 3] = [Provider::Google, Provider::DeepL, Provider::Reverso];

    pub fn name(self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::DeepL => "deepl",
            Provider::Reverso => "reverso",
        }
    }

    /// Provider specific code for an ISO 639-1 code, `None` when unsupported
    pub fn language_identifier(self, language_code: &str) -> Option<String> {
        let code = normalized(language_code);

        match self {
            Provider::Google => Some(match code.as_str() {
                "he" => "iw".to_string(),
                "zh" => "zh-CN".to_string(),
                _ => code,
            }),
            Provider::DeepL => DEEPL_LANGUAGES.contains(&code.as_str()).then_some(code),
            Provider::Reverso => REVERSO_LANGUAGES
                .iter()
                .find(|(iso, _)| *iso == code)
                .map(|(_, identifier)| identifier.to_string()),
        }
    }

    pub fn request_url(self, text: &str, language_pair: &LanguagePair) -> Option<Url> {
        let source = self.language_identifier(&language_pair.from)?;
        let target = self.language_identifier(&language_pair.to)?;
        let text = utf8_percent_encode(text, TEXT_ENCODE_SET);

        let url = match self {
            Provider::Google => format!(
                "https://translate.google.com/?hl=en&sl={source}&tl={target}&text={text}\
                 &op=translate"
            ),
            Provider::DeepL => {
                format!("https://www.deepl.com/en/translator#{source}/{target}/{text}")
            }
            Provider::Reverso => format!(
                "https://www.reverso.net/text-translation#sl={source}&tl={target}&text={text}"
            ),
        };

        Url::parse(&url).ok()
    }

    pub fn extraction_script(self, use_alternate: bool) -> &'static str {
        match (self, use_alternate) {
            (Provider::Google, false) => GOOGLE_SCRIPT,
            (Provider::Google, true) => GOOGLE_ALTERNATE_SCRIPT,
            (Provider::DeepL, false) => DEEPL_SCRIPT,
            (Provider::DeepL, true) => DEEPL_ALTERNATE_SCRIPT,
            (Provider::Reverso, false) => REVERSO_SCRIPT,
            (Provider::Reverso, true) => REVERSO_ALTERNATE_SCRIPT,
        }
    }

    /// Script to run before each extraction that resets a swapped language pair
    pub fn restore_script(self) -> Option<&'static str> {
        match self {
            Provider::Reverso => Some(REVERSO_RESTORE_SCRIPT),
            Provider::Google | Provider::DeepL => None,
        }
    }

    /// Judges a script evaluation made with `use_alternate` for the text `input`.
    pub fn interpret(
        self,
        evaluated: Result<Option<String>, BrowserError>,
        use_alternate: bool,
        input: &str,
    ) -> Extraction {
        let output = match evaluated {
            Ok(output) => output,
            Err(e) => {
                // Google keeps the failing variant, the others alternate
                let use_alternate = match self {
                    Provider::Google => use_alternate,
                    Provider::DeepL | Provider::Reverso => !use_alternate,
                };
                return Extraction::Retry {
                    error: TranslationError::JavaScriptError(e.to_string()),
                    use_alternate,
                };
            }
        };

        let output = output.filter(|text| !is_blank(text));
        match self {
            Provider::Google => match output {
                Some(text) if !text.contains("(feminine)") => {
                    Extraction::Output(text.replace("(masculine)", ""))
                }
                _ => Extraction::Retry {
                    error: TranslationError::evaluation_failed(),
                    use_alternate: true,
                },
            },
            Provider::DeepL => match output {
                Some(text) => Extraction::Output(text),
                None => Extraction::Retry {
                    error: TranslationError::evaluation_failed(),
                    use_alternate: !use_alternate,
                },
            },
            Provider::Reverso => match output.filter(|text| normalized(text) != "!") {
                Some(text) => match align_lines(&text, input) {
                    Some(aligned) => Extraction::Output(cut_see_more(&aligned)),
                    None => Extraction::Retry {
                        error: TranslationError::EvaluateJavaScriptFailed(Some(
                            "Failed to process output string.".to_string(),
                        )),
                        use_alternate: !use_alternate,
                    },
                },
                None => Extraction::Retry {
                    error: TranslationError::evaluation_failed(),
                    use_alternate: !use_alternate,
                },
            },
        }
    }
}

/// Keeps as many output lines as the input has; `None` when the output has fewer
fn align_lines(output: &str, input: &str) -> Option<String> {
    let input_lines = input.split('\n').count();
    let output_lines: Vec<&str> = trim_bordered_newlines(output).split('\n').collect();
    if output_lines.len() < input_lines {
        return None;
    }

    Some(output_lines[..input_lines].join("\n").trim_end_matches('\n').to_string())
}

fn cut_see_more(output: &str) -> String {
    match output.split_once(SEE_MORE) {
        Some((head, _)) => trim_bordered_newlines(head).to_string(),
        None => output.to_string(),
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown translation provider: {0}")]
pub struct UnknownProvider(pub String);

impl FromStr for Provider {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "google" => Ok(Provider::Google),
            "deepl" => Ok(Provider::DeepL),
            "reverso" => Ok(Provider::Reverso),
            _ => Err(UnknownProvider(s.to_string())),
        }
    }
}
