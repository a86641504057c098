use unicode_normalization::UnicodeNormalization;

use crate::text::normalized;

/// Scores how likely a text is already written in a given language
pub trait LanguageRecognizer: Send + Sync {
    /// Confidence in `[0, 1]` that `text` is in `language_code` (ISO 639-1)
    fn match_confidence(&self, text: &str, language_code: &str) -> f32;
}

/// Statistical detection backed by `whatlang`
#[derive(Debug, Default, Clone, Copy)]
pub struct WhatlangRecognizer;

impl LanguageRecognizer for WhatlangRecognizer {
    fn match_confidence(&self, text: &str, language_code: &str) -> f32 {
        let text: String = text.nfkc().collect();
        let Some(info) = whatlang::detect(&text) else {
            return 0.0;
        };

        let expected = normalized(language_code);
        if iso_639_1(info.lang().code()) != Some(expected.as_str()) {
            return 0.0;
        }

        let mut confidence = 0.4;
        if info.confidence() >= 0.45 {
            confidence += 0.4;
        }
        if info.is_reliable() {
            confidence += 0.2;
        }

        confidence
    }
}

/// Maps whatlang's ISO 639-3 codes onto the two-letter codes used by language pairs
fn iso_639_1(code: &str) -> Option<&'static str> {
    let code = match code {
        "afr" => "af",
        "ara" => "ar",
        "bul" => "bg",
        "cat" => "ca",
        "ces" => "cs",
        "cmn" => "zh",
        "dan" => "da",
        "deu" => "de",
        "ell" => "el",
        "eng" => "en",
        "est" => "et",
        "fin" => "fi",
        "fra" => "fr",
        "heb" => "he",
        "hin" => "hi",
        "hrv" => "hr",
        "hun" => "hu",
        "ind" => "id",
        "ita" => "it",
        "jpn" => "ja",
        "kor" => "ko",
        "lav" => "lv",
        "lit" => "lt",
        "nld" => "nl",
        "nob" => "nb",
        "pes" => "fa",
        "pol" => "pl",
        "por" => "pt",
        "ron" => "ro",
        "rus" => "ru",
        "slk" => "sk",
        "slv" => "sl",
        "spa" => "es",
        "swe" => "sv",
        "tha" => "th",
        "tur" => "tr",
        "ukr" => "uk",
        "vie" => "vi",
        _ => return None,
    };
    Some(code)
}
