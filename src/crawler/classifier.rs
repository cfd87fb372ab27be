//! Language classification of article slugs
//!
//! Only English fact-checks are kept. The classifier is a plain
//! `text -> language code` capability, built once and shared by reference
//! with every extraction.

use thiserror::Error;
use whatlang::Lang;

/// Code returned when no language could be determined
pub const UNDETERMINED: &str = "und";

/// Errors raised by a classifier backend
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("classifier backend failed: {0}")]
    Backend(String),
}

/// Maps short text to a language code (ISO 639-1 where one exists)
pub trait LanguageClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Result<String, ClassifierError>;
}

impl<T: LanguageClassifier + ?Sized> LanguageClassifier for &T {
    fn classify(&self, text: &str) -> Result<String, ClassifierError> {
        (**self).classify(text)
    }
}

/// Trigram-based classifier backed by `whatlang`
#[derive(Debug, Clone, Copy, Default)]
pub struct WhatlangClassifier;

impl WhatlangClassifier {
    pub fn new() -> Self {
        Self
    }
}

impl LanguageClassifier for WhatlangClassifier {
    fn classify(&self, text: &str) -> Result<String, ClassifierError> {
        let code = match whatlang::detect_lang(text) {
            Some(lang) => language_code(lang).to_string(),
            None => UNDETERMINED.to_string(),
        };
        Ok(code)
    }
}

/// Two-letter code for common languages, whatlang's three-letter code otherwise
fn language_code(lang: Lang) -> &'static str {
    match lang {
        Lang::Eng => "en",
        Lang::Spa => "es",
        Lang::Fra => "fr",
        Lang::Deu => "de",
        Lang::Ita => "it",
        Lang::Por => "pt",
        Lang::Nld => "nl",
        Lang::Rus => "ru",
        Lang::Pol => "pl",
        Lang::Tur => "tr",
        Lang::Cmn => "zh",
        Lang::Jpn => "ja",
        Lang::Kor => "ko",
        Lang::Ara => "ar",
        Lang::Hin => "hi",
        Lang::Vie => "vi",
        Lang::Tgl => "tl",
        other => other.code(),
    }
}
