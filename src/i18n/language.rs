// SPDX-License-Identifier: MPL-2.0
//! Supported languages and the text direction they imply.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use unic_langid::LanguageIdentifier;

/// A language the site ships a translation bundle for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ar,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Ar];

    /// Two-letter code used for persistence and bundle file names.
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ar => "ar",
        }
    }

    /// Name of the language in its own script, for the language switcher.
    pub fn native_name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Ar => "العربية",
        }
    }

    pub fn direction(self) -> Direction {
        match self {
            Language::Ar => Direction::Rtl,
            Language::En => Direction::Ltr,
        }
    }

    /// Parses a language tag, keeping only its primary language subtag.
    ///
    /// `"ar-EG"` and `"AR"` both give [`Language::Ar`]. Returns `None` for tags
    /// that do not parse or name an unsupported language.
    pub fn parse(code: &str) -> Option<Self> {
        let id: LanguageIdentifier = code.trim().parse().ok()?;
        match id.language.as_str() {
            "en" => Some(Language::En),
            "ar" => Some(Language::Ar),
            _ => None,
        }
    }

    /// Like [`Language::parse`], falling back to English.
    pub fn from_code(code: &str) -> Self {
        Self::parse(code).unwrap_or_default()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when a string names no supported language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedLanguage(pub String);

impl fmt::Display for UnsupportedLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported language: {:?}", self.0)
    }
}

impl std::error::Error for UnsupportedLanguage {}

impl FromStr for Language {
    type Err = UnsupportedLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnsupportedLanguage(s.to_string()))
    }
}

/// Text direction of the document root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Ltr,
    Rtl,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `lang` and `dir` attributes a page shell applies to its root element.
///
/// Only constructible from a [`Language`], so the direction always matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentAttributes {
    lang: Language,
    dir: Direction,
}

impl DocumentAttributes {
    pub fn for_language(lang: Language) -> Self {
        Self {
            lang,
            dir: lang.direction(),
        }
    }

    pub fn lang(&self) -> Language {
        self.lang
    }

    pub fn dir(&self) -> Direction {
        self.dir
    }
}

impl Default for DocumentAttributes {
    fn default() -> Self {
        Self::for_language(Language::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_codes_parse() {
        assert_eq!(Language::parse("en"), Some(Language::En));
        assert_eq!(Language::parse("ar"), Some(Language::Ar));
    }

    #[test]
    fn region_and_case_variants_map_to_primary_language() {
        assert_eq!(Language::parse("ar-EG"), Some(Language::Ar));
        assert_eq!(Language::parse("en-US"), Some(Language::En));
        assert_eq!(Language::parse("AR"), Some(Language::Ar));
        assert_eq!(Language::parse(" en "), Some(Language::En));
    }

    #[test]
    fn unsupported_or_malformed_codes_fall_back_to_english() {
        for code in ["fr", "de-DE", "", "not a language!", "a", "12345", "zz-ZZ-@@"] {
            assert_eq!(Language::from_code(code), Language::En, "code {code:?}");
        }
    }

    #[test]
    fn from_str_rejects_unsupported() {
        assert_eq!("ar".parse::<Language>(), Ok(Language::Ar));
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn arabic_is_right_to_left() {
        assert_eq!(Language::Ar.direction(), Direction::Rtl);
        assert_eq!(Language::En.direction(), Direction::Ltr);
        assert_eq!(Direction::Rtl.as_str(), "rtl");
    }

    #[test]
    fn document_attributes_follow_language() {
        for lang in Language::ALL {
            let attrs = DocumentAttributes::for_language(lang);
            assert_eq!(attrs.lang(), lang);
            assert_eq!(attrs.dir(), lang.direction());
        }
    }

    #[test]
    fn serializes_as_lowercase_code() {
        let json = serde_json::to_string(&Language::Ar).unwrap();
        assert_eq!(json, "\"ar\"");
    }
}
