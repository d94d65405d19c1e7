//! Locale type: the closed set of site languages.
//!
//! Parsing is strict. Anything other than the exact codes "ja" and "en" is
//! rejected with [`I18nError::InvalidLocale`], never coerced to a default.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::I18nError;
use crate::i18n::{LocaleConfig, LocaleRegistry};

/// A supported site locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Japanese, served under the `/ja` prefix
    Ja,
    /// English, served unprefixed
    En,
}

impl Locale {
    /// Every locale, in switcher order.
    pub const ALL: [Locale; 2] = [Locale::Ja, Locale::En];

    /// Fallback when no signal identifies a locale. The site is English-first.
    pub const DEFAULT: Locale = Locale::En;

    /// Create a Locale from a code string.
    ///
    /// # Returns
    /// * `Ok(Locale)` for exactly "ja" or "en"
    /// * `Err(I18nError::InvalidLocale)` for anything else
    pub fn from_code(code: &str) -> Result<Locale, I18nError> {
        LocaleRegistry::get()
            .get_by_code(code)
            .map(|config| config.locale)
            .ok_or_else(|| I18nError::InvalidLocale(code.to_string()))
    }

    /// The short code used in URLs and storage.
    pub const fn code(self) -> &'static str {
        match self {
            Locale::Ja => "ja",
            Locale::En => "en",
        }
    }

    /// The opposite locale, for a two-way toggle.
    pub const fn other(self) -> Locale {
        match self {
            Locale::Ja => Locale::En,
            Locale::En => Locale::Ja,
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Locale::Ja => 0,
            Locale::En => 1,
        }
    }

    /// Full metadata from the registry.
    pub fn config(self) -> &'static LocaleConfig {
        LocaleRegistry::get().config(self)
    }

    /// English name of the language.
    pub fn name(self) -> &'static str {
        self.config().name
    }

    /// Native name of the language, as shown on the switcher.
    pub fn native_name(self) -> &'static str {
        self.config().native_name
    }

    /// Whether this is the fallback locale.
    pub fn is_default(self) -> bool {
        self.config().is_default
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale::DEFAULT
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = I18nError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Locale::from_code(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== from_code Tests ====================

    #[test]
    fn test_from_code_japanese() {
        let locale = Locale::from_code("ja").expect("Should succeed");
        assert_eq!(locale, Locale::Ja);
        assert_eq!(locale.name(), "Japanese");
    }

    #[test]
    fn test_from_code_english() {
        let locale = Locale::from_code("en").expect("Should succeed");
        assert_eq!(locale, Locale::En);
        assert!(locale.is_default());
    }

    #[test]
    fn test_from_code_rejects_unknown() {
        let result = Locale::from_code("fr");
        assert!(matches!(result, Err(I18nError::InvalidLocale(code)) if code == "fr"));
    }

    #[test]
    fn test_from_code_does_not_coerce() {
        assert!(Locale::from_code("").is_err());
        assert!(Locale::from_code("JA").is_err());
        assert!(Locale::from_code(" ja").is_err());
        assert!(Locale::from_code("ja-JP").is_err());
    }

    #[test]
    fn test_parse_via_from_str() {
        let locale: Locale = "ja".parse().unwrap();
        assert_eq!(locale, Locale::Ja);
        assert!("de".parse::<Locale>().is_err());
    }

    // ==================== Trait Tests ====================

    #[test]
    fn test_display_is_code() {
        assert_eq!(Locale::Ja.to_string(), "ja");
        assert_eq!(format!("{}", Locale::En), "en");
    }

    #[test]
    fn test_other_toggles() {
        assert_eq!(Locale::Ja.other(), Locale::En);
        assert_eq!(Locale::En.other(), Locale::Ja);
        for locale in Locale::ALL {
            assert_eq!(locale.other().other(), locale);
        }
    }

    #[test]
    fn test_default_is_english() {
        assert_eq!(Locale::default(), Locale::En);
    }

    #[test]
    fn test_serde_uses_codes() {
        assert_eq!(serde_json::to_string(&Locale::Ja).unwrap(), "\"ja\"");
        let parsed: Locale = serde_json::from_str("\"en\"").unwrap();
        assert_eq!(parsed, Locale::En);
        assert!(serde_json::from_str::<Locale>("\"fr\"").is_err());
    }

    #[test]
    fn test_native_names() {
        assert_eq!(Locale::Ja.native_name(), "日本語");
        assert_eq!(Locale::En.native_name(), "English");
    }
}
