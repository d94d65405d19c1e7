//! Locale registry: Single source of truth for locale metadata.
//!
//! The set of locales is closed (see [`Locale`]), so the registry is a fixed
//! table indexed by locale. It is initialized once with `OnceLock` and is
//! immutable thereafter.

use std::sync::OnceLock;

use crate::i18n::Locale;

/// Metadata for a supported locale.
#[derive(Debug, Clone)]
pub struct LocaleConfig {
    /// The locale this entry describes
    pub locale: Locale,

    /// Short code used in URLs and storage (e.g., "ja", "en")
    pub code: &'static str,

    /// English name of the language (e.g., "Japanese")
    pub name: &'static str,

    /// Native name, shown on the language switcher (e.g., "日本語")
    pub native_name: &'static str,

    /// Value for `<html lang>` and `hreflang` attributes
    pub hreflang: &'static str,

    /// Value for the `og:locale` meta tag
    pub og_locale: &'static str,

    /// Whether this is the fallback locale (only one should be true)
    pub is_default: bool,
}

/// Global locale registry singleton.
pub struct LocaleRegistry {
    locales: [LocaleConfig; 2],
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<LocaleRegistry> = OnceLock::new();

impl LocaleRegistry {
    /// Get the global locale registry instance.
    pub fn get() -> &'static LocaleRegistry {
        REGISTRY.get_or_init(|| LocaleRegistry {
            locales: default_locales(),
        })
    }

    /// Get the configuration for a locale.
    pub fn config(&self, locale: Locale) -> &LocaleConfig {
        &self.locales[locale.index()]
    }

    /// Get a locale configuration by its exact code.
    ///
    /// # Returns
    /// * `Some(&LocaleConfig)` if the code is "ja" or "en"
    /// * `None` otherwise (no case folding or region stripping)
    pub fn get_by_code(&self, code: &str) -> Option<&LocaleConfig> {
        self.locales.iter().find(|config| config.code == code)
    }

    /// Get all locales in switcher order.
    pub fn list_all(&self) -> Vec<&LocaleConfig> {
        self.locales.iter().collect()
    }

    /// Get the fallback locale configuration.
    pub fn default_config(&self) -> &LocaleConfig {
        self.config(Locale::DEFAULT)
    }
}

/// Locale table, ordered by [`Locale::index`].
fn default_locales() -> [LocaleConfig; 2] {
    [
        LocaleConfig {
            locale: Locale::Ja,
            code: "ja",
            name: "Japanese",
            native_name: "日本語",
            hreflang: "ja",
            og_locale: "ja_JP",
            is_default: false,
        },
        LocaleConfig {
            locale: Locale::En,
            code: "en",
            name: "English",
            native_name: "English",
            hreflang: "en",
            og_locale: "en_US",
            is_default: true,
        },
    ]
}
