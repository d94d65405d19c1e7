//! Initial locale resolution.
//!
//! Precedence, first match wins:
//! 1. an explicit `/ja` or `/en` URL prefix
//! 2. the persisted preference
//! 3. the browser's first preferred language, if it is Japanese
//! 4. English

use serde::Serialize;

use crate::i18n::Locale;
use crate::routing::path::locale_from_path;

/// Which signal decided the locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LocaleSource {
    Url,
    Persisted,
    Browser,
    Default,
}

/// A resolved locale and the signal it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub locale: Locale,
    pub source: LocaleSource,
}

impl Resolution {
    /// Whether the caller should write the locale back as the preference.
    ///
    /// URL-derived locales are not persisted: visiting a shared `/ja` link
    /// must not overwrite a stored English preference.
    pub fn should_persist(&self) -> bool {
        self.source != LocaleSource::Url
    }
}

/// Resolve the locale for a fresh page load.
pub fn resolve<S: AsRef<str>>(
    url_path: &str,
    persisted: Option<Locale>,
    browser_locales: &[S],
) -> Resolution {
    if let Some(locale) = locale_from_path(url_path) {
        return Resolution {
            locale,
            source: LocaleSource::Url,
        };
    }
    if let Some(locale) = persisted {
        return Resolution {
            locale,
            source: LocaleSource::Persisted,
        };
    }
    if let Some(locale) = detect_browser_locale(browser_locales) {
        return Resolution {
            locale,
            source: LocaleSource::Browser,
        };
    }
    Resolution {
        locale: Locale::DEFAULT,
        source: LocaleSource::Default,
    }
}

/// [`resolve`] without the source.
pub fn resolve_initial_locale<S: AsRef<str>>(
    url_path: &str,
    persisted: Option<Locale>,
    browser_locales: &[S],
) -> Locale {
    resolve(url_path, persisted, browser_locales).locale
}

/// Japanese when the most preferred browser language is Japanese.
///
/// Only the first entry is consulted; English is the default anyway, so no
/// other language is detected.
pub fn detect_browser_locale<S: AsRef<str>>(browser_locales: &[S]) -> Option<Locale> {
    let first = browser_locales.first()?.as_ref().trim().to_ascii_lowercase();
    first.starts_with("ja").then_some(Locale::Ja)
}

/// Order the tags of an `Accept-Language` header by preference.
///
/// Entries with `q=0`, an unparsable weight, or the `*` wildcard are dropped.
/// Ties keep header order.
pub fn parse_accept_language(header: &str) -> Vec<String> {
    let mut weighted: Vec<(String, f32)> = header
        .split(',')
        .filter_map(|part| {
            let mut pieces = part.split(';');
            let tag = pieces.next()?.trim();
            if tag.is_empty() || tag == "*" {
                return None;
            }
            let mut quality = 1.0_f32;
            for param in pieces {
                if let Some(value) = param.trim().strip_prefix("q=") {
                    quality = value.trim().parse().ok()?;
                }
            }
            (quality > 0.0).then(|| (tag.to_string(), quality))
        })
        .collect();

    weighted.sort_by(|a, b| b.1.total_cmp(&a.1));
    weighted.into_iter().map(|(tag, _)| tag).collect()
}
