//! Translation store: the two embedded dictionaries and key lookup.
//!
//! Dictionaries are nested JSON objects whose leaves are strings or arrays of
//! strings. A key such as `"contact.fields.name"` is split on `.` and walked
//! segment by segment. Lookups never fail: a key that does not resolve to a
//! leaf comes back unchanged, so the page renders a visible placeholder.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::Deserialize;
use tracing::error;

use crate::error::I18nError;
use crate::i18n::Locale;

const EMBEDDED_JA: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/locales/ja.json"));
const EMBEDDED_EN: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/locales/en.json"));

/// Values substituted into `{{name}}` placeholders.
pub type Interpolations<'a> = HashMap<&'a str, String>;

/// A node in a dictionary tree.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Entry {
    Text(String),
    List(Vec<String>),
    Table(BTreeMap<String, Entry>),
}

/// One locale's dictionary.
pub type Dictionary = BTreeMap<String, Entry>;

/// Result of a lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    Text(String),
    List(Vec<String>),
}

impl Translation {
    /// The text, if this is a single string.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Translation::Text(text) => Some(text),
            Translation::List(_) => None,
        }
    }

    /// The items, if this is a list.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Translation::Text(_) => None,
            Translation::List(items) => Some(items),
        }
    }
}

impl fmt::Display for Translation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Translation::Text(text) => f.write_str(text),
            Translation::List(items) => f.write_str(&items.join("\n")),
        }
    }
}

/// Immutable dictionaries for every locale, loaded once.
#[derive(Debug, Clone, Default)]
pub struct TranslationStore {
    dictionaries: [Dictionary; 2],
}

static EMBEDDED: OnceLock<TranslationStore> = OnceLock::new();
static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

/// `{{name}}` where the name is anything but braces; surrounding spaces are
/// not part of the name.
pub(crate) fn placeholder_regex() -> &'static Regex {
    PLACEHOLDER_REGEX.get_or_init(|| {
        Regex::new(r"\{\{\s*([^{}]+?)\s*\}\}").expect("placeholder pattern is valid")
    })
}

impl TranslationStore {
    /// Parse dictionaries from JSON source text.
    pub fn from_json(ja: &str, en: &str) -> Result<Self, I18nError> {
        Ok(Self {
            dictionaries: [parse_dictionary(Locale::Ja, ja)?, parse_dictionary(Locale::En, en)?],
        })
    }

    /// Build a store from already-parsed dictionaries.
    pub fn from_dictionaries(ja: Dictionary, en: Dictionary) -> Self {
        Self {
            dictionaries: [ja, en],
        }
    }

    /// The dictionaries compiled into the binary.
    ///
    /// A malformed embedded file is logged and replaced by an empty dictionary,
    /// so every lookup degrades to returning its key.
    pub fn embedded() -> &'static TranslationStore {
        EMBEDDED.get_or_init(|| {
            let ja = parse_dictionary(Locale::Ja, EMBEDDED_JA).unwrap_or_else(|e| {
                error!("Failed to load embedded dictionary: {}", e);
                Dictionary::new()
            });
            let en = parse_dictionary(Locale::En, EMBEDDED_EN).unwrap_or_else(|e| {
                error!("Failed to load embedded dictionary: {}", e);
                Dictionary::new()
            });
            TranslationStore::from_dictionaries(ja, en)
        })
    }

    /// The raw dictionary for a locale.
    pub fn dictionary(&self, locale: Locale) -> &Dictionary {
        &self.dictionaries[locale.index()]
    }

    /// Walk `key` through the locale's dictionary.
    pub fn lookup(&self, locale: Locale, key: &str) -> Option<&Entry> {
        let mut segments = key.split('.');
        let first = segments.next()?;
        let mut node = self.dictionary(locale).get(first)?;
        for segment in segments {
            match node {
                Entry::Table(children) => node = children.get(segment)?,
                _ => return None,
            }
        }
        Some(node)
    }

    /// Translate `key` for `locale`.
    ///
    /// Placeholders are only substituted in single strings; list items are
    /// returned verbatim. Keys that are missing or point at a subtree resolve
    /// to the key itself.
    pub fn translate(
        &self,
        locale: Locale,
        key: &str,
        interpolations: Option<&Interpolations<'_>>,
    ) -> Translation {
        match self.lookup(locale, key) {
            Some(Entry::Text(text)) => match interpolations {
                Some(values) => Translation::Text(interpolate(text, values)),
                None => Translation::Text(text.clone()),
            },
            Some(Entry::List(items)) => Translation::List(items.clone()),
            Some(Entry::Table(_)) | None => Translation::Text(key.to_string()),
        }
    }

    /// Translate `key` and render the result as a single string.
    pub fn text(&self, locale: Locale, key: &str) -> String {
        self.translate(locale, key, None).to_string()
    }

    /// Every leaf key of a locale's dictionary, in sorted order.
    pub fn leaves(&self, locale: Locale) -> Vec<(String, &Entry)> {
        let mut out = Vec::new();
        collect_leaves(self.dictionary(locale), "", &mut out);
        out
    }
}

/// Replace each `{{name}}` whose name is present in `values`.
///
/// Unknown names are left in place.
pub fn interpolate(template: &str, values: &Interpolations<'_>) -> String {
    placeholder_regex()
        .replace_all(template, |caps: &Captures<'_>| match values.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

fn parse_dictionary(locale: Locale, source: &str) -> Result<Dictionary, I18nError> {
    serde_json::from_str(source).map_err(|source| I18nError::Dictionary { locale, source })
}

fn collect_leaves<'a>(table: &'a Dictionary, prefix: &str, out: &mut Vec<(String, &'a Entry)>) {
    for (name, entry) in table {
        let key = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{}.{}", prefix, name)
        };
        match entry {
            Entry::Table(children) => collect_leaves(children, &key, out),
            leaf => out.push((key, leaf)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_store() -> TranslationStore {
        TranslationStore::from_json(
            r#"{"contact": {"title": "お問い合わせ", "greeting": "{{name}}様"}, "steps": ["一", "二"]}"#,
            r#"{"contact": {"title": "Contact us", "greeting": "Hello {{name}}, {{name}}!"}, "steps": ["one", "two"]}"#,
        )
        .expect("valid dictionaries")
    }

    // ==================== Lookup Tests ====================

    #[test]
    fn test_translate_nested_key() {
        let store = sample_store();
        assert_eq!(store.text(Locale::En, "contact.title"), "Contact us");
        assert_eq!(store.text(Locale::Ja, "contact.title"), "お問い合わせ");
    }

    #[test]
    fn test_missing_key_returns_key() {
        let store = sample_store();
        assert_eq!(
            store.translate(Locale::En, "nonexistent.key.path", None),
            Translation::Text("nonexistent.key.path".to_string())
        );
    }

    #[test]
    fn test_key_through_leaf_returns_key() {
        let store = sample_store();
        assert_eq!(store.text(Locale::En, "contact.title.extra"), "contact.title.extra");
    }

    #[test]
    fn test_subtree_key_returns_key() {
        let store = sample_store();
        assert_eq!(store.text(Locale::En, "contact"), "contact");
    }

    #[test]
    fn test_empty_key_returns_empty() {
        let store = sample_store();
        assert_eq!(store.text(Locale::En, ""), "");
    }

    #[test]
    fn test_list_value() {
        let store = sample_store();
        let steps = store.translate(Locale::Ja, "steps", None);
        assert_eq!(steps.as_list(), Some(&["一".to_string(), "二".to_string()][..]));
        assert!(steps.as_text().is_none());
    }

    // ==================== Interpolation Tests ====================

    #[test]
    fn test_interpolation_replaces_every_occurrence() {
        let store = sample_store();
        let values = Interpolations::from([("name", "Aiko".to_string())]);
        let text = store.translate(Locale::En, "contact.greeting", Some(&values));
        assert_eq!(text.as_text(), Some("Hello Aiko, Aiko!"));
    }

    #[test]
    fn test_unknown_placeholder_left_untouched() {
        let values = Interpolations::from([("other", "x".to_string())]);
        assert_eq!(interpolate("Hi {{name}}", &values), "Hi {{name}}");
    }

    #[test]
    fn test_hyphenated_and_dotted_names_are_replaced() {
        let values = Interpolations::from([
            ("user-name", "Aiko".to_string()),
            ("user.email", "aiko@example.com".to_string()),
        ]);
        assert_eq!(
            interpolate("Hi {{user-name}} <{{user.email}}>", &values),
            "Hi Aiko <aiko@example.com>"
        );
    }

    #[test]
    fn test_spaces_inside_braces_are_trimmed() {
        let values = Interpolations::from([("name", "Aiko".to_string())]);
        assert_eq!(interpolate("Hi {{ name }}", &values), "Hi Aiko");
    }

    #[test]
    fn test_no_interpolations_keeps_placeholders() {
        let store = sample_store();
        assert_eq!(store.text(Locale::Ja, "contact.greeting"), "{{name}}様");
    }

    #[test]
    fn test_substituted_values_are_not_rescanned() {
        let values = Interpolations::from([
            ("a", "{{b}}".to_string()),
            ("b", "nope".to_string()),
        ]);
        assert_eq!(interpolate("{{a}}", &values), "{{b}}");
    }

    #[test]
    fn test_interpolation_ignored_for_lists() {
        let store = TranslationStore::from_json(r#"{"l": ["{{x}}"]}"#, r#"{"l": ["{{x}}"]}"#).unwrap();
        let values = Interpolations::from([("x", "1".to_string())]);
        assert_eq!(
            store.translate(Locale::En, "l", Some(&values)),
            Translation::List(vec!["{{x}}".to_string()])
        );
    }

    // ==================== Loading Tests ====================

    #[test]
    fn test_malformed_json_is_reported_with_locale() {
        let result = TranslationStore::from_json("{", "{}");
        assert!(matches!(
            result,
            Err(I18nError::Dictionary {
                locale: Locale::Ja,
                ..
            })
        ));
    }

    #[test]
    fn test_embedded_dictionaries_parse() {
        assert!(TranslationStore::from_json(EMBEDDED_JA, EMBEDDED_EN).is_ok());
    }

    #[test]
    fn test_embedded_contact_title_differs_by_locale() {
        let store = TranslationStore::embedded();
        let en = store.text(Locale::En, "contact.title");
        let ja = store.text(Locale::Ja, "contact.title");
        assert!(!en.is_empty());
        assert!(!ja.is_empty());
        assert_ne!(en, ja);
        assert_ne!(en, "contact.title");
    }

    #[test]
    fn test_leaves_are_flattened() {
        let store = sample_store();
        let keys: Vec<String> = store.leaves(Locale::En).into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["contact.greeting", "contact.title", "steps"]);
    }
}
