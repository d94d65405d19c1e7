//! Dictionary parity validation.
//!
//! Both locales must expose the same keys with the same shape, and every
//! string must carry the same `{{placeholder}}` names as its counterpart.
//! Findings are meant for development-time warnings; the site still renders
//! with an inconsistent dictionary because lookups fall back to the key.

use std::collections::{BTreeMap, BTreeSet};

use crate::i18n::dictionary::{placeholder_regex, Entry, TranslationStore};
use crate::i18n::Locale;

/// Validation report containing errors and warnings about the dictionaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Keys missing from one locale
    pub errors: Vec<String>,

    /// Shape, placeholder and empty-string findings
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Create a new empty validation report
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Check if the report has any errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check if the report has any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if the report is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator for dictionary consistency across locales.
pub struct DictionaryValidator;

impl DictionaryValidator {
    /// Compare the Japanese and English dictionaries leaf by leaf.
    pub fn validate(store: &TranslationStore) -> ValidationReport {
        let mut report = ValidationReport::new();

        let ja: BTreeMap<String, &Entry> = store.leaves(Locale::Ja).into_iter().collect();
        let en: BTreeMap<String, &Entry> = store.leaves(Locale::En).into_iter().collect();

        for key in en.keys().filter(|key| !ja.contains_key(*key)) {
            report.errors.push(format!("Key '{}' is missing from 'ja'", key));
        }
        for key in ja.keys().filter(|key| !en.contains_key(*key)) {
            report.errors.push(format!("Key '{}' is missing from 'en'", key));
        }

        for (key, en_entry) in &en {
            if let Some(ja_entry) = ja.get(key) {
                Self::compare(key, ja_entry, en_entry, &mut report);
            }
        }

        for (locale, leaves) in [(Locale::Ja, &ja), (Locale::En, &en)] {
            for (key, entry) in leaves {
                if is_blank(entry) {
                    report
                        .warnings
                        .push(format!("Key '{}' is empty in '{}'", key, locale));
                }
            }
        }

        report
    }

    fn compare(key: &str, ja: &Entry, en: &Entry, report: &mut ValidationReport) {
        match (ja, en) {
            (Entry::Text(ja_text), Entry::Text(en_text)) => {
                let ja_names = placeholders(ja_text);
                let en_names = placeholders(en_text);
                if ja_names != en_names {
                    report.warnings.push(format!(
                        "Placeholder mismatch for '{}': ja has {:?}, en has {:?}",
                        key, ja_names, en_names
                    ));
                }
            }
            (Entry::List(_), Entry::List(_)) => {}
            _ => report.warnings.push(format!(
                "Shape mismatch for '{}': ja is {}, en is {}",
                key,
                shape(ja),
                shape(en)
            )),
        }
    }
}

/// Placeholder names used in a template.
pub fn placeholders(text: &str) -> BTreeSet<String> {
    placeholder_regex()
        .captures_iter(text)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

fn shape(entry: &Entry) -> &'static str {
    match entry {
        Entry::Text(_) => "text",
        Entry::List(_) => "list",
        Entry::Table(_) => "table",
    }
}

fn is_blank(entry: &Entry) -> bool {
    match entry {
        Entry::Text(text) => text.trim().is_empty(),
        Entry::List(items) => items.is_empty() || items.iter().any(|item| item.trim().is_empty()),
        Entry::Table(children) => children.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(ja: &str, en: &str) -> TranslationStore {
        TranslationStore::from_json(ja, en).expect("valid json")
    }

    // ==================== Parity Tests ====================

    #[test]
    fn test_embedded_dictionaries_are_clean() {
        let report = DictionaryValidator::validate(TranslationStore::embedded());
        assert!(report.is_clean(), "{:?}", report);
    }

    #[test]
    fn test_missing_key_is_error() {
        let report = DictionaryValidator::validate(&store(
            r#"{"nav": {"home": "ホーム"}}"#,
            r#"{"nav": {"home": "Home", "about": "About"}}"#,
        ));
        assert_eq!(report.errors, vec!["Key 'nav.about' is missing from 'ja'"]);
        assert!(!report.has_warnings());
    }

    #[test]
    fn test_placeholder_mismatch_is_warning() {
        let report = DictionaryValidator::validate(&store(
            r#"{"greeting": "{{name}}様"}"#,
            r#"{"greeting": "Hello {{first}}"}"#,
        ));
        assert!(!report.has_errors());
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("Placeholder mismatch for 'greeting'"));
    }

    #[test]
    fn test_shape_mismatch_is_warning() {
        let report = DictionaryValidator::validate(&store(
            r#"{"steps": "一"}"#,
            r#"{"steps": ["one"]}"#,
        ));
        assert_eq!(
            report.warnings,
            vec!["Shape mismatch for 'steps': ja is text, en is list"]
        );
    }

    #[test]
    fn test_empty_string_is_warning() {
        let report = DictionaryValidator::validate(&store(r#"{"a": " "}"#, r#"{"a": "A"}"#));
        assert_eq!(report.warnings, vec!["Key 'a' is empty in 'ja'"]);
    }

    // ==================== Placeholder Tests ====================

    #[test]
    fn test_placeholders_deduplicates() {
        let names = placeholders("{{a}} and {{b}} and {{a}}");
        assert_eq!(names.into_iter().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_placeholders_with_punctuated_names() {
        let names = placeholders("{{user-name}} <{{user.email}}> {{ plan }}");
        assert_eq!(
            names.into_iter().collect::<Vec<_>>(),
            vec!["plan", "user-name", "user.email"]
        );
    }

    #[test]
    fn test_dotted_placeholder_mismatch_is_warning() {
        let report = DictionaryValidator::validate(&store(
            r#"{"a": "{{user.name}}"}"#,
            r#"{"a": "{{user.email}}"}"#,
        ));
        assert!(report.errors.is_empty());
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].starts_with("Placeholder mismatch for 'a'"));
    }

    // ==================== Report Tests ====================

    #[test]
    fn test_report_default_is_clean() {
        assert!(ValidationReport::default().is_clean());
    }
}
