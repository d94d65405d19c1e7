//! Storage layout for the locale preference and redirect suppression markers.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::StorageError;
use crate::i18n::Locale;
use crate::platform::{Clock, KeyValueStore};
use crate::routing::RedirectSuppression;

/// Canonical durable key for the preferred locale.
pub const PREFERENCE_KEY: &str = "deephand-language";

/// Keys written by earlier site versions. Read as a fallback, removed on the
/// next explicit write.
pub const LEGACY_PREFERENCE_KEYS: [&str; 2] = ["language", "preferred-language"];

/// Session key holding the last automatic redirect time (ms since epoch).
pub const LAST_REDIRECT_KEY: &str = "deephand-last-redirect";

/// Session key set to `"true"` once the visitor switches language by hand.
pub const MANUAL_SWITCH_KEY: &str = "deephand-manual-switch";

/// The persisted locale preference.
#[derive(Clone, Default)]
pub struct PreferenceStore {
    store: Option<Arc<dyn KeyValueStore>>,
}

impl PreferenceStore {
    pub fn new(store: Option<Arc<dyn KeyValueStore>>) -> Self {
        Self { store }
    }

    /// Read the preference, canonical key first, then legacy keys.
    ///
    /// Unreadable or invalid values are skipped, so a corrupt canonical entry
    /// does not hide a valid legacy one.
    pub fn load(&self) -> Option<Locale> {
        let store = self.store.as_ref()?;
        for key in std::iter::once(PREFERENCE_KEY).chain(LEGACY_PREFERENCE_KEYS) {
            match store.get(key) {
                Ok(Some(value)) => match Locale::from_code(&value) {
                    Ok(locale) => return Some(locale),
                    Err(_) => debug!("Ignoring invalid stored locale '{}' under '{}'", value, key),
                },
                Ok(None) => {}
                Err(e) => warn!("Failed to read '{}': {}", key, e),
            }
        }
        None
    }

    /// Write the canonical key and delete every legacy key.
    ///
    /// Without a store there is nothing to persist and this succeeds. Legacy
    /// removal is attempted even if the canonical write failed; the first
    /// error is returned.
    pub fn save(&self, locale: Locale) -> Result<(), StorageError> {
        let Some(store) = self.store.as_ref() else {
            return Ok(());
        };

        let mut first_error = store.set(PREFERENCE_KEY, locale.code()).err();
        for key in LEGACY_PREFERENCE_KEYS {
            if let Err(e) = store.remove(key) {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Session markers consulted by the redirect guard.
#[derive(Clone)]
pub struct SuppressionStore {
    session: Option<Arc<dyn KeyValueStore>>,
    clock: Arc<dyn Clock>,
}

impl SuppressionStore {
    pub fn new(session: Option<Arc<dyn KeyValueStore>>, clock: Arc<dyn Clock>) -> Self {
        Self { session, clock }
    }

    pub fn now_millis(&self) -> i64 {
        self.clock.now_millis()
    }

    /// Current markers. Missing storage reads as "nothing recorded".
    pub fn read(&self) -> RedirectSuppression {
        let Some(session) = self.session.as_ref() else {
            return RedirectSuppression::default();
        };

        let last_redirect_ms = match session.get(LAST_REDIRECT_KEY) {
            Ok(value) => value.and_then(|raw| raw.parse().ok()),
            Err(e) => {
                warn!("Failed to read '{}': {}", LAST_REDIRECT_KEY, e);
                None
            }
        };
        let manual_switch = match session.get(MANUAL_SWITCH_KEY) {
            Ok(value) => value.as_deref() == Some("true"),
            Err(e) => {
                warn!("Failed to read '{}': {}", MANUAL_SWITCH_KEY, e);
                false
            }
        };

        RedirectSuppression {
            last_redirect_ms,
            manual_switch,
        }
    }

    /// Stamp the current time as the last automatic redirect.
    pub fn record_redirect(&self) {
        let now = self.now_millis().to_string();
        self.write(LAST_REDIRECT_KEY, &now);
    }

    /// Record that the visitor chose a language explicitly.
    pub fn mark_manual_switch(&self) {
        self.write(MANUAL_SWITCH_KEY, "true");
    }

    fn write(&self, key: &str, value: &str) {
        if let Some(session) = self.session.as_ref() {
            if let Err(e) = session.set(key, value) {
                warn!("Failed to write '{}': {}", key, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{FixedClock, MemoryStore};

    struct DeniedStore;

    impl KeyValueStore for DeniedStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable)
        }
        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::QuotaExceeded)
        }
        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }
    }

    // ==================== PreferenceStore Tests ====================

    #[test]
    fn test_load_canonical_key() {
        let store = Arc::new(MemoryStore::with_entries([(PREFERENCE_KEY, "ja")]));
        assert_eq!(PreferenceStore::new(Some(store)).load(), Some(Locale::Ja));
    }

    #[test]
    fn test_load_falls_back_to_legacy_keys() {
        let store = Arc::new(MemoryStore::with_entries([("preferred-language", "ja")]));
        assert_eq!(PreferenceStore::new(Some(store)).load(), Some(Locale::Ja));
    }

    #[test]
    fn test_load_skips_invalid_values() {
        let store = Arc::new(MemoryStore::with_entries([
            (PREFERENCE_KEY, "japanese"),
            ("language", "en"),
        ]));
        assert_eq!(PreferenceStore::new(Some(store)).load(), Some(Locale::En));
    }

    #[test]
    fn test_load_without_store() {
        assert_eq!(PreferenceStore::new(None).load(), None);
    }

    #[test]
    fn test_save_migrates_legacy_keys() {
        let store = Arc::new(MemoryStore::with_entries([
            ("language", "en"),
            ("preferred-language", "en"),
        ]));
        let preferences = PreferenceStore::new(Some(store.clone()));

        preferences.save(Locale::Ja).unwrap();

        let contents = store.snapshot();
        assert_eq!(contents.get(PREFERENCE_KEY).map(String::as_str), Some("ja"));
        assert!(!contents.contains_key("language"));
        assert!(!contents.contains_key("preferred-language"));
    }

    #[test]
    fn test_save_reports_first_error() {
        let preferences = PreferenceStore::new(Some(Arc::new(DeniedStore)));
        assert_eq!(preferences.save(Locale::En), Err(StorageError::QuotaExceeded));
        assert_eq!(preferences.load(), None);
    }

    #[test]
    fn test_save_without_store_succeeds() {
        assert!(PreferenceStore::new(None).save(Locale::Ja).is_ok());
    }

    // ==================== SuppressionStore Tests ====================

    #[test]
    fn test_suppression_roundtrip() {
        let session = Arc::new(MemoryStore::new());
        let clock = Arc::new(FixedClock::new(42_000));
        let suppression = SuppressionStore::new(Some(session.clone()), clock);

        assert_eq!(suppression.read(), RedirectSuppression::default());

        suppression.record_redirect();
        suppression.mark_manual_switch();

        assert_eq!(
            suppression.read(),
            RedirectSuppression {
                last_redirect_ms: Some(42_000),
                manual_switch: true,
            }
        );
        assert_eq!(
            session.snapshot().get(MANUAL_SWITCH_KEY).map(String::as_str),
            Some("true")
        );
    }

    #[test]
    fn test_suppression_ignores_garbage_timestamp() {
        let session = Arc::new(MemoryStore::with_entries([(LAST_REDIRECT_KEY, "soon")]));
        let suppression = SuppressionStore::new(Some(session), Arc::new(FixedClock::new(0)));
        assert_eq!(suppression.read().last_redirect_ms, None);
    }

    #[test]
    fn test_suppression_with_denied_storage() {
        let suppression =
            SuppressionStore::new(Some(Arc::new(DeniedStore)), Arc::new(FixedClock::new(0)));
        suppression.record_redirect();
        suppression.mark_manual_switch();
        assert_eq!(suppression.read(), RedirectSuppression::default());
    }
}
