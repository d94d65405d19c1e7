//! Language state manager: the current locale and its change feed.
//!
//! There is exactly one `LanguageState` per [`LanguageService`](crate::service::LanguageService).
//! It is created once with the resolved initial locale and lives for the
//! whole session. The only mutation path is [`LanguageState::set_current_locale`].

use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::error::I18nError;
use crate::i18n::{Locale, SwitchMetrics};
use crate::observer::{Observable, Subscription};
use crate::platform::lock;
use crate::preferences::PreferenceStore;

pub struct LanguageState {
    current: Mutex<Locale>,
    preferences: PreferenceStore,
    observers: Observable<Locale>,
    metrics: Arc<SwitchMetrics>,
}

impl LanguageState {
    pub fn new(initial: Locale, preferences: PreferenceStore, metrics: Arc<SwitchMetrics>) -> Self {
        Self {
            current: Mutex::new(initial),
            preferences,
            observers: Observable::new(),
            metrics,
        }
    }

    pub fn current_locale(&self) -> Locale {
        *lock(&self.current)
    }

    /// Make `locale` current.
    ///
    /// When it differs from the current value, the in-memory state is updated,
    /// the preference is persisted (failures are logged, never returned) and
    /// every subscriber is notified before this returns. Setting the current
    /// value again is a no-op: no write, no notification.
    ///
    /// Returns whether the locale changed.
    pub fn set_current_locale(&self, locale: Locale) -> bool {
        {
            let mut current = lock(&self.current);
            if *current == locale {
                return false;
            }
            *current = locale;
        }

        if let Err(e) = self.preferences.save(locale) {
            self.metrics.record_persistence_failure();
            warn!("Failed to persist language preference '{}': {}", locale, e);
        }

        let notified = self.observers.emit(&locale);
        debug!("Language changed to '{}', notified {} subscribers", locale, notified);
        true
    }

    /// [`set_current_locale`](Self::set_current_locale) from an untrusted code.
    pub fn set_current_locale_code(&self, code: &str) -> Result<bool, I18nError> {
        let locale = Locale::from_code(code)?;
        Ok(self.set_current_locale(locale))
    }

    /// Register `callback` to run after every genuine locale change.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Locale) + Send + Sync + 'static,
    {
        self.observers.subscribe(callback)
    }

    pub fn subscriber_count(&self) -> usize {
        self.observers.len()
    }

    pub fn preferences(&self) -> &PreferenceStore {
        &self.preferences
    }
}
