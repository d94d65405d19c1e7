//! No-reload language switching.
//!
//! A switch updates the address bar through the History API and then the
//! in-memory state, so the page re-renders in place. When the History API is
//! missing or refuses the update, the page falls back to a full navigation to
//! the localized URL and the original error is returned to the caller.

use std::sync::atomic::Ordering;
use std::time::Instant;

use tracing::{debug, warn};

use crate::error::I18nError;
use crate::i18n::Locale;
use crate::routing::localize_path;
use crate::service::LanguageService;

impl LanguageService {
    /// Switch to `target` without reloading the page.
    ///
    /// Steps: no-op if `target` is already current; mark the session as
    /// manually switched so the redirect guard stands down; push the localized
    /// path; update state (which persists and notifies). Exceeding the switch
    /// budget is logged, not an error.
    ///
    /// Without an address bar (server or CLI context) only the state changes.
    pub fn switch_language(&self, target: Locale) -> Result<(), I18nError> {
        if target == self.current_locale() {
            self.metrics.record_no_op();
            debug!("Language already '{}', nothing to switch", target);
            return Ok(());
        }

        let started = Instant::now();
        self.loading.store(true, Ordering::SeqCst);
        self.suppression.mark_manual_switch();

        let result = match self.platform.location.as_ref() {
            Some(location) => {
                let target_path = localize_path(target, &location.path());
                match location.push_state(&target_path) {
                    Ok(()) => {
                        self.state.set_current_locale(target);
                        Ok(())
                    }
                    Err(e) => {
                        warn!(
                            "In-place switch to '{}' failed ({}), navigating to '{}'",
                            target, e, target_path
                        );
                        self.metrics.record_fallback();
                        if let Err(store_err) = self.state.preferences().save(target) {
                            self.metrics.record_persistence_failure();
                            warn!("Failed to persist language preference '{}': {}", target, store_err);
                        }
                        location.assign(&target_path);
                        Err(I18nError::from(e))
                    }
                }
            }
            None => {
                self.state.set_current_locale(target);
                Ok(())
            }
        };

        self.loading.store(false, Ordering::SeqCst);

        if result.is_ok() {
            self.metrics.record_switch();
            let elapsed = started.elapsed();
            if elapsed > self.config.switch_budget {
                self.metrics.record_slow_switch();
                warn!(
                    "Language switch to '{}' took {:?}, over the {:?} budget",
                    target, elapsed, self.config.switch_budget
                );
            }
        }
        result
    }

    /// [`switch_language`](Self::switch_language) from an untrusted code.
    ///
    /// Anything other than "ja" or "en" is rejected before any side effect.
    pub fn switch_language_code(&self, code: &str) -> Result<(), I18nError> {
        let target = Locale::from_code(code)?;
        self.switch_language(target)
    }
}
