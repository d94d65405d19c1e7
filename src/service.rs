//! The language service: one object that owns the session's locale state.
//!
//! Lifecycle:
//! 1. [`LanguageService::init`] resolves the initial locale from the URL, the
//!    stored preference and the browser languages, and writes the result back
//!    as the preference unless it came from the URL.
//! 2. [`LanguageService::bootstrap`] runs the redirect guard once per page load.
//! 3. Views read [`current_locale`](LanguageService::current_locale), call
//!    [`switch_language`](LanguageService::switch_language) and
//!    [`subscribe`](LanguageService::subscribe) to changes for the rest of the
//!    session.
//!
//! A process normally holds a single instance, installed with
//! [`LanguageService::install_global`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use tracing::{info, warn};

use crate::config::Config;
use crate::i18n::{Interpolations, Locale, SwitchMetrics, Translation, TranslationStore};
use crate::observer::Subscription;
use crate::platform::Platform;
use crate::preferences::{PreferenceStore, SuppressionStore};
use crate::routing::{alternate_paths, resolve, should_auto_redirect, RedirectDecision, Resolution};
use crate::state::LanguageState;

static GLOBAL: OnceLock<Arc<LanguageService>> = OnceLock::new();

pub struct LanguageService {
    pub(crate) config: Config,
    pub(crate) platform: Platform,
    pub(crate) translations: Arc<TranslationStore>,
    pub(crate) state: LanguageState,
    pub(crate) suppression: SuppressionStore,
    pub(crate) metrics: Arc<SwitchMetrics>,
    pub(crate) loading: AtomicBool,
    resolution: Resolution,
}

impl LanguageService {
    /// Resolve the initial locale and build the service.
    ///
    /// Never fails: with no browser capabilities the locale is English.
    pub fn init(config: Config, platform: Platform, translations: Arc<TranslationStore>) -> Self {
        let metrics = Arc::new(SwitchMetrics::new());
        let preferences = PreferenceStore::new(platform.local_storage.clone());

        let resolution = resolve(
            &platform.current_path(),
            preferences.load(),
            platform.languages.as_slice(),
        );
        if resolution.should_persist() {
            if let Err(e) = preferences.save(resolution.locale) {
                metrics.record_persistence_failure();
                warn!("Failed to persist initial language '{}': {}", resolution.locale, e);
            }
        }
        info!(
            "Initial language '{}' resolved from {:?}",
            resolution.locale, resolution.source
        );

        let suppression = SuppressionStore::new(platform.session_storage.clone(), platform.clock.clone());
        let state = LanguageState::new(resolution.locale, preferences, metrics.clone());

        Self {
            config,
            platform,
            translations,
            state,
            suppression,
            metrics,
            loading: AtomicBool::new(false),
            resolution,
        }
    }

    /// Run the load-time redirect guard and navigate if it fires.
    ///
    /// The suppression timestamp is recorded before navigating so the next
    /// page load cannot bounce straight back.
    pub fn bootstrap(&self) -> RedirectDecision {
        let Some(location) = self.platform.location.as_ref() else {
            return RedirectDecision {
                redirect: false,
                target_path: "/".to_string(),
            };
        };
        let current_path = location.path();
        if !self.config.auto_redirect {
            return RedirectDecision {
                redirect: false,
                target_path: current_path,
            };
        }

        let decision = should_auto_redirect(
            self.current_locale(),
            &current_path,
            &self.suppression.read(),
            self.suppression.now_millis(),
            self.config.redirect_cooldown,
        );
        if decision.redirect {
            self.suppression.record_redirect();
            self.metrics.record_auto_redirect();
            info!(
                "Redirecting '{}' to '{}' for language '{}'",
                current_path,
                decision.target_path,
                self.current_locale()
            );
            location.assign(&decision.target_path);
        }
        decision
    }

    /// Make `service` the process-wide instance.
    ///
    /// The first installation wins; later calls return the existing instance.
    pub fn install_global(service: Arc<LanguageService>) -> Arc<LanguageService> {
        let installed = GLOBAL.get_or_init(|| service.clone());
        if !Arc::ptr_eq(installed, &service) {
            warn!("Language service already installed, keeping the existing instance");
        }
        installed.clone()
    }

    /// The process-wide instance, if installed.
    pub fn global() -> Option<Arc<LanguageService>> {
        GLOBAL.get().cloned()
    }

    pub fn current_locale(&self) -> Locale {
        self.state.current_locale()
    }

    /// How the initial locale was chosen.
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Whether a language switch is in progress.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Register for locale changes; see [`LanguageState::subscribe`].
    ///
    /// The argument is the locale that triggered the notification. If another
    /// subscriber switches again while it is running, later callbacks of the
    /// outer notification still see the older value; read
    /// [`current_locale`](Self::current_locale) for the live one.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Locale) + Send + Sync + 'static,
    {
        self.state.subscribe(callback)
    }

    pub fn state(&self) -> &LanguageState {
        &self.state
    }

    pub fn metrics(&self) -> &SwitchMetrics {
        &self.metrics
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn translations(&self) -> &TranslationStore {
        &self.translations
    }

    /// Translate in the current locale.
    pub fn translate(&self, key: &str, interpolations: Option<&Interpolations<'_>>) -> Translation {
        self.translations
            .translate(self.current_locale(), key, interpolations)
    }

    /// Translate in the current locale, rendered as a string.
    pub fn t(&self, key: &str) -> String {
        self.translations.text(self.current_locale(), key)
    }

    /// The current page in every locale.
    pub fn alternate_links(&self) -> Vec<(Locale, String)> {
        alternate_paths(&self.platform.current_path())
    }
}
