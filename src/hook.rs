//! View-layer adapter: the `useLanguage` hook and its context provider.
//!
//! A view obtains a [`LanguageHandle`] with a re-render callback. The callback
//! fires once per genuine locale change, and the subscription is removed when
//! the handle is dropped (the view is torn down).

use std::sync::Arc;

use serde::Serialize;

use crate::error::I18nError;
use crate::i18n::Locale;
use crate::observer::Subscription;
use crate::service::LanguageService;

/// What a view reads from the hook on each render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LanguageSnapshot {
    pub current_locale: Locale,
    pub is_loading: bool,
}

/// Provider handed down the view tree.
#[derive(Clone)]
pub struct LanguageContext {
    service: Arc<LanguageService>,
}

impl LanguageContext {
    pub fn new(service: Arc<LanguageService>) -> Self {
        Self { service }
    }

    /// Provider backed by the process-wide service, if one is installed.
    pub fn from_global() -> Option<Self> {
        LanguageService::global().map(Self::new)
    }

    pub fn service(&self) -> &Arc<LanguageService> {
        &self.service
    }

    /// Subscribe a view; see [`use_language`].
    pub fn use_language<F>(&self, rerender: F) -> LanguageHandle
    where
        F: Fn(Locale) + Send + Sync + 'static,
    {
        use_language(&self.service, rerender)
    }
}

/// Subscribe a view to locale changes.
///
/// `rerender` receives the locale current when it runs, not the one that
/// started the notification. A subscriber that switches again mid-notification
/// therefore cannot leave the view on a stale locale.
pub fn use_language<F>(service: &Arc<LanguageService>, rerender: F) -> LanguageHandle
where
    F: Fn(Locale) + Send + Sync + 'static,
{
    let weak = Arc::downgrade(service);
    let subscription = service.subscribe(move |_| {
        if let Some(service) = weak.upgrade() {
            rerender(service.current_locale());
        }
    });
    LanguageHandle {
        service: Arc::clone(service),
        subscription,
    }
}

/// A mounted view's connection to the language service.
pub struct LanguageHandle {
    service: Arc<LanguageService>,
    subscription: Subscription,
}

impl LanguageHandle {
    pub fn current_locale(&self) -> Locale {
        self.service.current_locale()
    }

    pub fn is_loading(&self) -> bool {
        self.service.is_loading()
    }

    pub fn snapshot(&self) -> LanguageSnapshot {
        LanguageSnapshot {
            current_locale: self.current_locale(),
            is_loading: self.is_loading(),
        }
    }

    pub fn switch_language(&self, target: Locale) -> Result<(), I18nError> {
        self.service.switch_language(target)
    }

    /// Translate in the current locale.
    pub fn t(&self, key: &str) -> String {
        self.service.t(key)
    }
}

impl Drop for LanguageHandle {
    fn drop(&mut self) {
        self.subscription.unsubscribe();
    }
}
