//! Error types for locale routing and switching.
//!
//! Only [`I18nError::InvalidLocale`] and [`I18nError::Navigation`] ever reach a
//! caller of [`LanguageService::switch_language`](crate::service::LanguageService::switch_language).
//! Storage failures are logged and swallowed by the state manager, and missing
//! translation keys are not errors at all.

use thiserror::Error;

use crate::i18n::Locale;

/// Failure reported by a [`KeyValueStore`](crate::platform::KeyValueStore).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// The store does not exist in this context (private mode, server render).
    #[error("storage is unavailable")]
    Unavailable,

    /// The store refused the write because it is full.
    #[error("storage quota exceeded")]
    QuotaExceeded,

    /// Any other backend failure.
    #[error("storage I/O failed: {0}")]
    Io(String),
}

/// Failure reported by a [`Location`](crate::platform::Location).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    /// No History API to update the address bar without a reload.
    #[error("history API is unavailable")]
    HistoryUnavailable,

    /// The History API exists but refused the update.
    #[error("history update rejected: {0}")]
    Rejected(String),
}

/// Unified error for the crate.
#[derive(Debug, Error)]
pub enum I18nError {
    /// Input was not one of the supported locale codes.
    #[error("unsupported locale code: '{0}'")]
    InvalidLocale(String),

    /// The address bar could not be updated in place.
    #[error("navigation failed: {0}")]
    Navigation(#[from] NavigationError),

    /// A store operation failed.
    ///
    /// The crate itself logs and swallows storage failures; this is the
    /// conversion target for host code that calls a
    /// [`KeyValueStore`](crate::platform::KeyValueStore) with `?`.
    #[error("storage failed: {0}")]
    Storage(#[from] StorageError),

    /// An embedded or supplied dictionary could not be parsed.
    #[error("dictionary for '{locale}' is malformed: {source}")]
    Dictionary {
        locale: Locale,
        #[source]
        source: serde_json::Error,
    },
}

impl I18nError {
    /// Whether the user still ends up on the requested locale.
    ///
    /// Navigation failures trigger a full-page fallback, so they are
    /// recoverable from the user's point of view.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Navigation(_) | Self::Storage(_))
    }
}
