//! Language routing and switching for the DeepHand marketing site.
//!
//! Japanese pages live under `/ja`, English pages are unprefixed. On load the
//! [`LanguageService`] picks a locale from the URL, the stored preference and
//! the browser languages, and may redirect once. After that, views switch
//! language in place through the service and re-render from its change feed.

pub mod config;
pub mod error;
pub mod hook;
pub mod i18n;
pub mod observer;
pub mod platform;
pub mod preferences;
pub mod routing;
pub mod service;
pub mod state;
mod switcher;

pub use error::{I18nError, NavigationError, StorageError};
pub use hook::{use_language, LanguageContext, LanguageHandle, LanguageSnapshot};
pub use i18n::{Locale, TranslationStore};
pub use service::LanguageService;
