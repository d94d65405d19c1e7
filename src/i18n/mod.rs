//! Internationalization (i18n) module for the Japanese and English site.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for locale metadata
//! - `locale`: The closed `Locale` enum with strict parsing
//! - `dictionary`: Embedded dictionaries, key lookup and `{{name}}` interpolation
//! - `validator`: Cross-locale dictionary parity checks
//! - `metrics`: Switch and redirect counters
//!
//! # Example
//!
//! ```rust
//! use deephand_i18n::i18n::{Locale, TranslationStore};
//!
//! let japanese = Locale::from_code("ja").unwrap();
//! let title = TranslationStore::embedded().text(japanese, "contact.title");
//! assert_eq!(title, "お問い合わせ");
//! ```

mod dictionary;
mod locale;
mod metrics;
mod registry;
mod validator;

pub use dictionary::{interpolate, Dictionary, Entry, Interpolations, Translation, TranslationStore};
pub use locale::Locale;
pub use metrics::{MetricsReport, SwitchMetrics};
pub use registry::{LocaleConfig, LocaleRegistry};
pub use validator::{placeholders, DictionaryValidator, ValidationReport};
