//! Pure URL and locale-selection logic.
//!
//! - `path`: adding, removing and replacing the `/ja` prefix
//! - `resolver`: picking the initial locale from URL, preference and browser
//! - `redirect`: deciding whether a load-time redirect may fire

pub mod path;
pub mod redirect;
pub mod resolver;

pub use path::{alternate_paths, has_japanese_prefix, locale_from_path, localize_path, strip_locale_prefix};
pub use redirect::{
    is_suppressed, should_auto_redirect, RedirectDecision, RedirectSuppression,
    DEFAULT_REDIRECT_COOLDOWN,
};
pub use resolver::{
    detect_browser_locale, parse_accept_language, resolve, resolve_initial_locale, LocaleSource,
    Resolution,
};
