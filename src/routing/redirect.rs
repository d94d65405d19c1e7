//! Redirect guard: decides whether a load-time locale redirect may fire.
//!
//! A redirect is suppressed while a previous one is still inside the
//! cool-down window, and for the rest of the session once the visitor has
//! switched language by hand.

use std::time::Duration;

use serde::Serialize;

use crate::i18n::Locale;
use crate::routing::path::{has_japanese_prefix, localize_path};

/// Default cool-down between automatic redirects.
pub const DEFAULT_REDIRECT_COOLDOWN: Duration = Duration::from_millis(3000);

/// Session-scoped markers read before redirecting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RedirectSuppression {
    /// When the last automatic redirect was issued (ms since epoch)
    pub last_redirect_ms: Option<i64>,

    /// Whether the visitor switched language manually this session
    pub manual_switch: bool,
}

/// Outcome of [`should_auto_redirect`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedirectDecision {
    pub redirect: bool,
    pub target_path: String,
}

impl RedirectDecision {
    fn stay(current_path: &str) -> Self {
        Self {
            redirect: false,
            target_path: current_path.to_string(),
        }
    }
}

/// Whether suppression markers block a redirect at `now_ms`.
///
/// A redirect exactly `cooldown` after the previous one is still blocked;
/// a timestamp in the future (clock skew) also blocks.
pub fn is_suppressed(suppression: &RedirectSuppression, now_ms: i64, cooldown: Duration) -> bool {
    if suppression.manual_switch {
        return true;
    }
    match suppression.last_redirect_ms {
        Some(last) => {
            let cooldown_ms = i64::try_from(cooldown.as_millis()).unwrap_or(i64::MAX);
            now_ms.saturating_sub(last) <= cooldown_ms
        }
        None => false,
    }
}

/// Decide whether the page at `current_path` should move to `detected`'s
/// version of itself.
pub fn should_auto_redirect(
    detected: Locale,
    current_path: &str,
    suppression: &RedirectSuppression,
    now_ms: i64,
    cooldown: Duration,
) -> RedirectDecision {
    if is_suppressed(suppression, now_ms, cooldown) {
        return RedirectDecision::stay(current_path);
    }

    let on_japanese_path = has_japanese_prefix(current_path);
    match (detected, on_japanese_path) {
        (Locale::Ja, true) | (Locale::En, false) => RedirectDecision::stay(current_path),
        (Locale::Ja, false) | (Locale::En, true) => RedirectDecision {
            redirect: true,
            target_path: localize_path(detected, current_path),
        },
    }
}
