//! Path translator: the only place that inspects or rewrites locale prefixes.
//!
//! Japanese pages live under `/ja`; every other path is English. A `/en`
//! prefix is never produced but is accepted on input and stripped. Prefixes
//! only match on a segment boundary, so `/japan` is an English path.

use crate::i18n::Locale;

const JA_PREFIX: &str = "/ja";
const EN_PREFIX: &str = "/en";

fn prefix_for(locale: Locale) -> &'static str {
    match locale {
        Locale::Ja => JA_PREFIX,
        Locale::En => EN_PREFIX,
    }
}

fn has_segment_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with(['/', '?', '#']),
        None => false,
    }
}

fn with_leading_slash(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

/// Whether `path` is under the Japanese prefix.
pub fn has_japanese_prefix(path: &str) -> bool {
    has_segment_prefix(&with_leading_slash(path), JA_PREFIX)
}

/// The locale named by an explicit `/ja` or `/en` prefix, if any.
pub fn locale_from_path(path: &str) -> Option<Locale> {
    let path = with_leading_slash(path);
    Locale::ALL
        .into_iter()
        .find(|locale| has_segment_prefix(&path, prefix_for(*locale)))
}

/// Remove one leading `/ja` or `/en` segment.
///
/// The result always starts with `/`; a bare prefix becomes `/`.
pub fn strip_locale_prefix(path: &str) -> String {
    let path = with_leading_slash(path);
    match locale_from_path(&path) {
        Some(locale) => {
            let rest = &path[prefix_for(locale).len()..];
            if rest.is_empty() {
                "/".to_string()
            } else if rest.starts_with('/') {
                rest.to_string()
            } else {
                // query or fragment directly after the prefix
                format!("/{}", rest)
            }
        }
        None => path,
    }
}

/// Map `path` to the equivalent page in `locale`.
///
/// English paths are unprefixed (root is `/`); Japanese paths gain `/ja`
/// (root is exactly `/ja`, never `/ja/`).
pub fn localize_path(locale: Locale, path: &str) -> String {
    let normalized = strip_locale_prefix(path);
    match locale {
        Locale::En => normalized,
        Locale::Ja => {
            if normalized == "/" {
                JA_PREFIX.to_string()
            } else if normalized.starts_with("/?") || normalized.starts_with("/#") {
                format!("{}{}", JA_PREFIX, &normalized[1..])
            } else {
                format!("{}{}", JA_PREFIX, normalized)
            }
        }
    }
}

/// The page at `path` in every locale, for `hreflang` alternates.
pub fn alternate_paths(path: &str) -> Vec<(Locale, String)> {
    Locale::ALL
        .into_iter()
        .map(|locale| (locale, localize_path(locale, path)))
        .collect()
}
