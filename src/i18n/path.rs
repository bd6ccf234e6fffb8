//! Locale switching for navigation.
//!
//! Under the "prefix as needed" convention the default locale's URLs carry no
//! locale segment while every other locale's URLs start with `/{locale}`.
//! Switching language must keep the visitor on the same page and the same
//! in-page anchor.

use crate::i18n::Locale;
use serde::Serialize;

/// A root-relative path plus an optional `#fragment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationPath {
    pub path: String,
    pub fragment: Option<String>,
}

impl NavigationPath {
    /// Create a navigation path. An empty fragment is stored as absent, and a
    /// fragment missing its leading `#` gets one.
    pub fn new(path: impl Into<String>, fragment: &str) -> Self {
        Self {
            path: path.into(),
            fragment: normalize_fragment(fragment),
        }
    }

    /// The full navigation target: path followed by the fragment, if any.
    pub fn href(&self) -> String {
        match &self.fragment {
            Some(fragment) => format!("{}{}", self.path, fragment),
            None => self.path.clone(),
        }
    }
}

/// Compute where to navigate when the visitor switches from `current` to
/// `target` while on `current_path#current_fragment`.
///
/// Same-locale switches return the input unchanged; callers should not
/// navigate in that case. Locales outside the configured set are a caller
/// error and are not checked here.
///
/// # Example
/// ```ignore
/// // default "es": /projects -> /en/projects -> /projects
/// let next = resolve_localized_path(&es, &en, &es, "/projects", "");
/// assert_eq!(next.path, "/en/projects");
/// ```
pub fn resolve_localized_path(
    current: &Locale,
    target: &Locale,
    default: &Locale,
    current_path: &str,
    current_fragment: &str,
) -> NavigationPath {
    if target == current {
        return NavigationPath::new(current_path, current_fragment);
    }

    // A path that lacks the prefix its locale implies is taken as already bare.
    let bare = if current == default {
        current_path
    } else {
        strip_locale_prefix(current_path, current).unwrap_or(current_path)
    };

    let path = if target == default {
        if bare.is_empty() {
            "/".to_string()
        } else {
            bare.to_string()
        }
    } else {
        prefix_locale(target, bare)
    };

    NavigationPath::new(path, current_fragment)
}

/// Remove a leading `/{locale}` segment. Returns `None` if the path does not
/// start with that exact segment (`/en` does not match `/english`).
fn strip_locale_prefix<'p>(path: &'p str, locale: &Locale) -> Option<&'p str> {
    let rest = path.strip_prefix('/')?.strip_prefix(locale.code())?;

    if rest.is_empty() || rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}

fn prefix_locale(locale: &Locale, bare: &str) -> String {
    match bare {
        "" | "/" => locale.prefix(),
        _ if bare.starts_with('/') => format!("{}{}", locale.prefix(), bare),
        _ => format!("{}/{}", locale.prefix(), bare),
    }
}

fn normalize_fragment(fragment: &str) -> Option<String> {
    if fragment.is_empty() {
        None
    } else if fragment.starts_with('#') {
        Some(fragment.to_string())
    } else {
        Some(format!("#{}", fragment))
    }
}
