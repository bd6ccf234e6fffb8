//! Locale type: an opaque, syntactically valid locale token.
//!
//! A `Locale` only guarantees that its code can be used as a single URL path
//! segment. Membership in the configured set is checked by `LocaleRegistry`.

use serde::Serialize;
use std::fmt;

/// Errors raised while building or querying the locale configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocaleError {
    #[error("Invalid locale code: '{0}'")]
    InvalidCode(String),

    #[error("Unknown locale code: '{0}'")]
    Unknown(String),

    #[error("No locales configured")]
    Empty,

    #[error("Duplicate locale code: '{0}'")]
    Duplicate(String),

    #[error("Default locale '{0}' is not in the configured locale set")]
    DefaultNotConfigured(String),

    #[error("Expected exactly one default locale, found {0}")]
    DefaultCount(usize),
}

/// A locale token such as `"es"` or `"en"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Locale {
    code: String,
}

impl Locale {
    /// Create a locale from its code.
    ///
    /// The code must be non-empty and must not contain `/`, `#`, `?` or
    /// whitespace, since it is used verbatim as a path segment.
    ///
    /// # Example
    /// ```ignore
    /// let en = Locale::parse("en")?;
    /// assert_eq!(en.code(), "en");
    /// ```
    pub fn parse(code: &str) -> Result<Locale, LocaleError> {
        let valid = !code.is_empty()
            && !code
                .chars()
                .any(|c| c == '/' || c == '#' || c == '?' || c.is_whitespace());

        if !valid {
            return Err(LocaleError::InvalidCode(code.to_string()));
        }

        Ok(Locale {
            code: code.to_string(),
        })
    }

    /// Locale from a code compiled into the binary.
    pub(super) fn from_static(code: &'static str) -> Locale {
        Locale {
            code: code.to_string(),
        }
    }

    /// The locale code (e.g., "es", "en").
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The path prefix for this locale (e.g., "/en").
    pub fn prefix(&self) -> String {
        format!("/{}", self.code)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}
