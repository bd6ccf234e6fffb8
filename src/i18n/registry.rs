//! Locale registry: the configured locale set and its default.
//!
//! The registry is built once at startup (from configuration) and then shared
//! read-only. It guarantees that the default locale is a member of the set.

use crate::i18n::{Locale, LocaleError};

/// Configuration for a supported locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleConfig {
    /// The locale token used in URLs
    pub locale: Locale,

    /// Name of the locale in its own language (e.g., "Español")
    pub native_name: String,

    /// Whether this is the default locale (served without a path prefix)
    pub is_default: bool,
}

/// The finite, ordered set of locales the site is served in.
#[derive(Debug, Clone)]
pub struct LocaleRegistry {
    locales: Vec<LocaleConfig>,
    default_index: usize,
}

impl LocaleRegistry {
    /// Build a registry from explicit configurations.
    ///
    /// # Returns
    /// * `Err(LocaleError::Empty)` if no locales are given
    /// * `Err(LocaleError::Duplicate)` if a code appears twice
    /// * `Err(LocaleError::DefaultCount)` unless exactly one entry is default
    pub fn new(locales: Vec<LocaleConfig>) -> Result<Self, LocaleError> {
        if locales.is_empty() {
            return Err(LocaleError::Empty);
        }

        for (i, config) in locales.iter().enumerate() {
            if locales[..i].iter().any(|other| other.locale == config.locale) {
                return Err(LocaleError::Duplicate(config.locale.code().to_string()));
            }
        }

        let defaults: Vec<usize> = locales
            .iter()
            .enumerate()
            .filter(|(_, config)| config.is_default)
            .map(|(i, _)| i)
            .collect();

        match defaults.as_slice() {
            [index] => Ok(Self {
                default_index: *index,
                locales,
            }),
            other => Err(LocaleError::DefaultCount(other.len())),
        }
    }

    /// Build a registry from a list of codes and the default code.
    ///
    /// Native names are filled in for known codes; unknown codes use the code
    /// itself as their name.
    pub fn from_codes<'a, I>(codes: I, default_code: &str) -> Result<Self, LocaleError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut locales = Vec::new();
        for code in codes {
            let locale = Locale::parse(code)?;
            locales.push(LocaleConfig {
                native_name: native_name_for(code).to_string(),
                is_default: code == default_code,
                locale,
            });
        }

        if locales.is_empty() {
            return Err(LocaleError::Empty);
        }
        if !locales.iter().any(|config| config.is_default) {
            return Err(LocaleError::DefaultNotConfigured(default_code.to_string()));
        }

        Self::new(locales)
    }

    /// The locales the site ships with: Spanish (default) and English.
    pub fn builtin() -> Self {
        Self {
            locales: vec![
                LocaleConfig {
                    locale: Locale::from_static("es"),
                    native_name: "Español".to_string(),
                    is_default: true,
                },
                LocaleConfig {
                    locale: Locale::from_static("en"),
                    native_name: "English".to_string(),
                    is_default: false,
                },
            ],
            default_index: 0,
        }
    }

    /// Get a locale configuration by its code.
    pub fn get_by_code(&self, code: &str) -> Option<&LocaleConfig> {
        self.locales
            .iter()
            .find(|config| config.locale.code() == code)
    }

    /// Look up a configured locale by code.
    pub fn locale(&self, code: &str) -> Result<Locale, LocaleError> {
        self.get_by_code(code)
            .map(|config| config.locale.clone())
            .ok_or_else(|| LocaleError::Unknown(code.to_string()))
    }

    /// The default locale.
    pub fn default_locale(&self) -> &Locale {
        &self.locales[self.default_index].locale
    }

    /// All configured locales, in configuration order.
    pub fn list(&self) -> &[LocaleConfig] {
        &self.locales
    }

    /// Check if a locale code is configured.
    pub fn is_supported(&self, code: &str) -> bool {
        self.get_by_code(code).is_some()
    }

    /// Decompose a router-reported path into its locale and bare path.
    ///
    /// A leading segment naming a non-default locale selects that locale and
    /// is removed; anything else belongs to the default locale. The bare path
    /// is never empty.
    pub fn split_path<'p>(&self, path: &'p str) -> (Locale, &'p str) {
        let first_segment = path
            .strip_prefix('/')
            .map(|rest| rest.split('/').next().unwrap_or(""))
            .unwrap_or("");

        match self.get_by_code(first_segment) {
            Some(config) if !config.is_default => {
                let rest = &path[1 + first_segment.len()..];
                let bare = if rest.is_empty() { "/" } else { rest };
                (config.locale.clone(), bare)
            }
            _ => {
                let bare = if path.is_empty() { "/" } else { path };
                (self.default_locale().clone(), bare)
            }
        }
    }
}

impl Default for LocaleRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn native_name_for(code: &str) -> &str {
    match code {
        "es" => "Español",
        "en" => "English",
        "fr" => "Français",
        "de" => "Deutsch",
        "pt" => "Português",
        "it" => "Italiano",
        other => other,
    }
}
