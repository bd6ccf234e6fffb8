//! Internationalization (i18n) module for locale-aware routing and text.
//!
//! The site is served in a finite, configured set of locales. One of them is
//! the default locale, whose URLs carry no locale prefix ("prefix as needed"):
//! with Spanish as default, `/projects` is Spanish and `/en/projects` is
//! English.
//!
//! # Architecture
//!
//! - `locale`: Validated `Locale` token
//! - `registry`: The configured locale set and its default
//! - `path`: Locale switching that preserves the current page and fragment
//! - `strings`: Localized user-facing strings for the HTTP API
//!
//! # Example
//!
//! ```rust,ignore
//! use portfolio_site::i18n::{resolve_localized_path, LocaleRegistry};
//!
//! let registry = LocaleRegistry::builtin();
//! let es = registry.locale("es")?;
//! let en = registry.locale("en")?;
//!
//! let next = resolve_localized_path(&es, &en, registry.default_locale(), "/projects", "#about");
//! assert_eq!(next.href(), "/en/projects#about");
//! ```

mod locale;
mod path;
mod registry;
mod strings;

pub use locale::{Locale, LocaleError};
pub use path::{resolve_localized_path, NavigationPath};
pub use registry::{LocaleConfig, LocaleRegistry};
pub use strings::LocaleStrings;
