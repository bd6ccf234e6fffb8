use crate::contact::DEFAULT_MIN_MESSAGE_LENGTH;
use crate::email::{EmailConfig, EmailError};
use crate::i18n::LocaleRegistry;
use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub port: u16,

    // Locales
    pub locales: LocaleRegistry,

    // Contact form
    pub min_message_length: usize,

    // Email (SMTP); the server still starts when this is incomplete
    pub email: Result<EmailConfig, EmailError>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let locale_codes =
            std::env::var("LOCALES").unwrap_or_else(|_| "es,en".to_string());
        let default_locale =
            std::env::var("DEFAULT_LOCALE").unwrap_or_else(|_| "es".to_string());

        Ok(Self {
            // Server
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),

            // Locales
            locales: parse_locales(&locale_codes, &default_locale)?,

            // Contact form
            min_message_length: std::env::var("MIN_MESSAGE_LENGTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MIN_MESSAGE_LENGTH),

            // Email
            email: EmailConfig::from_env(),
        })
    }
}

/// Parse a comma-separated locale list such as `"es, en"`.
fn parse_locales(codes: &str, default_locale: &str) -> Result<LocaleRegistry> {
    let codes = codes
        .split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty());

    LocaleRegistry::from_codes(codes, default_locale.trim())
        .with_context(|| format!("Invalid LOCALES / DEFAULT_LOCALE configuration ('{}')", default_locale))
}
