use crate::contact::ValidationFailure;
use crate::i18n::Locale;

/// All localized user-facing strings returned by the HTTP API.
#[derive(Debug, Clone)]
pub struct LocaleStrings {
    // ==================== Contact Form ====================
    /// Name field left empty
    pub name_required: &'static str,

    /// Email missing or malformed
    pub email_invalid: &'static str,

    /// Message field left empty
    pub message_required: &'static str,

    /// Message below the minimum length
    /// Placeholders: {min}
    pub message_too_short: &'static str,

    /// Message accepted and delivered
    pub contact_success: &'static str,

    // ==================== Request Errors ====================
    /// Request body could not be parsed
    pub invalid_json: &'static str,

    /// A required query parameter is absent
    /// Placeholders: {name}
    pub missing_parameter: &'static str,

    /// A locale in the request is not configured
    /// Placeholders: {locale}
    pub unknown_locale: &'static str,

    /// A path or fragment in the request is not a well-formed URL part
    /// Placeholders: {path}
    pub invalid_path: &'static str,

    // ==================== Delivery Errors ====================
    /// The email transport is missing configuration
    pub email_not_configured: &'static str,

    /// The email transport failed to deliver the message
    pub send_failed: &'static str,
}

impl LocaleStrings {
    /// Strings for a locale. Locales without a translation use English.
    pub fn for_locale(locale: &Locale) -> &'static LocaleStrings {
        Self::for_code(locale.code())
    }

    pub fn for_code(code: &str) -> &'static LocaleStrings {
        match code {
            "es" => &SPANISH_STRINGS,
            _ => &ENGLISH_STRINGS,
        }
    }

    /// Localized text for a validation failure.
    pub fn failure_text(&self, failure: &ValidationFailure) -> String {
        match failure {
            ValidationFailure::NameRequired => self.name_required.to_string(),
            ValidationFailure::EmailInvalid => self.email_invalid.to_string(),
            ValidationFailure::MessageRequired => self.message_required.to_string(),
            ValidationFailure::MessageTooShort { min } => self
                .message_too_short
                .replace("{min}", &min.to_string()),
        }
    }
}

// ==================== English Strings ====================

pub const ENGLISH_STRINGS: LocaleStrings = LocaleStrings {
    name_required: "Name is required",
    email_invalid: "Valid email is required",
    message_required: "Message is required",
    message_too_short: "Message must be at least {min} characters",
    contact_success: "Thanks! Your message has been sent.",

    invalid_json: "Invalid JSON payload.",
    missing_parameter: "Missing query parameter: {name}",
    unknown_locale: "Unsupported locale: {locale}",
    invalid_path: "Malformed path: {path}",

    email_not_configured:
        "Email configuration is incomplete. Please set EMAIL_* environment variables.",
    send_failed: "Unexpected error while sending message.",
};

// ==================== Spanish Strings ====================

pub const SPANISH_STRINGS: LocaleStrings = LocaleStrings {
    name_required: "El nombre es obligatorio",
    email_invalid: "Se requiere un email válido",
    message_required: "El mensaje es obligatorio",
    message_too_short: "El mensaje debe tener al menos {min} caracteres",
    contact_success: "¡Gracias! Tu mensaje ha sido enviado.",

    invalid_json: "El cuerpo de la solicitud no es un JSON válido.",
    missing_parameter: "Falta el parámetro: {name}",
    unknown_locale: "Idioma no soportado: {locale}",
    invalid_path: "Ruta mal formada: {path}",

    email_not_configured:
        "La configuración de email está incompleta. Define las variables de entorno EMAIL_*.",
    send_failed: "Error inesperado al enviar el mensaje.",
};
