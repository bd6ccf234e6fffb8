//! HTTP surface: contact form submission, locale switching and health.

use crate::config::Config;
use crate::contact::{Field, MessageValidator, ValidationErrors};
use crate::email::{ContactMailer, EmailError, SmtpMailer, UnconfiguredMailer};
use crate::i18n::{resolve_localized_path, LocaleRegistry, LocaleStrings, NavigationPath};
use crate::metrics::{ContactMetrics, MetricsReport};
use crate::retry::RetryConfig;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

/// Shared, read-only state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub locales: Arc<LocaleRegistry>,
    pub validator: MessageValidator,
    pub mailer: Arc<dyn ContactMailer>,
    pub metrics: Arc<ContactMetrics>,
}

impl AppState {
    pub fn new(
        locales: LocaleRegistry,
        validator: MessageValidator,
        mailer: Arc<dyn ContactMailer>,
    ) -> Self {
        Self {
            locales: Arc::new(locales),
            validator,
            mailer,
            metrics: Arc::new(ContactMetrics::new()),
        }
    }

    /// Build the state from configuration. An incomplete or invalid SMTP setup
    /// is logged and replaced by a mailer that always fails.
    pub fn from_config(config: &Config) -> Self {
        let mailer: Arc<dyn ContactMailer> = match config.email.clone() {
            Ok(email) => match SmtpMailer::new(email, RetryConfig::smtp_send()) {
                Ok(mailer) => Arc::new(mailer),
                Err(e) => {
                    warn!("SMTP mailer could not be created, contact form disabled: {}", e);
                    Arc::new(UnconfiguredMailer::new(e))
                }
            },
            Err(e) => {
                warn!("Email not configured, contact form disabled: {}", e);
                Arc::new(UnconfiguredMailer::new(e))
            }
        };

        Self::new(
            config.locales.clone(),
            MessageValidator::new(config.min_message_length),
            mailer,
        )
    }

    fn strings_for(&self, code: Option<&str>) -> &'static LocaleStrings {
        match code.and_then(|c| self.locales.locale(c).ok()) {
            Some(locale) => LocaleStrings::for_locale(&locale),
            None => LocaleStrings::for_locale(self.locales.default_locale()),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/contact", post(submit_contact))
        .route("/api/locale-path", get(locale_path))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ==================== Errors ====================

/// Errors returned to HTTP clients. Client mistakes map to 400, delivery
/// problems to 500.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid JSON payload")]
    InvalidJson { strings: &'static LocaleStrings },

    #[error("validation failed: {errors}")]
    Validation {
        errors: ValidationErrors,
        strings: &'static LocaleStrings,
    },

    #[error("missing query parameter: {name}")]
    MissingParameter {
        name: &'static str,
        strings: &'static LocaleStrings,
    },

    #[error("malformed path: {path}")]
    InvalidPath {
        path: String,
        strings: &'static LocaleStrings,
    },

    #[error("unknown locale: {code}")]
    UnknownLocale {
        code: String,
        strings: &'static LocaleStrings,
    },

    #[error("email delivery failed: {error}")]
    Email {
        error: EmailError,
        strings: &'static LocaleStrings,
    },
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FieldError {
    pub field: Field,
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<FieldError>>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidJson { .. }
            | ApiError::Validation { .. }
            | ApiError::MissingParameter { .. }
            | ApiError::InvalidPath { .. }
            | ApiError::UnknownLocale { .. } => StatusCode::BAD_REQUEST,
            ApiError::Email { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            ApiError::InvalidJson { strings } => ErrorBody {
                success: false,
                message: strings.invalid_json.to_string(),
                errors: None,
            },
            ApiError::Validation { errors, strings } => ErrorBody {
                success: false,
                message: strings.failure_text(errors.first()),
                errors: Some(
                    errors
                        .failures()
                        .iter()
                        .map(|failure| FieldError {
                            field: failure.field(),
                            code: failure.code().to_string(),
                            message: strings.failure_text(failure),
                        })
                        .collect(),
                ),
            },
            ApiError::MissingParameter { name, strings } => ErrorBody {
                success: false,
                message: strings.missing_parameter.replace("{name}", name),
                errors: None,
            },
            ApiError::InvalidPath { path, strings } => ErrorBody {
                success: false,
                message: strings.invalid_path.replace("{path}", &path),
                errors: None,
            },
            ApiError::UnknownLocale { code, strings } => ErrorBody {
                success: false,
                message: strings.unknown_locale.replace("{locale}", &code),
                errors: None,
            },
            ApiError::Email { error, strings } => ErrorBody {
                success: false,
                message: match error {
                    EmailError::Config(_) => strings.email_not_configured.to_string(),
                    _ => strings.send_failed.to_string(),
                },
                errors: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

// ==================== Contact ====================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ContactPayload {
    name: Option<String>,
    email: Option<String>,
    message: Option<String>,
    locale: Option<String>,
}

#[derive(Debug, Serialize)]
struct ContactResponse {
    success: bool,
    message: &'static str,
}

async fn submit_contact(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ContactResponse>, ApiError> {
    let payload: ContactPayload = serde_json::from_slice(&body).map_err(|e| {
        debug!("Rejecting contact payload: {}", e);
        ApiError::InvalidJson {
            strings: state.strings_for(None),
        }
    })?;

    state.metrics.record_received();
    let strings = state.strings_for(payload.locale.as_deref());

    let contact = state
        .validator
        .validate(
            payload.name.as_deref().unwrap_or(""),
            payload.email.as_deref().unwrap_or(""),
            payload.message.as_deref().unwrap_or(""),
        )
        .map_err(|errors| {
            debug!("Contact form rejected: {}", errors);
            state.metrics.record_rejected();
            ApiError::Validation { errors, strings }
        })?;

    if let Err(e) = state.mailer.send_contact(&contact).await {
        error!("Failed to deliver contact message: {}", e);
        state.metrics.record_delivery_failure();
        return Err(ApiError::Email { error: e, strings });
    }

    state.metrics.record_delivered();
    info!("Contact message accepted and delivered");

    Ok(Json(ContactResponse {
        success: true,
        message: strings.contact_success,
    }))
}

// ==================== Locale Path ====================

#[derive(Debug, Deserialize)]
struct LocalePathQuery {
    current: Option<String>,
    target: Option<String>,
    path: Option<String>,
    fragment: Option<String>,
}

#[derive(Debug, Serialize)]
struct LocalePathResponse {
    #[serde(flatten)]
    navigation: NavigationPath,
    href: String,
    changed: bool,
}

async fn locale_path(
    State(state): State<AppState>,
    Query(query): Query<LocalePathQuery>,
) -> Result<Json<LocalePathResponse>, ApiError> {
    let strings = state.strings_for(None);
    let unknown = |code: &str| ApiError::UnknownLocale {
        code: code.to_string(),
        strings,
    };

    let target_code = query.target.as_deref().ok_or(ApiError::MissingParameter {
        name: "target",
        strings,
    })?;
    let target = state.locales.locale(target_code).map_err(|_| unknown(target_code))?;

    let path = match query.path.as_deref() {
        None | Some("") => "/".to_string(),
        Some(p) if p.starts_with('/') => p.to_string(),
        Some(p) => format!("/{}", p),
    };
    if !is_well_formed_path(&path) {
        return Err(ApiError::InvalidPath { path, strings });
    }

    let fragment = query.fragment.as_deref().unwrap_or("");
    if !is_well_formed_fragment(fragment) {
        return Err(ApiError::InvalidPath {
            path: fragment.to_string(),
            strings,
        });
    }

    let current = match query.current.as_deref() {
        Some(code) => state.locales.locale(code).map_err(|_| unknown(code))?,
        None => state.locales.split_path(&path).0,
    };

    let navigation = resolve_localized_path(
        &current,
        &target,
        state.locales.default_locale(),
        &path,
        fragment,
    );

    Ok(Json(LocalePathResponse {
        href: navigation.href(),
        changed: current != target,
        navigation,
    }))
}

/// A bare path segment list: no empty segments, no query or fragment.
fn is_well_formed_path(path: &str) -> bool {
    !path.contains("//") && !path.contains(['#', '?'])
}

fn is_well_formed_fragment(fragment: &str) -> bool {
    let anchor = fragment.strip_prefix('#').unwrap_or(fragment);
    !anchor.contains(['#', '?', '/'])
}

// ==================== Health ====================

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    email_configured: bool,
    default_locale: String,
    locales: Vec<String>,
    metrics: MetricsReport,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        email_configured: state.mailer.is_configured(),
        default_locale: state.locales.default_locale().code().to_string(),
        locales: state
            .locales
            .list()
            .iter()
            .map(|config| config.locale.code().to_string())
            .collect(),
        metrics: state.metrics.report(),
    })
}
