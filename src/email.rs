//! Delivery of accepted contact messages to the site owner over SMTP.

use crate::contact::ContactMessage;
use crate::retry::{with_retry_if, RetryConfig};
use async_trait::async_trait;
use chrono::SecondsFormat;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::fmt;
use tracing::{debug, info, warn};

/// Errors raised by the email transport.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmailError {
    /// Missing or invalid `EMAIL_*` configuration.
    #[error("email configuration error: {0}")]
    Config(String),

    /// A configured address could not be parsed.
    #[error("invalid email address: {0}")]
    Address(String),

    /// The SMTP server permanently refused the message.
    #[error("message rejected: {0}")]
    Rejected(String),

    /// Delivery failed in a way that may succeed on retry.
    #[error("send failed: {0}")]
    Send(String),
}

impl EmailError {
    /// Whether retrying the delivery could help.
    pub fn is_retryable(&self) -> bool {
        matches!(self, EmailError::Send(_))
    }
}

/// SMTP settings, read from `EMAIL_*` environment variables.
#[derive(Clone, PartialEq, Eq)]
pub struct EmailConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Sender address
    pub from: String,
    /// Site owner's inbox
    pub to: String,
}

impl fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("from", &self.from)
            .field("to", &self.to)
            .finish()
    }
}

impl EmailConfig {
    /// Load the SMTP configuration from the environment.
    ///
    /// All of `EMAIL_HOST`, `EMAIL_PORT`, `EMAIL_USER`, `EMAIL_PASSWORD`,
    /// `EMAIL_FROM` and `EMAIL_TO` must be set and non-empty.
    pub fn from_env() -> Result<Self, EmailError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load the configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, EmailError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| {
                    EmailError::Config(
                        "Email configuration is incomplete. Please set EMAIL_* environment variables."
                            .to_string(),
                    )
                })
        };

        let host = required("EMAIL_HOST")?;
        let port = required("EMAIL_PORT")?;
        let user = required("EMAIL_USER")?;
        let password = required("EMAIL_PASSWORD")?;
        let from = required("EMAIL_FROM")?;
        let to = required("EMAIL_TO")?;

        let port = port
            .trim()
            .parse()
            .map_err(|_| EmailError::Config("EMAIL_PORT must be a valid number.".to_string()))?;

        Ok(Self {
            host,
            port,
            user,
            password,
            from,
            to,
        })
    }

    /// Port 465 speaks TLS from the first byte; everything else upgrades with STARTTLS.
    pub fn implicit_tls(&self) -> bool {
        self.port == 465
    }
}

/// Something that can deliver a contact message.
#[async_trait]
pub trait ContactMailer: Send + Sync {
    async fn send_contact(&self, contact: &ContactMessage) -> Result<(), EmailError>;

    /// Whether the mailer can deliver at all.
    fn is_configured(&self) -> bool {
        true
    }
}

/// SMTP-backed mailer.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
    retry: RetryConfig,
}

impl SmtpMailer {
    /// Build the SMTP transport. No connection is made until the first send.
    #[tracing::instrument(
        name = "smtp_mailer_new",
        skip(config, retry),
        fields(host = %config.host, port = %config.port)
    )]
    pub fn new(config: EmailConfig, retry: RetryConfig) -> Result<Self, EmailError> {
        let from: Mailbox = config
            .from
            .parse()
            .map_err(|e| EmailError::Address(format!("EMAIL_FROM: {e}")))?;
        let to: Mailbox = config
            .to
            .parse()
            .map_err(|e| EmailError::Address(format!("EMAIL_TO: {e}")))?;

        let builder = if config.implicit_tls() {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
        };
        let builder = builder.map_err(|e| EmailError::Config(format!("{e}")))?;

        let transport = builder
            .port(config.port)
            .credentials(Credentials::new(config.user, config.password))
            .build();

        debug!("SMTP mailer initialized");

        Ok(Self {
            transport,
            from,
            to,
            retry,
        })
    }

    fn build_message(&self, contact: &ContactMessage) -> Result<Message, EmailError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(subject(contact));

        // The form's address check is looser than RFC 5322; skip reply-to rather than drop the message.
        match contact.email().parse::<Mailbox>() {
            Ok(reply_to) => builder = builder.reply_to(reply_to),
            Err(e) => warn!("Contact address not usable as Reply-To: {}", e),
        }

        builder
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body(contact)),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body(contact)),
                    ),
            )
            .map_err(|e| EmailError::Send(format!("failed to build message: {e}")))
    }
}

#[async_trait]
impl ContactMailer for SmtpMailer {
    #[tracing::instrument(name = "smtp_send_contact", skip(self, contact))]
    async fn send_contact(&self, contact: &ContactMessage) -> Result<(), EmailError> {
        let message = self.build_message(contact)?;
        let transport = &self.transport;

        with_retry_if(
            &self.retry,
            "smtp_send",
            || {
                let message = message.clone();
                async move {
                    transport.send(message).await.map(|_| ()).map_err(|e| {
                        if e.is_permanent() {
                            EmailError::Rejected(e.to_string())
                        } else {
                            EmailError::Send(e.to_string())
                        }
                    })
                }
            },
            EmailError::is_retryable,
        )
        .await?;

        info!("Contact message delivered");
        Ok(())
    }
}

/// Stand-in used when the SMTP configuration is incomplete. Every send fails
/// with the configuration error so the HTTP layer can answer 500.
#[derive(Debug, Clone)]
pub struct UnconfiguredMailer {
    error: EmailError,
}

impl UnconfiguredMailer {
    pub fn new(error: EmailError) -> Self {
        Self { error }
    }
}

#[async_trait]
impl ContactMailer for UnconfiguredMailer {
    async fn send_contact(&self, _contact: &ContactMessage) -> Result<(), EmailError> {
        Err(self.error.clone())
    }

    fn is_configured(&self) -> bool {
        false
    }
}

/// Subject line of the notification sent to the site owner.
pub fn subject(contact: &ContactMessage) -> String {
    format!("[Portfolio] Nuevo mensaje de {}", contact.name())
}

/// Plain-text body of the notification.
pub fn text_body(contact: &ContactMessage) -> String {
    format!(
        "Nombre: {}\nEmail: {}\nFecha: {}\n\nMensaje:\n{}",
        contact.name(),
        contact.email(),
        iso_timestamp(contact),
        contact.message()
    )
}

/// HTML body of the notification. User input is escaped.
pub fn html_body(contact: &ContactMessage) -> String {
    format!(
        "<p><strong>Nombre:</strong> {}</p>\n\
<p><strong>Email:</strong> {}</p>\n\
<p><strong>Fecha:</strong> {}</p>\n\
<hr />\n\
<p>{}</p>",
        escape_html(contact.name()),
        escape_html(contact.email()),
        iso_timestamp(contact),
        escape_html(contact.message()).replace('\n', "<br />")
    )
}

fn iso_timestamp(contact: &ContactMessage) -> String {
    contact
        .timestamp()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn escape_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }

    result
}
