//! Mailer service - transactional confirmation emails over SMTP

use std::fmt;

use chrono::{DateTime, Locale, Utc};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::Config;
use crate::models::{participant, trip};

/// Error type for mail operations
#[derive(Debug)]
pub enum MailError {
    /// Recipient or sender address could not be parsed
    Address(String),
    /// SMTP transport could not be built
    Config(String),
    /// Message could not be assembled
    Build(String),
    /// Delivery failed
    Transport(String),
}

impl fmt::Display for MailError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MailError::Address(msg) => write!(f, "Invalid email address: {}", msg),
            MailError::Config(msg) => write!(f, "Invalid SMTP configuration: {}", msg),
            MailError::Build(msg) => write!(f, "Failed to build message: {}", msg),
            MailError::Transport(msg) => write!(f, "Failed to send message: {}", msg),
        }
    }
}

impl std::error::Error for MailError {}

/// Sends the three transactional messages of the confirmation workflow.
///
/// When SMTP is not configured the mailer is disabled: messages are rendered
/// and their confirmation links logged, so local development and tests never
/// need a mail server.
#[derive(Clone)]
pub struct Mailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    sender: Mailbox,
    api_base_url: String,
}

impl Mailer {
    pub fn from_config(config: &Config) -> Result<Self, MailError> {
        let address = config
            .mail_from_address
            .parse::<Address>()
            .map_err(|e| MailError::Address(e.to_string()))?;
        let sender = Mailbox::new(Some(config.mail_from_name.clone()), address);

        let transport = match &config.smtp_host {
            Some(host) => {
                let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                    .map_err(|e| MailError::Config(e.to_string()))?
                    .port(config.smtp_port);
                if let (Some(username), Some(password)) =
                    (&config.smtp_username, &config.smtp_password)
                {
                    builder =
                        builder.credentials(Credentials::new(username.clone(), password.clone()));
                }
                Some(builder.build())
            }
            None => None,
        };

        Ok(Self {
            transport,
            sender,
            api_base_url: config.api_base_url.clone(),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    /// Mail the trip owner asking them to confirm the trip they just created.
    pub async fn send_trip_created(
        &self,
        trip: &trip::Model,
        owner: &participant::Model,
    ) -> Result<(), MailError> {
        let starts_at = format_long_date(&trip.starts_at);
        let ends_at = format_long_date(&trip.ends_at);
        let confirmation_link = format!("{}/trips/{}/confirm", self.api_base_url, trip.id);

        let subject = format!(
            "Confirme sua viagem para {} em {}",
            trip.destination, starts_at
        );
        let html = format!(
            r#"<div style="font-family: sans-serif; font-size: 16px; line-height: 1.6;">
  <p>Você solicitou a criação de uma viagem para <strong>{}</strong> nas datas de <strong>{}</strong> até <strong>{}</strong>.</p>
  <p></p>
  <p>Para confirmar sua viagem, clique no link abaixo:</p>
  <p></p>
  <p>
    <a href="{}">Confirmar viagem</a>
  </p>
  <p>Caso você não saiba do que se trata esse e-mail, apenas ignore esse e-mail.</p>
</div>"#,
            trip.destination, starts_at, ends_at, confirmation_link
        );

        tracing::info!("trip confirmation link for {}: {}", owner.email, confirmation_link);
        self.deliver(recipient(owner)?, subject, html).await
    }

    /// Mail a guest their personal confirmation link. Sent to every non-owner
    /// participant when the trip is confirmed, and to a single participant
    /// when they are invited afterwards.
    pub async fn send_guest_invitation(
        &self,
        trip: &trip::Model,
        guest: &participant::Model,
    ) -> Result<(), MailError> {
        let starts_at = format_long_date(&trip.starts_at);
        let ends_at = format_long_date(&trip.ends_at);
        let confirmation_link = format!("{}/participants/{}/confirm", self.api_base_url, guest.id);

        let subject = format!(
            "Confirme sua presença na viagem para {} em {}",
            trip.destination, starts_at
        );
        let html = format!(
            r#"<div style="font-family: sans-serif; font-size: 16px; line-height: 1.6;">
  <p>Você foi convidado(a) para participar de uma viagem para <strong>{}</strong> nas datas de <strong>{}</strong> até <strong>{}</strong>.</p>
  <p></p>
  <p>Para confirmar sua presença na viagem, clique no link abaixo:</p>
  <p></p>
  <p>
    <a href="{}">Confirmar viagem</a>
  </p>
  <p></p>
  <p>Caso você não saiba do que se trata esse e-mail, apenas ignore esse e-mail.</p>
</div>"#,
            trip.destination, starts_at, ends_at, confirmation_link
        );

        tracing::info!("presence confirmation link for {}: {}", guest.email, confirmation_link);
        self.deliver(recipient(guest)?, subject, html).await
    }

    async fn deliver(&self, to: Mailbox, subject: String, html: String) -> Result<(), MailError> {
        let Some(transport) = &self.transport else {
            tracing::info!("SMTP disabled, skipping delivery of \"{}\" to {}", subject, to);
            return Ok(());
        };

        let message = Message::builder()
            .from(self.sender.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html)
            .map_err(|e| MailError::Build(e.to_string()))?;

        transport
            .send(message)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;
        Ok(())
    }
}

fn recipient(participant: &participant::Model) -> Result<Mailbox, MailError> {
    let address = participant
        .email
        .parse::<Address>()
        .map_err(|e| MailError::Address(e.to_string()))?;
    Ok(Mailbox::new(participant.name.clone(), address))
}

/// Long-form pt-BR date, e.g. "9 de agosto de 2026".
fn format_long_date(value: &str) -> String {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| {
            dt.with_timezone(&Utc)
                .format_localized("%-d de %B de %Y", Locale::pt_BR)
                .to_string()
        })
        .unwrap_or_else(|_| value.to_string())
}
