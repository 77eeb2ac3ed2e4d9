use crate::config::EmailConfig;
use crate::error::{AskdeskError, Result};
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// Known provider SMTP endpoints. Explicit smtp_server/smtp_port config
/// overrides win; unknown providers fall back to the gmail defaults.
fn resolve_smtp(config: &EmailConfig) -> (String, u16) {
    let (default_host, default_port) = match config.provider.to_lowercase().as_str() {
        "gmail" | "google" => ("smtp.gmail.com", 587),
        "microsoft" | "outlook" | "office365" => ("smtp.office365.com", 587),
        _ => ("smtp.gmail.com", 587),
    };

    let host = config
        .smtp_server
        .clone()
        .unwrap_or_else(|| default_host.to_string());
    let port = config.smtp_port.unwrap_or(default_port);

    (host, port)
}

/// SMTP relay for the contact and meeting form endpoints
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: String,
    recipient: String,
}

impl Mailer {
    /// Resolve the SMTP endpoint and credentials from config and environment.
    /// Fails with a configuration error when the sender credentials are unset.
    pub fn from_config(config: &EmailConfig) -> Result<Self> {
        let sender = std::env::var(&config.sender_env).map_err(|_| {
            AskdeskError::Config(format!("environment variable {} not set", config.sender_env))
        })?;
        // App passwords are often pasted with grouping spaces
        let password = std::env::var(&config.password_env)
            .map_err(|_| {
                AskdeskError::Config(format!(
                    "environment variable {} not set",
                    config.password_env
                ))
            })?
            .replace(' ', "");
        let recipient = std::env::var(&config.recipient_env).unwrap_or_else(|_| sender.clone());

        let (host, port) = resolve_smtp(config);
        log::info!("Email relay configured for {}:{}", host, port);

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&host)
            .map_err(|e| AskdeskError::Config(format!("invalid SMTP relay {}: {}", host, e)))?
            .port(port)
            .credentials(Credentials::new(sender.clone(), password))
            .build();

        Ok(Self {
            transport,
            sender,
            recipient,
        })
    }

    /// Relay one plain-text message to the configured company inbox
    pub async fn send(&self, subject: &str, body: &str) -> Result<()> {
        let message = Message::builder()
            .from(
                self.sender
                    .parse()
                    .map_err(|e| AskdeskError::Config(format!("invalid sender address: {}", e)))?,
            )
            .to(self
                .recipient
                .parse()
                .map_err(|e| {
                    AskdeskError::Config(format!("invalid recipient address: {}", e))
                })?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| AskdeskError::Backend(format!("failed to build email: {}", e)))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| AskdeskError::Backend(format!("email send failed: {}", e)))?;

        log::info!("Relayed email to {}: {}", self.recipient, subject);
        Ok(())
    }
}
