//! Email notification service.
//!
//! Delivers one-time confirmation codes over SMTP. Without an `[email]`
//! config section the service logs outgoing messages instead of sending,
//! which is what development setups want.

use critika_common::config::EmailConfig;
use critika_common::{AppError, AppResult};
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

#[derive(Clone)]
struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

/// Email service.
#[derive(Clone)]
pub struct EmailService {
    mailer: Option<Mailer>,
    instance_name: String,
}

impl EmailService {
    /// Create a new email service. `config: None` disables real delivery.
    pub fn new(config: Option<&EmailConfig>, instance_name: impl Into<String>) -> AppResult<Self> {
        let mailer = match config {
            Some(config) => {
                let mut builder =
                    AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
                        .map_err(|e| AppError::Config(format!("SMTP relay: {e}")))?
                        .port(config.smtp_port);

                if let (Some(username), Some(password)) =
                    (&config.smtp_username, &config.smtp_password)
                {
                    builder =
                        builder.credentials(Credentials::new(username.clone(), password.clone()));
                }

                Some(Mailer {
                    transport: builder.build(),
                    from_address: config.from_address.clone(),
                })
            }
            None => None,
        };

        Ok(Self {
            mailer,
            instance_name: instance_name.into(),
        })
    }

    /// Check if real delivery is configured.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.mailer.is_some()
    }

    /// Send a registration confirmation code to an address.
    pub async fn send_confirmation_code(&self, to: &str, code: &str) -> AppResult<()> {
        let (subject, body) = render_confirmation(&self.instance_name, code);
        self.send(to, &subject, &body).await
    }

    async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        let Some(mailer) = &self.mailer else {
            tracing::info!(
                to = %to,
                subject = %subject,
                body = %body,
                "Email transport not configured; logging message instead"
            );
            return Ok(());
        };

        let message = Message::builder()
            .from(
                mailer
                    .from_address
                    .parse()
                    .map_err(|e| AppError::Config(format!("from address: {e}")))?,
            )
            .to(to
                .parse()
                .map_err(|e| AppError::Validation(format!("invalid email address: {e}")))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| AppError::Email(e.to_string()))?;

        mailer
            .transport
            .send(message)
            .await
            .map_err(|e| AppError::Email(e.to_string()))?;

        tracing::debug!(to = %to, subject = %subject, "Sent email");
        Ok(())
    }
}

fn render_confirmation(instance_name: &str, code: &str) -> (String, String) {
    let subject = format!("Your {instance_name} confirmation code");
    let body = format!(
        "Use this code to finish signing in to {instance_name}:\n\n{code}\n\n\
        The code is valid for a limited time and can be used once."
    );
    (subject, body)
}
