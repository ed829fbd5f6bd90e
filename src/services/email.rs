//! Email service for OTP verification mails

use lettre::{
    message::{header::ContentType, Mailbox, Message, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    SmtpTransport, Transport,
};
use std::str::FromStr;

use crate::{
    config::EmailConfig,
    error::{AppError, AppResult},
};

#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Send the verification OTP in the background. Delivery failures are
    /// logged and never reach the caller.
    pub fn queue_otp(&self, to: String, otp: i32) {
        let service = self.clone();

        tokio::spawn(async move {
            let recipient = to.clone();
            match tokio::task::spawn_blocking(move || service.send_otp(&to, otp)).await {
                Ok(Ok(())) => tracing::info!("OTP email sent to {}", recipient),
                Ok(Err(e)) => tracing::warn!("Failed to send OTP email to {}: {}", recipient, e),
                Err(e) => tracing::warn!("OTP email task failed: {}", e),
            }
        });
    }

    /// Build and send the OTP mail (blocking)
    pub fn send_otp(&self, to: &str, otp: i32) -> AppResult<()> {
        let email = self.otp_message(to, otp)?;
        self.transport()?
            .send(&email)
            .map_err(|e| AppError::Internal(format!("Failed to send email: {}", e)))?;

        Ok(())
    }

    pub fn otp_message(&self, to: &str, otp: i32) -> AppResult<Message> {
        let body = format!(
            r#"
Terima kasih telah mendaftar di Perpus.

Kode OTP anda: {otp}

Masukkan kode ini untuk memverifikasi email anda.
"#,
            otp = otp
        );

        self.build_message(to, "Welcome Onboard!", &body)
    }

    fn build_message(&self, to: &str, subject: &str, body: &str) -> AppResult<Message> {
        let from_mailbox = match self.config.smtp_from_name.as_deref() {
            Some(name) => Mailbox::from_str(&format!("{} <{}>", name, self.config.smtp_from)),
            None => Mailbox::from_str(&self.config.smtp_from),
        }
        .map_err(|e| AppError::Internal(format!("Invalid from address: {}", e)))?;

        let to_mailbox = Mailbox::from_str(to)
            .map_err(|e| AppError::Internal(format!("Invalid to address: {}", e)))?;

        Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(format!(
                                r#"<html><body><pre>{}</pre></body></html>"#,
                                body.replace('\n', "<br>")
                            )),
                    ),
            )
            .map_err(|e| AppError::Internal(format!("Failed to build email: {}", e)))
    }

    fn transport(&self) -> AppResult<SmtpTransport> {
        let builder = if self.config.smtp_use_tls {
            SmtpTransport::starttls_relay(&self.config.smtp_host)
                .map_err(|e| AppError::Internal(format!("Failed to create SMTP transport: {}", e)))?
        } else {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
        }
        .port(self.config.smtp_port);

        let builder = match (&self.config.smtp_username, &self.config.smtp_password) {
            (Some(username), Some(password)) => {
                builder.credentials(Credentials::new(username.clone(), password.clone()))
            }
            _ => builder,
        };

        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_otp_message_carries_code() {
        let service = EmailService::new(EmailConfig::default());
        let message = service.otp_message("budi@mail.co", 482913).unwrap();
        let raw = String::from_utf8_lossy(&message.formatted()).to_string();

        assert!(raw.contains("482913"));
        assert!(raw.contains("Subject: Welcome Onboard!"));
        assert!(raw.contains("perpus@mail.co"));
    }

    #[test]
    fn test_invalid_recipient() {
        let service = EmailService::new(EmailConfig::default());
        assert!(matches!(
            service.otp_message("not an address", 123456),
            Err(AppError::Internal(_))
        ));
    }
}
