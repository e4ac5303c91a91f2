use lettre::message::{MultiPart, SinglePart, header};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::{info, instrument};

use crate::config::email::EmailConfig;
use crate::utils::errors::AppError;

pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    #[instrument(skip(self, reset_token))]
    pub async fn send_password_reset_email(
        &self,
        to_email: &str,
        to_name: &str,
        reset_token: &str,
    ) -> Result<(), AppError> {
        if !self.config.enabled {
            info!(to = %to_email, "SMTP disabled, skipping password reset email");
            return Ok(());
        }

        let reset_link = format!(
            "{}/reset-password?token={}",
            self.config.frontend_url, reset_token
        );

        let text_body = format!(
            "Hi {},\n\n\
             You requested to reset your HomeLink password.\n\n\
             Click the link below to choose a new one:\n\
             {}\n\n\
             This link will expire in 1 hour. If you didn't request this,\n\
             please ignore this email.\n\n\
             The HomeLink Team",
            to_name, reset_link
        );
        let html_body = format!(
            "<p>Hi {},</p>\
             <p>You requested to reset your HomeLink password.</p>\
             <p><a href=\"{}\">Reset your password</a></p>\
             <p>This link will expire in 1 hour. If you didn't request this, \
             please ignore this email.</p>\
             <p>The HomeLink Team</p>",
            to_name, reset_link
        );

        self.send_email(to_email, "Password Reset Request", &text_body, &html_body)
    }

    fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), AppError> {
        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);

        let email = Message::builder()
            .from(from.parse().map_err(AppError::internal)?)
            .to(to_email.parse().map_err(AppError::internal)?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )
            .map_err(AppError::internal)?;

        let mailer = if self.config.smtp_username.is_empty() {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
                .port(self.config.smtp_port)
                .build()
        } else {
            let creds = Credentials::new(
                self.config.smtp_username.clone(),
                self.config.smtp_password.clone(),
            );

            SmtpTransport::relay(&self.config.smtp_host)
                .map_err(AppError::internal)?
                .port(self.config.smtp_port)
                .credentials(creds)
                .build()
        };

        mailer.send(&email).map_err(AppError::internal)?;

        info!(to = %to_email, subject = %subject, "Email sent");
        Ok(())
    }
}
