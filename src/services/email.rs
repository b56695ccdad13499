//! Outbound confirmation / reset mail over async SMTP.
//!
//! Delivery failures are the caller's problem only to the extent of logging
//! them; nothing in the signup or reset flows fails because SMTP did.

use async_trait::async_trait;
use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::Config;

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("Invalid mail address: {0}")]
    Address(String),
    #[error("Failed to build message: {0}")]
    Message(String),
    #[error("SMTP transport error: {0}")]
    Transport(String),
}

/// The templates this service knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailTemplate {
    ConfirmEmail,
    ResetPassword,
}

impl EmailTemplate {
    fn subject(self) -> &'static str {
        match self {
            EmailTemplate::ConfirmEmail => "Confirm your email",
            EmailTemplate::ResetPassword => "Reset your password",
        }
    }

    fn render(self, host: &str, username: &str, token: &str) -> String {
        let host = host.trim_end_matches('/');
        match self {
            EmailTemplate::ConfirmEmail => format!(
                "<html><body>\
                 <p>Hi {username},</p>\
                 <p>Thanks for signing up. Please confirm your email address:</p>\
                 <p><a href=\"{host}/api/auth/confirmed_email/{token}\">Confirm email</a></p>\
                 </body></html>"
            ),
            EmailTemplate::ResetPassword => format!(
                "<html><body>\
                 <p>Hi {username},</p>\
                 <p>A password reset was requested for your account. Use this \
                 token to set a new password:</p>\
                 <p><code>{token}</code></p>\
                 <p>If this wasn't you, you can ignore this message.</p>\
                 </body></html>"
            ),
        }
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_templated(
        &self,
        to: &str,
        username: &str,
        host: &str,
        template: EmailTemplate,
        token: &str,
    ) -> Result<(), EmailError>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.mail_server)?
            .port(config.mail_port)
            .credentials(Credentials::new(
                config.mail_username.clone(),
                config.mail_password.clone(),
            ))
            .build();

        let from: Mailbox = format!("{} <{}>", config.mail_from_name, config.mail_from)
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid MAIL_FROM: {e}"))?;

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_templated(
        &self,
        to: &str,
        username: &str,
        host: &str,
        template: EmailTemplate,
        token: &str,
    ) -> Result<(), EmailError> {
        let to: Mailbox = to.parse().map_err(|_| EmailError::Address(to.to_string()))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(template.subject())
            .header(ContentType::TEXT_HTML)
            .body(template.render(host, username, token))
            .map_err(|e| EmailError::Message(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map(|_| ())
            .map_err(|e| EmailError::Transport(e.to_string()))
    }
}
