//! SMTP email service implementation

use std::{fmt, time::Duration};

use anyhow::anyhow;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use clap::Parser;
use lettre::{
    address::Envelope,
    message::{
        header::{ContentType, MIME_VERSION_1_0},
        Mailbox,
    },
    transport::smtp::{
        client::{SmtpConnection, TlsParameters},
        extension::ClientId,
        response::Response,
    },
    Message,
};
use tracing::{debug, error, warn};

use crate::{
    domain::communication::mailer::{Email, Mailer, MailerError},
    infrastructure::email::login::{LoginAuth, SmtpAuthenticator},
};

/// Content type of every notification email, as lettre writes it
pub const HTML_CONTENT_TYPE: &str = r#"text/html; charset="utf-8""#;

/// SMTP configuration
#[derive(Clone, Parser)]
pub struct SMTPConfig {
    /// The SMTP host
    #[clap(long = "smtp-host", env = "SMTP_HOST", default_value = "smtp.office365.com")]
    pub host: String,

    /// The SMTP port
    #[clap(long = "smtp-port", env = "SMTP_PORT", default_value = "587")]
    pub port: u16,

    /// The SMTP username, also used as the sender address
    #[clap(long = "smtp-username", env = "EMAIL", default_value = "")]
    pub username: String,

    /// The SMTP password
    #[clap(
        long = "smtp-password",
        env = "PASSWORD",
        default_value = "",
        hide_env_values = true
    )]
    pub password: String,

    /// Verify the TLS certificate
    #[clap(long = "smtp-verify-tls", env = "SMTP_VERIFY_TLS", default_value = "true")]
    pub verify_tls: bool,

    /// Enable STARTTLS (TLS upgrade on connection)
    #[clap(long = "smtp-starttls", env = "SMTP_STARTTLS", default_value = "true")]
    pub starttls: bool,

    /// Connection and command timeout in seconds
    #[clap(long = "smtp-timeout-secs", env = "SMTP_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Subject line of notification emails
    #[clap(long, env = "EMAIL_SUBJECT", default_value = "Tecsim Notification")]
    pub subject: String,
}

impl fmt::Debug for SMTPConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SMTPConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"********")
            .field("verify_tls", &self.verify_tls)
            .field("starttls", &self.starttls)
            .field("timeout_secs", &self.timeout_secs)
            .field("subject", &self.subject)
            .finish()
    }
}

impl Default for SMTPConfig {
    fn default() -> Self {
        Self {
            host: "smtp.office365.com".to_string(),
            port: 587,
            username: String::new(),
            password: String::new(),
            verify_tls: true,
            starttls: true,
            timeout_secs: None,
            subject: "Tecsim Notification".to_string(),
        }
    }
}

/// SMTP mailer
///
/// Opens a fresh connection for every email: connect, STARTTLS, `AUTH LOGIN`,
/// then the envelope and message. The first failing step aborts the send.
#[derive(Debug, Default, Clone)]
pub struct SMTPMailer {
    config: SMTPConfig,
}

impl SMTPMailer {
    /// Create a new SMTP mailer
    pub fn new(config: SMTPConfig) -> Self {
        Self { config }
    }

    /// Builds the MIME message for an [`Email`], sent from the configured username
    pub fn message(&self, email: &Email) -> Result<Message, MailerError> {
        let content_type = ContentType::parse(HTML_CONTENT_TYPE)
            .map_err(|e| MailerError::UnknownError(e.into()))?;

        Message::builder()
            .from(self.config.username.parse::<Mailbox>()?)
            .to(email.to.parse::<Mailbox>()?)
            .subject(email.subject.clone())
            .header(MIME_VERSION_1_0)
            .header(content_type)
            .body(email.html_body.clone())
            .map_err(|e| MailerError::UnknownError(e.into()))
    }

    fn deliver(&self, envelope: &Envelope, message: &[u8]) -> Result<(), MailerError> {
        let hello = ClientId::default();
        let timeout = self.config.timeout_secs.map(Duration::from_secs);

        debug!(host = %self.config.host, port = self.config.port, "connecting to mail relay");

        let mut connection = SmtpConnection::connect(
            (self.config.host.as_str(), self.config.port),
            timeout,
            &hello,
            None,
            None,
        )
        .map_err(|e| MailerError::Connection(e.into()))?;

        if self.config.starttls {
            if !connection.can_starttls() {
                return Err(MailerError::Tls(anyhow!(
                    "{} does not offer STARTTLS",
                    self.config.host
                )));
            }

            let tls = TlsParameters::builder(self.config.host.to_string())
                .dangerous_accept_invalid_certs(!self.config.verify_tls)
                .build()
                .map_err(|e| MailerError::Tls(e.into()))?;

            connection
                .starttls(&tls, &hello)
                .map_err(|e| MailerError::Tls(e.into()))?;
        }

        let auth = LoginAuth::new(&self.config.username, &self.config.password);
        authenticate(&mut connection, &auth)?;

        connection
            .send(envelope, message)
            .map_err(|e| MailerError::SendError(e.into()))?;

        if let Err(e) = connection.quit() {
            warn!(error = %e, "failed to close SMTP session");
        }

        Ok(())
    }
}

/// Runs an `AUTH` exchange driven by `auth` on an open connection.
fn authenticate(
    connection: &mut SmtpConnection,
    auth: &impl SmtpAuthenticator,
) -> Result<(), MailerError> {
    let (mechanism, initial) = auth.start();

    let command = match initial {
        Some(initial) => format!("AUTH {mechanism} {}\r\n", STANDARD.encode(initial)),
        None => format!("AUTH {mechanism}\r\n"),
    };

    let mut response = connection
        .command(command)
        .map_err(|e| MailerError::Auth(e.into()))?;

    while response.has_code(334) {
        let challenge = decode_challenge(&response)?;

        let answer = auth
            .next(&challenge, true)
            .map_err(|e| MailerError::AuthProtocol(e.0))?
            .unwrap_or_default();

        response = connection
            .command(format!("{}\r\n", STANDARD.encode(answer)))
            .map_err(|e| MailerError::Auth(e.into()))?;
    }

    Ok(())
}

fn decode_challenge(response: &Response) -> Result<String, MailerError> {
    let line = response.first_line().unwrap_or_default();

    STANDARD
        .decode(line.trim())
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .ok_or_else(|| MailerError::AuthProtocol(line.to_string()))
}

#[async_trait]
impl Mailer for SMTPMailer {
    async fn send_email(&self, email: &Email) -> Result<(), MailerError> {
        let message = self.message(email)?;
        let envelope = message.envelope().clone();
        let formatted = message.formatted();

        let mailer = self.clone();

        let result = tokio::task::spawn_blocking(move || mailer.deliver(&envelope, &formatted))
            .await
            .map_err(|e| MailerError::UnknownError(e.into()))?;

        if let Err(e) = &result {
            error!(
                host = %self.config.host,
                port = self.config.port,
                error = %e,
                "failed to send email"
            );
        }

        result
    }
}
