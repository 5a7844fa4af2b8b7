//! Mailer errors

use thiserror::Error;

/// Mailer errors
///
/// One variant per step of an SMTP session, so the step that failed can be
/// logged even though callers only ever see a generic failure.
#[derive(Debug, Error)]
pub enum MailerError {
    /// Could not open the connection to the relay
    #[error("could not connect to the mail relay: {0}")]
    Connection(anyhow::Error),

    /// STARTTLS negotiation failed
    #[error("TLS negotiation failed: {0}")]
    Tls(anyhow::Error),

    /// The relay sent a LOGIN challenge we do not understand
    #[error("unexpected authentication prompt: {0}")]
    AuthProtocol(String),

    /// The relay rejected the credentials
    #[error("authentication rejected: {0}")]
    Auth(anyhow::Error),

    /// An error occurred while sending the email
    #[error("an error occurred while sending the email: {0}")]
    SendError(anyhow::Error),

    /// Invalid email address
    #[error("invalid email address")]
    InvalidEmail,

    /// Unknown error
    #[error(transparent)]
    UnknownError(anyhow::Error),
}

impl From<anyhow::Error> for MailerError {
    fn from(err: anyhow::Error) -> Self {
        MailerError::UnknownError(err)
    }
}

impl From<lettre::address::AddressError> for MailerError {
    fn from(_err: lettre::address::AddressError) -> Self {
        MailerError::InvalidEmail
    }
}
