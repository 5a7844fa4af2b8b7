use css_inline::InlineError;
use thiserror::Error;
use tracing::debug;

use crate::domain::communication::mailer::MailerError;

/// Errors that can occur while reading a notification request
#[derive(Debug, Error)]
pub enum RequestError {
    /// The body is not a valid notification JSON document
    #[error(transparent)]
    Parse(#[from] serde_json::Error),

    /// One or more of the required fields is empty
    #[error("missing fields")]
    MissingFields,
}

/// Errors that can occur when relaying a notification
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The email body could not be rendered
    #[error("could not render email: {0}")]
    Template(String),

    /// The mailer failed to deliver the email
    #[error(transparent)]
    Mailer(#[from] MailerError),
}

impl From<askama::Error> for NotifyError {
    fn from(err: askama::Error) -> Self {
        debug!("askama::Error -> NotifyError");

        NotifyError::Template(err.to_string())
    }
}

impl From<InlineError> for NotifyError {
    fn from(err: InlineError) -> Self {
        debug!("InlineError -> NotifyError");

        NotifyError::Template(err.to_string())
    }
}
