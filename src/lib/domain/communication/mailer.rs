//! Email service module

use async_trait::async_trait;

#[cfg(test)]
use mockall::mock;

mod errors;
mod message;

pub use errors::MailerError;
pub use message::Email;

/// Email service
#[async_trait]
pub trait Mailer: Send + Sync + 'static {
    /// Send an email
    ///
    /// # Arguments
    /// * `email` - The [`Email`] to deliver.
    ///
    /// # Returns
    /// A [`Result`] indicating success or failure.
    async fn send_email(&self, email: &Email) -> Result<(), MailerError>;
}

#[cfg(test)]
mock! {
    pub Mailer {}

    #[async_trait]
    impl Mailer for Mailer {
        async fn send_email(&self, email: &Email) -> Result<(), MailerError>;
    }
}
