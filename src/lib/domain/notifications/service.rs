//! Notification service

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

#[cfg(test)]
use mockall::mock;

use crate::domain::communication::mailer::{Email, Mailer};

use super::{NotificationRequest, NotificationTemplate, NotifyError};

/// Notification service
#[async_trait]
pub trait NotificationService: Send + Sync + 'static {
    /// Renders a notification and sends it to its receiver.
    ///
    /// # Arguments
    /// * `request` - The validated [`NotificationRequest`].
    ///
    /// # Returns
    /// - [`Ok`] once the relay has accepted the message.
    /// - [`Err`] containing a [`NotifyError`] if rendering or delivery failed.
    async fn notify(&self, request: &NotificationRequest) -> Result<(), NotifyError>;
}

#[cfg(test)]
mock! {
    pub NotificationService {}

    #[async_trait]
    impl NotificationService for NotificationService {
        async fn notify(&self, request: &NotificationRequest) -> Result<(), NotifyError>;
    }
}

/// Notification service implementation
#[derive(Debug)]
pub struct NotificationServiceImpl<M>
where
    M: Mailer,
{
    mailer: Arc<M>,
    subject: String,
}

impl<M> NotificationServiceImpl<M>
where
    M: Mailer,
{
    /// Creates a new notification service.
    pub fn new(mailer: Arc<M>, subject: &str) -> Self {
        Self {
            mailer,
            subject: subject.to_string(),
        }
    }

    fn compose(&self, request: &NotificationRequest) -> Result<Email, NotifyError> {
        let html_body = NotificationTemplate::new(request).render_html()?;

        Ok(Email {
            to: request.receiver.clone(),
            subject: self.subject.clone(),
            html_body,
        })
    }
}

#[async_trait]
impl<M> NotificationService for NotificationServiceImpl<M>
where
    M: Mailer,
{
    async fn notify(&self, request: &NotificationRequest) -> Result<(), NotifyError> {
        let email = self.compose(request)?;

        self.mailer.send_email(&email).await?;

        info!(receiver = %request.receiver, "notification sent");

        Ok(())
    }
}
