//! Notification email template

use askama::Template;

use super::{NotificationRequest, NotifyError};

/// Notification email template
#[derive(Debug, Template)]
#[template(path = "emails/notification.html")]
pub struct NotificationTemplate<'a> {
    /// Who the notification is from
    pub sender: &'a str,

    /// The notification text
    pub message: &'a str,

    /// Link shown at the bottom of the email
    pub url: &'a str,
}

impl<'a> NotificationTemplate<'a> {
    /// Creates a new `NotificationTemplate` for a request
    pub fn new(request: &'a NotificationRequest) -> Self {
        Self {
            sender: &request.sender,
            message: &request.message,
            url: &request.url,
        }
    }

    /// Renders the email body with its stylesheet inlined
    pub fn render_html(&self) -> Result<String, NotifyError> {
        Ok(css_inline::inline(&self.render()?)?)
    }
}
