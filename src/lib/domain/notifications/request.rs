//! Notification request

use serde::Deserialize;

use super::RequestError;

/// Notification request body as sent by the client.
///
/// Absent keys and `null` values decode to `None` so that they are reported
/// as missing fields rather than as malformed JSON.
#[derive(Debug, Deserialize)]
struct NotificationRequestBody {
    #[serde(default)]
    sender: Option<String>,

    #[serde(default)]
    receiver: Option<String>,

    #[serde(default)]
    message: Option<String>,

    #[serde(default)]
    url: Option<String>,
}

/// A validated notification request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotificationRequest {
    /// Who the notification is from, shown in the email body
    pub sender: String,

    /// The email address to deliver to
    pub receiver: String,

    /// The notification text
    pub message: String,

    /// A link included in the email
    pub url: String,
}

impl NotificationRequest {
    /// Decodes and validates a raw request body.
    ///
    /// # Errors
    /// - [`RequestError::Parse`] if the body is not valid JSON for a request.
    /// - [`RequestError::MissingFields`] if any of the four fields is empty.
    pub fn parse(body: &[u8]) -> Result<Self, RequestError> {
        let body: NotificationRequestBody = serde_json::from_slice(body)?;

        body.validate()
    }
}

impl NotificationRequestBody {
    fn validate(self) -> Result<NotificationRequest, RequestError> {
        let NotificationRequestBody {
            sender: Some(sender),
            receiver: Some(receiver),
            message: Some(message),
            url: Some(url),
        } = self
        else {
            return Err(RequestError::MissingFields);
        };

        if [&sender, &receiver, &message, &url]
            .iter()
            .any(|field| field.is_empty())
        {
            return Err(RequestError::MissingFields);
        }

        Ok(NotificationRequest {
            sender,
            receiver,
            message,
            url,
        })
    }
}
