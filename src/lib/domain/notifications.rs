//! Notifications module.

mod errors;
mod request;
mod service;
mod template;

pub use errors::{NotifyError, RequestError};
pub use request::NotificationRequest;
pub use service::{NotificationService, NotificationServiceImpl};
pub use template::NotificationTemplate;
