//! Application state module

use std::{fmt, sync::Arc};

use crate::domain::notifications::NotificationService;

/// Global application state
pub struct AppState<N: NotificationService> {
    /// Notification service
    pub notifications: Arc<N>,
}

/// Implementation of the application state
impl<N> AppState<N>
where
    N: NotificationService,
{
    /// Create a new application state
    pub fn new(notifications: N) -> Self {
        Self {
            notifications: Arc::new(notifications),
        }
    }
}

impl<N: NotificationService> Clone for AppState<N> {
    fn clone(&self) -> Self {
        Self {
            notifications: Arc::clone(&self.notifications),
        }
    }
}

impl<N> fmt::Debug for AppState<N>
where
    N: NotificationService,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("notifications", &"NotificationService")
            .finish()
    }
}
