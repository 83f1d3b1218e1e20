use crate::config::default_banner_timeout_ms;

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Notification display settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// How long a mini-mode banner stays visible, in milliseconds.
    #[serde(default = "default_banner_timeout_ms")]
    pub banner_timeout_ms: u64,
}

impl NotificationConfig {
    /// Banner timeout as a duration.
    pub fn banner_timeout(&self) -> Duration {
        Duration::from_millis(self.banner_timeout_ms)
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            banner_timeout_ms: default_banner_timeout_ms(),
        }
    }
}
