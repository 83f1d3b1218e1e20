mod notification;
mod router;

pub use {
    notification::{Banner, Severity, Toast},
    router::{DEFAULT_BANNER_TIMEOUT, NotificationRouter},
};
