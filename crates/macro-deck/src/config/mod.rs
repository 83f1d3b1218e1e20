#[allow(clippy::module_inception)]
mod config;
mod logging_config;
mod notification_config;
mod storage_config;
mod window_config;

pub(crate) use {
    config::Config, logging_config::LoggingConfig, notification_config::NotificationConfig,
    storage_config::StorageConfig, window_config::WindowConfig,
};

use macro_deck_core::DEFAULT_BANNER_TIMEOUT;

pub(crate) const DEFAULT_DEBOUNCE_MS: u64 = 200;
pub(crate) const DEFAULT_LOG_FILTER: &str = "macro_deck=debug,macro_deck_core=debug";

pub(crate) fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

pub(crate) fn default_banner_timeout_ms() -> u64 {
    DEFAULT_BANNER_TIMEOUT.as_millis() as u64
}

pub(crate) fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

pub(crate) mod default_size {
    use macro_deck_core::WindowSize;

    pub(crate) fn compact() -> WindowSize {
        WindowSize::new(355, 140)
    }

    pub(crate) fn normal() -> WindowSize {
        WindowSize::new(1000, 700)
    }

    pub(crate) fn snap_down_below() -> WindowSize {
        WindowSize::new(500, 500)
    }

    pub(crate) fn snap_up_above() -> WindowSize {
        WindowSize::new(360, 150)
    }
}
