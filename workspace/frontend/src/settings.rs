use std::cell::RefCell;

use log::Level;
use web_sys::window;

const STORAGE_PREFIX: &str = "lakewatch_";

/// Dashboard settings, read once at startup
#[derive(Debug, Clone)]
pub struct AppSettings {
    /// Backend API host (e.g., "localhost")
    pub api_host: String,

    /// Backend API port (e.g., 3000)
    pub api_port: u16,

    /// API path prefix (e.g., "/api/v1")
    pub api_path: String,

    /// Use HTTPS for API requests
    pub api_use_https: bool,

    pub log_level: Level,

    /// Set when served from localhost
    pub debug_mode: bool,

    /// How long a toast stays on screen
    pub toast_duration_ms: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_host: "localhost".to_string(),
            api_port: 3000,
            api_path: "/api/v1".to_string(),
            api_use_https: false,
            log_level: Level::Info,
            debug_mode: false,
            toast_duration_ms: 5000,
        }
    }
}

fn parse_level(value: &str) -> Option<Level> {
    match value.to_lowercase().as_str() {
        "error" => Some(Level::Error),
        "warn" => Some(Level::Warn),
        "info" => Some(Level::Info),
        "debug" => Some(Level::Debug),
        "trace" => Some(Level::Trace),
        _ => None,
    }
}

impl AppSettings {
    /// Defaults, adjusted by the page location and `lakewatch_*` localStorage keys.
    pub fn from_environment() -> Self {
        let mut settings = Self::default();

        let Some(window) = window() else {
            return settings;
        };

        if let Ok(hostname) = window.location().hostname() {
            settings.debug_mode = hostname == "localhost" || hostname == "127.0.0.1";
            if settings.debug_mode {
                settings.log_level = Level::Debug;
            }
        }

        if let Ok(Some(storage)) = window.local_storage() {
            let read = |key: &str| {
                storage
                    .get_item(&format!("{}{}", STORAGE_PREFIX, key))
                    .ok()
                    .flatten()
            };

            if let Some(api_host) = read("api_host") {
                settings.api_host = api_host;
            }
            if let Some(port) = read("api_port").and_then(|p| p.parse().ok()) {
                settings.api_port = port;
            }
            if let Some(api_path) = read("api_path") {
                settings.api_path = api_path;
            }
            if let Some(use_https) = read("api_use_https") {
                settings.api_use_https = use_https.eq_ignore_ascii_case("true");
            }
            if let Some(level) = read("log_level").as_deref().and_then(parse_level) {
                settings.log_level = level;
            }
            if let Some(duration) = read("toast_duration_ms").and_then(|d| d.parse().ok()) {
                settings.toast_duration_ms = duration;
            }
        }

        settings
    }

    /// Protocol, host, port and path prefix of the API
    pub fn api_base_url(&self) -> String {
        let protocol = if self.api_use_https { "https" } else { "http" };
        format!("{}://{}:{}{}", protocol, self.api_host, self.api_port, self.api_path)
    }

    pub fn api_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.api_base_url(), endpoint)
    }
}

thread_local! {
    static SETTINGS: RefCell<AppSettings> = RefCell::new(AppSettings::default());
}

/// Get a copy of the current settings
pub fn get_settings() -> AppSettings {
    SETTINGS.with(|s| s.borrow().clone())
}

/// Initialize settings (call this at app startup)
pub fn init_settings() {
    SETTINGS.with(|s| {
        *s.borrow_mut() = AppSettings::from_environment();
    });
}
