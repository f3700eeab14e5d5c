use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub picker: PickerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// Seed the shipped templates at startup
    #[serde(default = "default_include_builtins")]
    pub include_builtins: bool,
    /// Capacity of the change notification channel
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PickerConfig {
    /// Maximum number of concurrently open picker sessions
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
    /// Idle time in seconds after which a session is discarded
    #[serde(default = "default_session_ttl")]
    pub session_ttl_seconds: u64,
    /// Sweep interval in seconds
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Fallback filter when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,
    /// "pretty" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8082
}

fn default_include_builtins() -> bool {
    true
}

fn default_event_buffer() -> usize {
    64
}

fn default_max_sessions() -> usize {
    1024
}

fn default_session_ttl() -> u64 {
    1800 // 30 minutes
}

fn default_sweep_interval() -> u64 {
    60 // 1 minute
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port() as i64)?
            .set_default("catalog.include_builtins", default_include_builtins())?
            .set_default("catalog.event_buffer", default_event_buffer() as i64)?
            .set_default("picker.max_sessions", default_max_sessions() as i64)?
            .set_default("picker.session_ttl_seconds", default_session_ttl() as i64)?
            .set_default("picker.sweep_interval_seconds", default_sweep_interval() as i64)?
            .set_default("logging.level", default_log_level())?
            .set_default("logging.format", default_log_format())?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // NOTES__SERVER__PORT, NOTES__PICKER__MAX_SESSIONS, ...
            .add_source(
                Environment::with_prefix("NOTES")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins"),
            );

        builder.build()?.try_deserialize()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            include_builtins: default_include_builtins(),
            event_buffer: default_event_buffer(),
        }
    }
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            max_sessions: default_max_sessions(),
            session_ttl_seconds: default_session_ttl(),
            sweep_interval_seconds: default_sweep_interval(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}
