use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    // http server configuration
    /// Port for the HTTP server (UI + status routes)
    pub app_port: u16,
    /// Sessions are dropped after this long without a request
    pub session_expiry: time::Duration,

    // data store configuration
    /// Flat TOML file holding username -> password hash
    pub credentials_path: PathBuf,
    /// Directory holding one file per document
    pub data_path: PathBuf,

    // logging
    pub log_level: tracing::Level,
    /// Directory for log files (optional, logs to stdout only if not set)
    pub log_dir: Option<PathBuf>,
}
