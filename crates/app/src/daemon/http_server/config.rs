use std::net::SocketAddr;

#[derive(Debug, Clone)]
pub struct Config {
    // Listen address
    pub listen_addr: SocketAddr,
    // log level for http tracing
    pub log_level: tracing::Level,
    // Sessions expire after this long without a request
    pub session_expiry: time::Duration,
}

impl Config {
    pub fn new(listen_addr: SocketAddr, session_expiry: time::Duration) -> Self {
        tracing::info!(
            "Creating HTTP server Config: listen_addr={}, session_expiry={}",
            listen_addr,
            session_expiry
        );
        Self {
            listen_addr,
            log_level: tracing::Level::INFO,
            session_expiry,
        }
    }
}
