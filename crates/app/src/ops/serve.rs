use clap::Args;

use cms::{spawn_service, AppState, ServiceConfig};

#[derive(Args, Debug, Clone)]
pub struct Serve {
    /// Override the configured port
    #[arg(long)]
    pub port: Option<u16>,

    /// Default log level, RUST_LOG takes precedence
    #[arg(long, default_value_t = tracing::Level::INFO)]
    pub log_level: tracing::Level,
}

#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("state error: {0}")]
    StateError(#[from] cms::StateError),

    #[error("server failed: {0}")]
    Failed(#[from] cms::daemon::process::ServiceError),
}

#[async_trait::async_trait]
impl crate::op::Op for Serve {
    type Error = ServeError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = AppState::load(ctx.config_path.clone(), ctx.environment)?;

        let config = ServiceConfig {
            app_port: self.port.unwrap_or(state.config.app_port),
            session_expiry: time::Duration::hours(i64::from(state.config.session_expiry_hours)),
            credentials_path: state.credentials_path,
            data_path: state.data_path,
            log_level: self.log_level,
            log_dir: Some(state.log_dir),
        };

        spawn_service(&config).await?;
        Ok("server stopped".to_string())
    }
}
