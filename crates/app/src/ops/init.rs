use clap::Args;

use cms::{AppConfig, AppState};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Port the server listens on
    #[arg(long, default_value_t = 4567)]
    pub port: u16,

    /// Hours of inactivity before a session is dropped
    #[arg(long, default_value_t = 24 * 7, value_parser = clap::value_parser!(u32).range(1..))]
    pub session_expiry_hours: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] cms::StateError),
}

#[async_trait::async_trait]
impl crate::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let config = AppConfig {
            app_port: self.port,
            session_expiry_hours: self.session_expiry_hours,
        };

        let state = AppState::init(ctx.config_path.clone(), Some(config), ctx.environment)?;

        let output = format!(
            "Initialized cms directory at: {}\n\
             - Config: {}\n\
             - Documents: {}\n\
             - Credentials: {}\n\
             - Logs: {}\n\
             - Port: {}",
            state.cms_dir.display(),
            state.config_path.display(),
            state.data_path.display(),
            state.credentials_path.display(),
            state.log_dir.display(),
            state.config.app_port,
        );

        Ok(output)
    }
}
