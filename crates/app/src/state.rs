use std::{fs, path::PathBuf};

use serde::{Deserialize, Serialize};

pub const APP_NAME: &str = "cms";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const CREDENTIALS_FILE_NAME: &str = "users.toml";
pub const DATA_DIR_NAME: &str = "data";
pub const LOG_DIR_NAME: &str = "logs";
pub const TEST_DIR_NAME: &str = "test";

/// Environment variable selecting the data layout, see [`Environment`]
pub const ENVIRONMENT_VAR: &str = "CMS_ENV";

/// Which set of documents and credentials to serve.
///
/// `CMS_ENV=test` keeps everything under `<cms dir>/test/` so test runs
/// never touch real documents or accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Default,
    Test,
}

impl Environment {
    pub fn from_env() -> Self {
        Self::parse(std::env::var(ENVIRONMENT_VAR).ok().as_deref())
    }

    fn parse(value: Option<&str>) -> Self {
        match value {
            Some("test") => Self::Test,
            _ => Self::Default,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Port for the HTTP server
    #[serde(default = "default_app_port")]
    pub app_port: u16,
    /// Sessions expire after this many hours without a request, at least 1
    #[serde(default = "default_session_expiry_hours")]
    pub session_expiry_hours: u32,
}

fn default_app_port() -> u16 {
    4567
}

fn default_session_expiry_hours() -> u32 {
    24 * 7
}

impl AppConfig {
    fn check(&self) -> Result<(), StateError> {
        if self.session_expiry_hours == 0 {
            return Err(StateError::InvalidConfig(
                "session_expiry_hours must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_port: default_app_port(),
            session_expiry_hours: default_session_expiry_hours(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the cms directory (~/.cms)
    pub cms_dir: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Path to the credential store for the selected environment
    pub credentials_path: PathBuf,
    /// Path to the document directory for the selected environment
    pub data_path: PathBuf,
    /// Directory for rolling log files
    pub log_dir: PathBuf,
    pub environment: Environment,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the cms directory path (custom or default ~/.cms)
    pub fn cms_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Initialize a new cms state directory
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
        environment: Environment,
    ) -> Result<Self, StateError> {
        let cms_dir = Self::cms_dir(custom_path)?;
        let config_path = cms_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            return Err(StateError::AlreadyInitialized);
        }

        fs::create_dir_all(&cms_dir)?;

        let config = config.unwrap_or_default();
        config.check()?;
        let config_toml = toml::to_string_pretty(&config)?;
        fs::write(&config_path, config_toml)?;

        let state = Self::with_layout(cms_dir, config_path, config, environment);

        fs::create_dir_all(&state.data_path)?;
        fs::create_dir_all(&state.log_dir)?;
        if !state.credentials_path.exists() {
            fs::write(&state.credentials_path, "")?;
        }

        Ok(state)
    }

    /// Load existing state from the cms directory
    pub fn load(custom_path: Option<PathBuf>, environment: Environment) -> Result<Self, StateError> {
        let cms_dir = Self::cms_dir(custom_path)?;

        if !cms_dir.exists() {
            return Err(StateError::NotInitialized);
        }

        let config_path = cms_dir.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            return Err(StateError::MissingFile(CONFIG_FILE_NAME.to_string()));
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;
        config.check()?;

        Ok(Self::with_layout(cms_dir, config_path, config, environment))
    }

    fn with_layout(
        cms_dir: PathBuf,
        config_path: PathBuf,
        config: AppConfig,
        environment: Environment,
    ) -> Self {
        let env_dir = match environment {
            Environment::Default => cms_dir.clone(),
            Environment::Test => cms_dir.join(TEST_DIR_NAME),
        };

        Self {
            credentials_path: env_dir.join(CREDENTIALS_FILE_NAME),
            data_path: env_dir.join(DATA_DIR_NAME),
            log_dir: cms_dir.join(LOG_DIR_NAME),
            cms_dir,
            config_path,
            environment,
            config,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("cms directory not initialized. Run 'cms init' first")]
    NotInitialized,

    #[error("cms directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parse() {
        assert_eq!(Environment::parse(Some("test")), Environment::Test);
        assert_eq!(Environment::parse(Some("production")), Environment::Default);
        assert_eq!(Environment::parse(None), Environment::Default);
    }

    #[test]
    fn test_init_then_load() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let cms_dir = temp_dir.path().join("cms");

        let state = AppState::init(Some(cms_dir.clone()), None, Environment::Default).unwrap();
        assert_eq!(state.config, AppConfig::default());
        assert!(state.data_path.is_dir());
        assert!(state.credentials_path.is_file());

        let loaded = AppState::load(Some(cms_dir.clone()), Environment::Default).unwrap();
        assert_eq!(loaded.config, state.config);
        assert_eq!(loaded.data_path, cms_dir.join(DATA_DIR_NAME));

        assert!(matches!(
            AppState::init(Some(cms_dir), None, Environment::Default),
            Err(StateError::AlreadyInitialized)
        ));
    }

    #[test]
    fn test_test_environment_layout() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let cms_dir = temp_dir.path().to_path_buf();

        let state = AppState::init(Some(cms_dir.clone()), None, Environment::Test).unwrap();
        assert_eq!(state.data_path, cms_dir.join("test").join("data"));
        assert_eq!(
            state.credentials_path,
            cms_dir.join("test").join("users.toml")
        );
        assert_eq!(state.config_path, cms_dir.join("config.toml"));
    }

    #[test]
    fn test_load_uninitialized() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");
        assert!(matches!(
            AppState::load(Some(missing), Environment::Default),
            Err(StateError::NotInitialized)
        ));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AppConfig = toml::from_str("app_port = 8080").unwrap();
        assert_eq!(config.app_port, 8080);
        assert_eq!(config.session_expiry_hours, 24 * 7);
    }

    #[test]
    fn test_session_expiry_must_be_positive() {
        assert!(toml::from_str::<AppConfig>("session_expiry_hours = -1").is_err());

        let temp_dir = tempfile::TempDir::new().unwrap();
        let cms_dir = temp_dir.path().to_path_buf();
        AppState::init(Some(cms_dir.clone()), None, Environment::Default).unwrap();
        fs::write(cms_dir.join(CONFIG_FILE_NAME), "session_expiry_hours = 0").unwrap();

        assert!(matches!(
            AppState::load(Some(cms_dir), Environment::Default),
            Err(StateError::InvalidConfig(_))
        ));
    }
}
