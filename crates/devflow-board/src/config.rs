/*
[INPUT]:  Built-in defaults, optional YAML file, DEVFLOW__* environment variables
[OUTPUT]: Layered application configuration
[POS]:    Configuration layer - backend, auth, ui and logging settings
[UPDATE]: When adding new configuration options
*/

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use devflow_adapter::ClientConfig;
use serde::{Deserialize, Serialize};

use crate::error::{BoardError, Result};

const ENV_PREFIX: &str = "DEVFLOW";
const APP_DIR: &str = "devflow";
const CONFIG_FILE: &str = "config.yaml";

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub auth: AuthConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    /// Hosted store over HTTP
    #[default]
    Remote,
    /// In-process demo data
    Memory,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct BackendConfig {
    pub mode: BackendMode,
    /// Project URL of the hosted store, e.g. https://xyz.supabase.co
    pub url: String,
    /// Public (anon) API key
    pub anon_key: String,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            mode: BackendMode::Remote,
            url: String::new(),
            anon_key: String::new(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

impl BackendConfig {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct AuthConfig {
    /// E-mail offered as default at the login prompt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DefaultView {
    #[default]
    Board,
    List,
    Stats,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    pub default_view: DefaultView,
    /// Redraw interval of the terminal UI
    pub tick_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_view: DefaultView::Board,
            tick_ms: 250,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Also write logs to this file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

/// Command-line values; they win over every other layer.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub memory: bool,
    pub log_level: Option<String>,
}

impl AppConfig {
    /// Layer defaults, the YAML file (explicit path or the default location
    /// when present), `DEVFLOW__SECTION__KEY` variables and `overrides`.
    pub fn load(path: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let defaults = Config::try_from(&AppConfig::default()).map_err(config_error)?;
        let mut builder = Config::builder().add_source(defaults);

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(BoardError::Config(format!(
                        "config file {} does not exist",
                        path.display()
                    )));
                }
                builder = builder.add_source(File::from(path).format(FileFormat::Yaml));
            }
            None => {
                if let Some(default_path) = default_config_path().filter(|p| p.exists()) {
                    builder = builder.add_source(File::from(default_path).format(FileFormat::Yaml));
                }
            }
        }

        let config: AppConfig = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("backend.mode", overrides.memory.then_some("memory"))
            .and_then(|builder| {
                builder.set_override_option("logging.level", overrides.log_level.clone())
            })
            .and_then(|builder| builder.build())
            .and_then(Config::try_deserialize)
            .map_err(config_error)?;

        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file only, without environment overrides
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|err| BoardError::Config(format!("read {}: {err}", path.display())))?;
        let config: Self = serde_yaml::from_str(&content)
            .map_err(|err| BoardError::Config(format!("parse {}: {err}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|err| BoardError::Config(err.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.ui.tick_ms == 0 {
            return Err(BoardError::Config("ui.tick_ms must be positive".to_string()));
        }
        if self.backend.timeout_secs == 0 {
            return Err(BoardError::Config("backend.timeout_secs must be positive".to_string()));
        }
        if self.backend.mode == BackendMode::Remote {
            if self.backend.url.trim().is_empty() {
                return Err(BoardError::Config(
                    "backend.url is required in remote mode (run `devflow init` or pass --memory)"
                        .to_string(),
                ));
            }
            if self.backend.anon_key.trim().is_empty() {
                return Err(BoardError::Config(
                    "backend.anon_key is required in remote mode".to_string(),
                ));
            }
        }
        Ok(())
    }
}

fn config_error(err: config::ConfigError) -> BoardError {
    BoardError::Config(err.to_string())
}

/// `<config dir>/devflow/config.yaml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

/// Where the signed-in session is kept between runs
pub fn session_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use uuid::Uuid;

    fn temp_yaml(content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("devflow-config-{}.yaml", Uuid::new_v4()));
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn defaults_need_a_backend_in_remote_mode() {
        let config = AppConfig::default();
        assert_eq!(config.ui.tick_ms, 250);
        assert_eq!(config.logging.level, "info");
        assert!(matches!(config.validate(), Err(BoardError::Config(_))));
    }

    #[test]
    fn memory_mode_needs_no_backend() {
        let mut config = AppConfig::default();
        config.backend.mode = BackendMode::Memory;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn yaml_file_overrides_defaults() {
        let path = temp_yaml(
            "backend:\n  url: https://example.supabase.co\n  anon_key: anon\nui:\n  default_view: stats\n",
        );
        let config = AppConfig::load(Some(&path), &Overrides::default()).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(config.backend.url, "https://example.supabase.co");
        assert_eq!(config.backend.timeout_secs, 30);
        assert_eq!(config.ui.default_view, DefaultView::Stats);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let path = std::env::temp_dir().join(format!("devflow-missing-{}.yaml", Uuid::new_v4()));
        assert!(matches!(AppConfig::load(Some(&path), &Overrides::default()), Err(BoardError::Config(_))));
    }

    #[test]
    fn command_line_overrides_win() {
        let path = temp_yaml("logging:\n  level: debug\n");
        let overrides = Overrides {
            memory: true,
            log_level: Some("warn".to_string()),
        };
        let config = AppConfig::load(Some(&path), &overrides).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(config.backend.mode, BackendMode::Memory);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn yaml_roundtrip_through_init_format() {
        let mut config = AppConfig::default();
        config.backend.url = "https://example.supabase.co".to_string();
        config.backend.anon_key = "anon".to_string();
        config.auth.email = Some("ana@example.com".to_string());

        let path = temp_yaml(&config.to_yaml().unwrap());
        let loaded = AppConfig::from_file(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
