//! Configuration loading.
//!
//! Layers, lowest precedence first:
//! 1. Built-in defaults
//! 2. A TOML file: the explicit path if one is given, otherwise
//!    `repovista.toml` in the search directory when present
//! 3. `REPOVISTA_*` environment variables (e.g. `REPOVISTA_BASE_URL`)
//!
//! CLI flags are applied on top by the binary.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, DashboardResult};
use crate::rank::DEFAULT_TOP_N;
use crate::svg::Theme;

const CONFIG_FILE_NAME: &str = "repovista.toml";
const ENV_PREFIX: &str = "REPOVISTA_";

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Root URL of the analyzer backend.
    pub base_url: String,
    /// Rows shown in top-N mode.
    pub top_n: usize,
    pub log_level: LogLevel,
    pub theme: Theme,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            top_n: DEFAULT_TOP_N,
            log_level: LogLevel::default(),
            theme: Theme::Dark,
            user_agent: "repovista".to_string(),
        }
    }
}

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Builder for [`Config`].
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
    search_dir: Option<PathBuf>,
    env: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            file: None,
            search_dir: None,
            env: true,
        }
    }

    /// Load this file instead of looking for `repovista.toml`. It must exist.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Look for `repovista.toml` in `dir`.
    pub fn with_search_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.search_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Whether `REPOVISTA_*` variables are merged (default: true).
    pub fn with_env(mut self, enabled: bool) -> Self {
        self.env = enabled;
        self
    }

    pub fn load(self) -> DashboardResult<Config> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));

        if let Some(path) = self.file {
            if !path.is_file() {
                return Err(DashboardError::Config(Box::new(figment::Error::from(
                    format!("config file not found: {}", path.display()),
                ))));
            }
            figment = figment.merge(Toml::file(path));
        } else if let Some(dir) = self.search_dir {
            let candidate = dir.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                tracing::debug!(path = %candidate.display(), "using config file");
                figment = figment.merge(Toml::file(candidate));
            }
        }

        if self.env {
            figment = figment.merge(Env::prefixed(ENV_PREFIX));
        }

        let config: Config = figment.extract().map_err(Box::new)?;
        if config.top_n == 0 {
            return Err(DashboardError::Config(Box::new(figment::Error::from(
                "top_n must be at least 1".to_string(),
            ))));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn loader() -> ConfigLoader {
        ConfigLoader::new().with_env(false)
    }

    #[test]
    fn defaults_without_any_file() {
        let tmp = TempDir::new().unwrap();
        let config = loader().with_search_dir(tmp.path()).load().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.top_n, 15);
    }

    #[test]
    fn discovers_file_in_search_dir() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("repovista.toml"),
            r#"
base_url = "https://api.example.com/"
top_n = 10
theme = "light"
log_level = "debug"
"#,
        )
        .unwrap();

        let config = loader().with_search_dir(tmp.path()).load().unwrap();
        assert_eq!(config.base_url, "https://api.example.com/");
        assert_eq!(config.top_n, 10);
        assert_eq!(config.theme, Theme::Light);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.user_agent, "repovista");
    }

    #[test]
    fn explicit_file_must_exist() {
        let tmp = TempDir::new().unwrap();
        let err = loader()
            .with_file(tmp.path().join("missing.toml"))
            .load()
            .unwrap_err();
        assert!(matches!(err, DashboardError::Config(_)));
    }

    #[test]
    fn rejects_zero_top_n() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("custom.toml");
        fs::write(&path, "top_n = 0\n").unwrap();
        assert!(loader().with_file(&path).load().is_err());
    }

    #[test]
    fn rejects_unknown_theme() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("custom.toml");
        fs::write(&path, "theme = \"sepia\"\n").unwrap();
        assert!(loader().with_file(&path).load().is_err());
    }
}
