//! Configuration for tdnet, read from `~/.tdnet/config.toml`.
//!
//! Every table and field is optional. Values in the `[fetch]` table may
//! reference environment variables as `${NAME}`, which keeps API keys embedded
//! in target URLs out of the file.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tdnet_fetch::{FetchConfig, ResolvedConfig};
use thiserror::Error;

#[derive(Debug, Default, Deserialize)]
pub struct TdnetConfig {
    pub app: Option<AppConfig>,
    pub fetch: Option<FetchConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_filter: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

impl TdnetConfig {
    /// Load the user's config file. `Ok(None)` when there is none.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let Some(path) = config_path() else {
            return Ok(None);
        };
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match Self::parse(&content) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    #[must_use]
    pub fn log_filter(&self) -> Option<&str> {
        self.app
            .as_ref()
            .and_then(|app| app.log_filter.as_deref())
            .filter(|filter| !filter.trim().is_empty())
    }

    /// The `[fetch]` table with `${VAR}` references expanded.
    #[must_use]
    pub fn fetch_config(&self) -> FetchConfig {
        let mut fetch = self.fetch.clone().unwrap_or_default();
        for value in [
            &mut fetch.text_url,
            &mut fetch.image_url,
            &mut fetch.user_agent,
        ]
        .into_iter()
        .flatten()
        {
            *value = expand_env_vars(value);
        }
        fetch
    }

    #[must_use]
    pub fn resolved_fetch(&self) -> ResolvedConfig {
        ResolvedConfig::from_config(&self.fetch_config())
    }
}

/// Replace `${NAME}` with the value of `NAME`, or nothing when it is unset.
///
/// An unclosed `${` is kept literally.
#[must_use]
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start + 2..].find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let var = &rest[start + 2..start + 2 + len];
        if !var.is_empty() {
            out.push_str(&env::var(var).unwrap_or_default());
        }
        rest = &rest[start + 3 + len..];
    }

    out.push_str(rest);
    out
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".tdnet").join("config.toml"))
}
