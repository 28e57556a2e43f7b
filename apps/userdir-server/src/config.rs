//! Layered application configuration.
//!
//! Order of precedence, lowest first: built-in defaults, the YAML file given
//! with `--config`, `USERDIR__*` environment variables, CLI flags.

use std::path::Path;

use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use user_directory::DirectoryConfig;

use crate::serve::ListenAddr;

pub const ENV_PREFIX: &str = "USERDIR__";
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:33001";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub directory: DirectoryConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// `host:port` for TCP or `uds:///path/to/socket` on Unix.
    pub listen_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default filter directive, used when `RUST_LOG` is unset.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Auto,
        }
    }
}

/// Log output format.
///
/// `Auto` picks JSON when stdout is not a terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
    #[default]
    Auto,
}

impl AppConfig {
    /// Defaults, then the YAML file (if any), then `USERDIR__*` env vars.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or a value has the wrong shape.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("failed to load configuration")
    }

    pub fn apply_cli_overrides(&mut self, listen_addr: Option<&str>, verbose: u8) {
        if let Some(addr) = listen_addr {
            addr.clone_into(&mut self.server.listen_addr);
        }
        // -v info, -vv debug, -vvv trace
        let level = match verbose {
            0 => return,
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        level.clone_into(&mut self.logging.level);
    }

    /// Checks what extraction alone cannot: the listen address syntax.
    /// Seed users are checked when the directory is built.
    ///
    /// # Errors
    /// Returns an error if `server.listen_addr` does not parse.
    pub fn listen_addr(&self) -> Result<ListenAddr> {
        self.server
            .listen_addr
            .parse()
            .context("invalid server.listen_addr")
    }

    /// # Errors
    /// Returns an error if YAML serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("failed to serialize configuration to YAML")
    }
}
