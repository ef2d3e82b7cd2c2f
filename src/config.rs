//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults (everything unset, `ssl = false`)
//! 2. Config file: `./xldc.{toml,yaml,json,...}` or the path given with `--config`
//! 3. Environment variables: `XLDC_*` prefix
//! 4. Command line flags that were explicitly given

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::ConnectionProfile;

/// Base name of the config file searched in the working directory.
pub const CONFIG_NAME: &str = "xldc";

/// Prefix of environment variable overrides, e.g. `XLDC_HOST`.
pub const ENV_PREFIX: &str = "XLDC";

const REDACTED: &str = "********";

/// Raw connection settings after merging all layers, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub username: Option<String>,
    pub password: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub context: Option<String>,
    pub ssl: bool,
}

/// Flag values from the command line.
///
/// A flag only overrides lower layers when it carries a value: non-empty
/// strings, a non-zero port, `ssl` switched on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagOverrides {
    pub username: Option<String>,
    pub password: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub context: Option<String>,
    pub ssl: bool,
}

/// Builds [`Settings`] from config file, environment and flags.
#[derive(Debug, Clone)]
pub struct SettingsLoader {
    search_dir: PathBuf,
    config_file: Option<PathBuf>,
    overrides: FlagOverrides,
    env: Option<config::Map<String, String>>,
}

impl SettingsLoader {
    /// Loader searching `search_dir` for `xldc.*`.
    pub fn new(search_dir: impl Into<PathBuf>) -> Self {
        Self {
            search_dir: search_dir.into(),
            config_file: None,
            overrides: FlagOverrides::default(),
            env: None,
        }
    }

    /// Use this file instead of searching; it must exist.
    pub fn config_file(mut self, path: Option<PathBuf>) -> Self {
        self.config_file = path;
        self
    }

    pub fn overrides(mut self, overrides: FlagOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Replace the process environment with `vars` (for testing).
    pub fn env_source(mut self, vars: config::Map<String, String>) -> Self {
        self.env = Some(vars);
        self
    }

    /// Directory searched for `xldc.*`, also where `config init` writes.
    pub fn search_dir(&self) -> &Path {
        &self.search_dir
    }

    /// Path of the file searched when no explicit config file is given.
    pub fn default_config_stem(&self) -> PathBuf {
        self.search_dir.join(CONFIG_NAME)
    }

    pub fn load(&self) -> ApplicationResult<Settings> {
        let mut builder = Config::builder();

        // 1. Config file
        match &self.config_file {
            Some(path) => {
                info!("Using config file: {}", path.display());
                builder = builder.add_source(File::from(path.as_path()).required(true));
            }
            None => {
                let stem = self.default_config_stem();
                debug!("load: searching config {}.*", stem.display());
                builder = builder
                    .add_source(File::with_name(&stem.to_string_lossy()).required(false));
            }
        }

        // 2. Environment (replaces file values); values stay strings until deserialized
        builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).source(self.env.clone()));

        // 3. Explicit flags (replace everything)
        let flags = &self.overrides;
        builder = builder
            .set_override_option("username", non_empty(&flags.username))
            .map_err(config_err)?
            .set_override_option("password", non_empty(&flags.password))
            .map_err(config_err)?
            .set_override_option("host", non_empty(&flags.host))
            .map_err(config_err)?
            .set_override_option("port", flags.port.filter(|p| *p != 0).map(i64::from))
            .map_err(config_err)?
            .set_override_option("context", non_empty(&flags.context))
            .map_err(config_err)?
            .set_override_option("ssl", flags.ssl.then_some(true))
            .map_err(config_err)?;

        let config = builder.build().map_err(config_err)?;
        config.try_deserialize().map_err(config_err)
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.clone().filter(|v| !v.trim().is_empty())
}

impl Settings {
    /// Validate into a connection profile.
    ///
    /// Reports the first missing setting in the order username, password,
    /// host, port. A missing context falls back to `/` with a warning.
    pub fn resolve(&self) -> ApplicationResult<ConnectionProfile> {
        let profile = ConnectionProfile::resolve(
            self.username.as_deref(),
            self.password.as_deref(),
            self.host.as_deref(),
            self.port,
            self.context.as_deref(),
            self.ssl,
        )?;
        if self
            .context
            .as_deref()
            .map_or(true, |c| c.trim().is_empty())
        {
            warn!("No context set, using /");
        }
        debug!("resolve: {:?}", profile);
        Ok(profile)
    }

    /// Show the effective configuration as TOML, password redacted.
    pub fn to_toml(&self) -> ApplicationResult<String> {
        let mut shown = self.clone();
        if shown.password.is_some() {
            shown.password = Some(REDACTED.to_string());
        }
        toml::to_string_pretty(&shown).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# xldc configuration
#
# Sources (by precedence, lowest to highest):
#   File:  ./xldc.toml (or --config <path>)
#   Env:   XLDC_USERNAME, XLDC_PASSWORD, XLDC_HOST, XLDC_PORT, XLDC_CONTEXT, XLDC_SSL
#   Flags: --username, --password, --host, --port, --context, --ssl

username = "admin"
# password = ""
host = "localhost"
port = 4516

# Context root XL Deploy runs under (default: /)
# context = "/"

# Use https instead of http
ssl = false
"#
        .to_string()
    }
}

/// Path `config init` writes to.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(format!("{CONFIG_NAME}.toml"))
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
