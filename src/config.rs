//! Configuration
//!
//! Loaded in layers, later layers win:
//! 1. Built-in defaults
//! 2. `basic.toml` in the working directory (optional), or the file named by
//!    `--config` / `BASIC_CONFIG_PATH` (required when given)
//! 3. `BASIC_*` environment variables, `__` between path segments
//!    (`BASIC_RUNTIME__MAX_CALL_DEPTH=64`)
//!
//! A `.env` file is read into the environment first.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const DEFAULT_CONFIG_NAME: &str = "basic";
const ENV_PREFIX: &str = "BASIC";
const CONFIG_PATH_VAR: &str = "BASIC_CONFIG_PATH";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub runtime: RuntimeConfig,
    pub host: HostConfig,
}

/// Capacities and limits of one interpreter
///
/// Arenas never grow; a script that needs more fails with `OUT_OF_MEMORY`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Bytes for identifiers, string literals and runtime strings
    ///
    /// Strings a script builds at run time (`STR`, concatenation) are only
    /// reclaimed at teardown, even once no variable holds them. Long-running
    /// scripts that build strings in a loop need room for every iteration.
    pub string_bytes: usize,
    /// Micro-op slots for evaluation plans
    pub plan_ops: usize,
    pub statement_nodes: usize,
    /// Slots for function parameter lists
    pub name_slots: usize,
    pub max_symbols: usize,
    pub max_value_stack: usize,
    pub max_call_depth: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            string_bytes: 2 * 1024 * 1024,
            plan_ops: 65536,
            statement_nodes: 16384,
            name_slots: 4096,
            max_symbols: 2048,
            max_value_stack: 4096,
            max_call_depth: 256,
        }
    }
}

/// How the CLI host drives the interpreter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Upper bound on `step()` calls per tick
    pub steps_per_tick: usize,
    pub tick_rate_hz: u32,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            steps_per_tick: 100_000,
            tick_rate_hz: 60,
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Load with the default search path
    pub fn load() -> Result<Self> {
        Self::builder().build()
    }

    /// Reject settings the host cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.host.steps_per_tick == 0 {
            anyhow::bail!("host.steps_per_tick must be at least 1");
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config_path: Option<String>,
    skip_env: bool,
}

impl ConfigBuilder {
    /// Read this file instead of searching for `basic.toml`
    pub fn config_path(mut self, path: impl Into<String>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Ignore `.env` and `BASIC_*` variables
    pub fn skip_env(mut self) -> Self {
        self.skip_env = true;
        self
    }

    pub fn build(self) -> Result<Config> {
        if !self.skip_env {
            dotenvy::dotenv().ok();
        }

        let path = match self.config_path {
            Some(path) => Some(path),
            None if !self.skip_env => std::env::var(CONFIG_PATH_VAR).ok(),
            None => None,
        };

        let mut builder = ::config::Config::builder();
        builder = match &path {
            Some(path) => builder.add_source(::config::File::with_name(path).required(true)),
            None => builder.add_source(::config::File::with_name(DEFAULT_CONFIG_NAME).required(false)),
        };

        if !self.skip_env {
            builder = builder.add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );
        }

        let config = builder
            .build()
            .context("Failed to load configuration")?
            .try_deserialize::<Config>()
            .context("Invalid configuration")?;

        config.validate()?;
        Ok(config)
    }
}
