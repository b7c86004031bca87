//! Layered CLI configuration
//!
//! Defaults, then `examgrid.toml` (or `--config`), then `EXAMGRID_*`
//! environment variables, then command-line flags.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use examgrid_core::logging_facility::Profile;
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "examgrid.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
    pub db_path: PathBuf,
    /// Acting user when nobody is logged in
    pub actor: String,
    pub admins: Vec<String>,
    pub log_profile: String,
    pub probe_timeout_ms: u64,
}

impl CliConfig {
    /// # Errors
    ///
    /// An explicit `config_path` that does not exist, unparsable files,
    /// or values of the wrong type.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match config_path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };
        Config::builder()
            .set_default("db_path", ".examgrid/examgrid.db")?
            .set_default("actor", "admin")?
            .set_default("admins", vec!["admin"])?
            .set_default("log_profile", "development")?
            .set_default("probe_timeout_ms", 2000)?
            .add_source(file)
            .add_source(
                Environment::with_prefix("EXAMGRID")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("admins"),
            )
            .build()?
            .try_deserialize()
    }

    pub fn profile(&self) -> Profile {
        self.log_profile.parse().unwrap_or(Profile::Development)
    }
}
