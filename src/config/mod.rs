//! Layered settings: built-in defaults, then an optional TOML file, then
//! `GAMEDB_*` environment variables, e.g. `GAMEDB_PIPELINE__TOP_N=5`.
use crate::common::constants::{
    CONFIG_ENV_PREFIX, DEFAULT_CONFIG_FILE, DEFAULT_LOG_LEVEL, DEFAULT_MIN_GAMES,
    DEFAULT_SCAN_BATCH_SIZE, DEFAULT_TOP_N,
};
use crate::common::{Error, Result};
use ::config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub pipeline: PipelineSettings,
    pub storage: StorageSettings,
    /// The log level filter, unless overridden by RUST_LOG.
    pub log_level: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PipelineSettings {
    /// The number of rows kept by the ranked queries.
    pub top_n: usize,
    /// Years must have more than this many games to be ranked.
    pub min_games: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// The number of tuples buffered per table scan batch.
    pub scan_batch_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pipeline: PipelineSettings {
                top_n: DEFAULT_TOP_N,
                min_games: DEFAULT_MIN_GAMES,
            },
            storage: StorageSettings {
                scan_batch_size: DEFAULT_SCAN_BATCH_SIZE,
            },
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Settings {
    /// Loads settings. If a path is given the file must exist, otherwise
    /// `gamedb.toml` in the working directory is used if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };
        Self::load_from(file.format(FileFormat::Toml))
    }

    fn load_from<F>(file: F) -> Result<Self>
    where
        F: ::config::Source + Send + Sync + 'static,
    {
        let defaults = Self::default();
        let settings: Self = Config::builder()
            .set_default("pipeline.top_n", defaults.pipeline.top_n as i64)?
            .set_default("pipeline.min_games", defaults.pipeline.min_games as i64)?
            .set_default("storage.scan_batch_size", defaults.storage.scan_batch_size as i64)?
            .set_default("log_level", defaults.log_level)?
            .add_source(file)
            .add_source(
                Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        log::debug!("loaded settings: {settings:?}");
        Ok(settings)
    }

    /// Checks that the settings are usable.
    pub fn validate(&self) -> Result<()> {
        if self.pipeline.top_n == 0 {
            return Err(Error::Config("pipeline.top_n must be positive".into()));
        }
        if self.storage.scan_batch_size == 0 {
            return Err(Error::Config("storage.scan_batch_size must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_file_overrides_defaults() {
        let file = write_config("log_level = \"debug\"\n[pipeline]\ntop_n = 5\n");
        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.pipeline.top_n, 5);
        assert_eq!(settings.pipeline.min_games, DEFAULT_MIN_GAMES);
        assert_eq!(settings.log_level, "debug");
    }

    #[test]
    fn test_env_overrides_file() {
        let file = write_config("[storage]\nscan_batch_size = 10\n");
        std::env::set_var("GAMEDB_STORAGE__SCAN_BATCH_SIZE", "7");
        let settings = Settings::load(Some(file.path()));
        std::env::remove_var("GAMEDB_STORAGE__SCAN_BATCH_SIZE");
        assert_eq!(settings.unwrap().storage.scan_batch_size, 7);
    }

    #[test]
    fn test_invalid_settings() {
        let missing = Settings::load(Some(Path::new("/nonexistent/gamedb.toml")));
        assert!(matches!(missing, Err(Error::Config(_))));

        let file = write_config("[pipeline]\ntop_n = 0\n");
        assert!(matches!(Settings::load(Some(file.path())), Err(Error::Config(_))));

        let file = write_config("[pipeline]\ntop_n = \"many\"\n");
        assert!(Settings::load(Some(file.path())).is_err());
    }
}
