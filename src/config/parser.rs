use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::{Path, PathBuf};

/// Environment variable overriding the store base directory
pub const HOME_ENV_VAR: &str = "DOCS_INDEXER_HOME";

/// Directory name used under the user's home when nothing else is configured
const DEFAULT_DIR_NAME: &str = ".docs_indexer";

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use docs_indexer::config::load_config;
///
/// let config = load_config(Path::new("docs-indexer.toml")).unwrap();
/// println!("Fetches in flight: {}", config.crawler.max_concurrent_fetches);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from a TOML string
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Loads the configuration file if one was given, otherwise returns defaults
pub fn load_config_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => Ok(Config::default()),
    }
}

/// Resolves the store base directory
///
/// Precedence: the explicit `[store] base-dir` value, then the
/// `DOCS_INDEXER_HOME` environment variable, then `~/.docs_indexer`.
pub fn resolve_base_dir(config: &Config) -> Result<PathBuf, ConfigError> {
    if let Some(dir) = &config.store.base_dir {
        return Ok(dir.clone());
    }

    if let Ok(dir) = std::env::var(HOME_ENV_VAR) {
        let trimmed = dir.trim();
        if !trimmed.is_empty() {
            return Ok(PathBuf::from(trimmed));
        }
    }

    let base_dirs = directories::BaseDirs::new().ok_or(ConfigError::NoHomeDir)?;
    Ok(base_dirs.home_dir().join(DEFAULT_DIR_NAME))
}
