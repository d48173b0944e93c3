use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde_derive::Deserialize;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
pub const DEFAULT_REFERER: &str = "https://manganato.com/";

#[derive(Deserialize, Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub catalog_path: PathBuf,
    pub latest_limit: usize,
    pub image_timeout_ms: u64,
    pub user_agent: String,
    pub referer: String,
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir = AppConfig::get_config_directory()
            .map_err(|err| ConfigError::Message(err.to_string()))?;

        AppConfig::from_directory(&config_dir)
    }

    /// Defaults, then `config.yml` from `config_dir`, then `MANGA_RELAY_*` env variables.
    /// A relative `catalog_path` is resolved against `config_dir`.
    pub fn from_directory(config_dir: &Path) -> Result<Self, ConfigError> {
        let mut config = Config::builder();
        if config_dir.join("config.yml").exists() {
            config = config.add_source(File::from(config_dir.join("config.yml")))
        }

        config = config.add_source(Environment::with_prefix("manga_relay"))
            .set_default("port", "3030")?
            .set_default("catalog_path", "catalog.json")?
            .set_default("latest_limit", "20")?
            .set_default("image_timeout_ms", "10000")?
            .set_default("user_agent", DEFAULT_USER_AGENT)?
            .set_default("referer", DEFAULT_REFERER)?;

        let mut app_config: AppConfig = config.build()?.try_deserialize()?;
        if app_config.catalog_path.is_relative() {
            app_config.catalog_path = config_dir.join(&app_config.catalog_path);
        }

        Ok(app_config)
    }

    pub fn image_timeout(&self) -> Duration {
        Duration::from_millis(self.image_timeout_ms)
    }

    fn get_config_directory() -> std::io::Result<PathBuf> {
        let config_dir = match env::var("MANGA_RELAY_CONF_DIR") {
            Ok(path) => PathBuf::from(path),
            Err(_) => env::current_dir()?,
        };

        fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }
}
