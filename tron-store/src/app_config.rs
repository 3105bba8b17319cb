use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tron_offer::generator::{DEFAULT_CAMPAIGN_ID, DEFAULT_CAMPAIGN_TITLE};
use tron_offer::GeneratorSettings;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub generator: GeneratorSettings,
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SessionConfig {
    /// Campaign file (.json or .csv) opened at start-up
    pub preload: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(Path::new("config"))
    }

    /// Layered load: built-in defaults, `default`, `$RUN_MODE`, `local`, then
    /// `TRON__*` environment variables
    pub fn load_from(dir: &Path) -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        let file = |name: &str| {
            config::File::with_name(&dir.join(name).to_string_lossy()).required(false)
        };

        let s = config::Config::builder()
            .set_default("server.port", 3000_i64)?
            .set_default("generator.campaign_id", DEFAULT_CAMPAIGN_ID)?
            .set_default("generator.campaign_title", DEFAULT_CAMPAIGN_TITLE)?
            .add_source(file("default"))
            .add_source(file(run_mode.as_str()))
            // Not checked in
            .add_source(file("local"))
            // Eg. `TRON__SERVER__PORT=8080`
            .add_source(
                config::Environment::with_prefix("TRON")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        s.try_deserialize()
    }
}
