use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::cli::Cli;

pub const ENV_PREFIX: &str = "CLIMATE_API";
pub const DEFAULT_DATABASE_PATH: &str = "Resources/hawaii.sqlite";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub server: ServerSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub path: PathBuf,
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DATABASE_PATH),
            max_connections: 4,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    pub fn address(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

impl Settings {
    /// Defaults, then the optional config file, then `CLIMATE_API__*`
    /// environment variables, then command-line overrides.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("database.path", DEFAULT_DATABASE_PATH)?
            .set_default("database.max_connections", 4_i64)?
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080_i64)?;

        if let Some(path) = &cli.config {
            builder = builder.add_source(File::from(path.as_path()).required(true));
        }

        builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("database.path", cli.database.as_deref().map(path_value))?
            .set_override_option("server.host", cli.host.clone())?
            .set_override_option("server.port", cli.port.map(i64::from))?
            .build()?
            .try_deserialize()
    }
}

fn path_value(path: &Path) -> String {
    path.display().to_string()
}
