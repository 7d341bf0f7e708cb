use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub cloudinary: CloudinaryConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Credentials for the remote media host. All three values must be
/// present for uploads to work; a partial set leaves the gateway
/// disabled and file-bearing routes fail per-call instead of at boot.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct CloudinaryConfig {
    pub cloud_name: Option<String>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
}

impl CloudinaryConfig {
    pub fn is_complete(&self) -> bool {
        self.cloud_name.is_some() && self.api_key.is_some() && self.api_secret.is_some()
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 9000)?
            .set_default("database.url", "sqlite://outreach.db")?
            .set_default("database.max_connections", 10)?

            // Add config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))

            // Add environment variables (with OUTREACH__ prefix, double underscore separates levels)
            .add_source(Environment::with_prefix("OUTREACH").separator("__"))

            .build()?;

        config.try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 9000,
            },
            database: DatabaseConfig {
                url: "sqlite://outreach.db".to_string(),
                max_connections: 10,
            },
            cloudinary: CloudinaryConfig::default(),
        }
    }
}
