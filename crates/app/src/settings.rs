use serde::{Deserialize, Deserializer};

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: AppSection,
    /// Defaults to an in-memory database on 127.0.0.1:3000 when no config
    /// file is present.
    #[serde(default)]
    pub server: ServerSection,
}

#[derive(Debug, Deserialize)]
pub struct AppSection {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize)]
pub struct ServerSection {
    #[serde(default)]
    pub bind: Option<String>,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub database: Database,
    /// Expected bearer token; absent means the gateway accepts any caller.
    #[serde(default)]
    pub token: Option<String>,
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: None,
            port: default_port(),
            database: Database::default(),
            token: None,
        }
    }
}

/// `"memory"` or a sqlite file path.
#[derive(Debug, Clone, Default)]
pub enum Database {
    #[default]
    Memory,
    Sqlite(String),
}

impl<'de> Deserialize<'de> for Database {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "memory" => Database::Memory,
            path => Database::Sqlite(path.to_string()),
        })
    }
}

impl Settings {
    pub fn new() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/silinda").required(false))
            .add_source(config::Environment::with_prefix("SILINDA").separator("__"));

        builder.build()?.try_deserialize()
    }
}
