use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_DATABASE_NAME: &str = "counsel";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ApiConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub cors: Option<CorsConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub name: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: get_default_db_path(),
            name: DEFAULT_DATABASE_NAME.to_string(),
        }
    }
}

/// `"*"` in `allowed_origins` allows any origin
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Daily rolling log files are written here when set
    pub directory: Option<PathBuf>,
    /// Fallback filter directive when RUST_LOG is unset
    pub level: Option<String>,
}

impl ApiConfig {
    /// Loads the config file (creating a default one if needed), then applies
    /// `PORT`, `DATABASE_URL` and `DATABASE_NAME` from the environment.
    pub fn load(config_path: Option<PathBuf>) -> Result<(Self, PathBuf), ConfigError> {
        let config_path = config_path.unwrap_or_else(get_config_path);

        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    ConfigError::Message(format!("Failed to create config directory: {e}"))
                })?;
            }
        }

        // Create default config file if it doesn't exist
        if !config_path.exists() {
            std::fs::write(&config_path, default_config_file()).map_err(|e| {
                ConfigError::Message(format!("Failed to write default config: {e}"))
            })?;
        }

        let mut config = Self::from_file(&config_path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.expand_paths();

        Ok((config, config_path))
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path))
            .build()?
            .try_deserialize()
    }

    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.server.port = port.trim().parse().map_err(|_| {
                ConfigError::Message(format!("PORT must be a valid port number, got '{port}'"))
            })?;
        }
        if let Some(url) = lookup("DATABASE_URL").filter(|v| !v.is_empty()) {
            self.database.path = PathBuf::from(url.strip_prefix("sqlite://").unwrap_or(&url));
        }
        if let Some(name) = lookup("DATABASE_NAME").filter(|v| !v.is_empty()) {
            self.database.name = name;
        }
        Ok(())
    }

    fn expand_paths(&mut self) {
        self.database.path = expand_tilde(&self.database.path);
        if let Some(dir) = self.logging.as_mut().and_then(|l| l.directory.as_mut()) {
            *dir = expand_tilde(dir);
        }
    }

    pub fn cors_allows_any_origin(&self) -> bool {
        match &self.cors {
            Some(cors) => cors.allowed_origins.iter().any(|o| o == "*"),
            None => true,
        }
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.server.host.clone(), self.server.port)
    }
}

fn expand_tilde(path: &Path) -> PathBuf {
    if path.starts_with("~") {
        if let Some(home) = home::home_dir() {
            let path_str = path.to_string_lossy();
            let expanded = path_str.replacen('~', &home.to_string_lossy(), 1);
            return PathBuf::from(expanded);
        }
    }
    path.to_path_buf()
}

fn default_config_file() -> String {
    format!(
        r#"
[server]
host = "0.0.0.0"
port = {port}

[database]
path = '{path}'
name = "{name}"

[cors]
allowed_origins = ["*"]

[logging]
# directory = "~/.local/share/counsel/logs"
# level = "info"
"#,
        port = DEFAULT_PORT,
        path = get_default_db_path().display(),
        name = DEFAULT_DATABASE_NAME,
    )
}

fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("counsel/api.toml")
    } else {
        PathBuf::from("api.toml")
    }
}

fn get_default_db_path() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        data_dir.join("counsel/counsel.db")
    } else {
        PathBuf::from("counsel.db")
    }
}
