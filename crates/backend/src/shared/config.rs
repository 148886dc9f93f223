use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub uploads: UploadsConfig,
    #[serde(default)]
    pub sales: SalesConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 3000 }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

/// Where uploaded product images are written; served under `/uploads`
#[derive(Debug, Deserialize, Clone)]
pub struct UploadsConfig {
    pub dir: String,
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            dir: "target/uploads".into(),
        }
    }
}

/// Measure source of the sales report
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SalesSourceKind {
    /// Aggregate recorded sales entries
    #[default]
    Database,
    /// Synthetic numbers, for demos without data
    Mock,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SalesConfig {
    #[serde(default)]
    pub source: SalesSourceKind,
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
port = 3000

[database]
path = "target/db/app.db"

[uploads]
dir = "target/uploads"

[sales]
source = "database"
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

/// Relative paths are resolved against the executable directory
fn resolve_path(raw: &str) -> PathBuf {
    let path = Path::new(raw);
    if path.is_absolute() {
        return path.to_path_buf();
    }
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return exe_dir.join(path);
        }
    }
    PathBuf::from(raw)
}

pub fn get_database_path(config: &Config) -> PathBuf {
    resolve_path(&config.database.path)
}

pub fn get_uploads_dir(config: &Config) -> PathBuf {
    resolve_path(&config.uploads.dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config: Result<Config, _> = toml::from_str(DEFAULT_CONFIG);
        assert!(config.is_ok());
        let config = config.unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.path, "target/db/app.db");
        assert_eq!(config.uploads.dir, "target/uploads");
        assert_eq!(config.sales.source, SalesSourceKind::Database);
    }

    #[test]
    fn test_missing_sections_fall_back() {
        let config: Config = toml::from_str("[database]\npath = \"/var/lib/admin.db\"\n").unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.sales.source, SalesSourceKind::Database);
        assert_eq!(get_database_path(&config), PathBuf::from("/var/lib/admin.db"));
    }

    #[test]
    fn test_mock_source_and_unknown_source() {
        let config: Config =
            toml::from_str("[database]\npath = \"a.db\"\n[sales]\nsource = \"mock\"\n").unwrap();
        assert_eq!(config.sales.source, SalesSourceKind::Mock);

        let bad = toml::from_str::<Config>("[database]\npath = \"a.db\"\n[sales]\nsource = \"csv\"\n");
        assert!(bad.is_err());
    }
}
