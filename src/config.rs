use std::env;
use std::path::PathBuf;

use crate::error::{AppError, Result};

pub const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0:8080";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreMode {
    /// In-memory store, optionally snapshotted to a JSON file.
    Mock { snapshot_path: Option<PathBuf> },
    Database { url: String, max_connections: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub server_address: String,
    pub store: StoreMode,
}

impl AppConfig {
    /// Reads the process environment. Call `dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_address = lookup("SERVER_ADDRESS")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.to_string());

        let mock_flag = match lookup("MOCK_MODE") {
            Some(v) => parse_bool("MOCK_MODE", &v)?,
            None => false,
        };
        let mode = lookup("STORE_MODE").unwrap_or_else(|| "database".to_string());

        let store = match (mock_flag, mode.trim().to_ascii_lowercase().as_str()) {
            (true, _) | (false, "mock") => StoreMode::Mock {
                snapshot_path: lookup("MOCK_STORE_PATH")
                    .filter(|v| !v.trim().is_empty())
                    .map(PathBuf::from),
            },
            (false, "database") => {
                let url = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()).ok_or_else(
                    || AppError::InvalidConfig("DATABASE_URL must be set".to_string()),
                )?;
                let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
                    Some(v) => v.trim().parse::<u32>().ok().filter(|n| *n > 0).ok_or_else(|| {
                        AppError::InvalidConfig(format!(
                            "DATABASE_MAX_CONNECTIONS must be a positive integer, got '{}'",
                            v
                        ))
                    })?,
                    None => DEFAULT_MAX_CONNECTIONS,
                };
                StoreMode::Database {
                    url,
                    max_connections,
                }
            }
            (false, other) => {
                return Err(AppError::InvalidConfig(format!(
                    "STORE_MODE must be 'mock' or 'database', got '{}'",
                    other
                )))
            }
        };

        Ok(AppConfig {
            server_address,
            store,
        })
    }

    pub fn is_mock(&self) -> bool {
        matches!(self.store, StoreMode::Mock { .. })
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" | "" => Ok(false),
        other => Err(AppError::InvalidConfig(format!(
            "{} must be true or false, got '{}'",
            key, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn database_mode_needs_a_url() {
        let err = config(&[]).unwrap_err();
        assert!(matches!(err, AppError::InvalidConfig(_)));

        let cfg = config(&[("DATABASE_URL", "mysql://root@localhost/shifts")]).unwrap();
        assert_eq!(cfg.server_address, DEFAULT_SERVER_ADDRESS);
        assert_eq!(
            cfg.store,
            StoreMode::Database {
                url: "mysql://root@localhost/shifts".into(),
                max_connections: DEFAULT_MAX_CONNECTIONS,
            }
        );
    }

    #[test]
    fn mock_mode_from_either_variable() {
        let cfg = config(&[("STORE_MODE", "mock"), ("MOCK_STORE_PATH", "/tmp/mock.json")]).unwrap();
        assert_eq!(
            cfg.store,
            StoreMode::Mock {
                snapshot_path: Some(PathBuf::from("/tmp/mock.json"))
            }
        );

        let cfg = config(&[("MOCK_MODE", "true"), ("STORE_MODE", "database")]).unwrap();
        assert!(cfg.is_mock());
    }

    #[test]
    fn rejects_bad_values() {
        assert!(config(&[("STORE_MODE", "cloud")]).is_err());
        assert!(config(&[("MOCK_MODE", "maybe")]).is_err());
        assert!(config(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("DATABASE_MAX_CONNECTIONS", "0")
        ])
        .is_err());
    }

    #[test]
    fn custom_server_address() {
        let cfg = config(&[("STORE_MODE", "mock"), ("SERVER_ADDRESS", "127.0.0.1:9000")]).unwrap();
        assert_eq!(cfg.server_address, "127.0.0.1:9000");
    }
}
