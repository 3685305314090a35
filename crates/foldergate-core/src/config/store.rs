//! Field value store configuration.

use serde::{Deserialize, Serialize};

/// Field value store configuration.
///
/// Selects where folder-field stored values are persisted: in-memory
/// (tests, demos) or PostgreSQL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldStoreConfig {
    /// Store provider: "memory" or "postgres".
    #[serde(default = "default_provider")]
    pub provider: String,
    /// PostgreSQL connection URL (postgres provider only).
    #[serde(default)]
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for FieldStoreConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            url: String::new(),
            max_connections: default_max_connections(),
        }
    }
}

fn default_provider() -> String {
    "memory".to_string()
}

fn default_max_connections() -> u32 {
    10
}
