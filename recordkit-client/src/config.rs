//! Container configuration.

use crate::error::{ClientError, ClientResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the container's databases operations target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatabaseScope {
    /// Records owned by the signed-in user.
    #[default]
    Private,
    /// Records readable by every user of the app.
    Public,
    /// Records other users shared with the signed-in user.
    Shared,
}

impl fmt::Display for DatabaseScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DatabaseScope::Private => "private",
            DatabaseScope::Public => "public",
            DatabaseScope::Shared => "shared",
        })
    }
}

/// Identifies the remote container and database a client talks to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerConfig {
    /// Container identifier, e.g. `com.example.app`.
    pub container_id: String,
    #[serde(default)]
    pub database: DatabaseScope,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            container_id: "com.recordkit.container".to_string(),
            database: DatabaseScope::Private,
        }
    }
}

impl ContainerConfig {
    pub fn new(container_id: impl Into<String>, database: DatabaseScope) -> Self {
        Self {
            container_id: container_id.into(),
            database,
        }
    }

    /// Parses a configuration from JSON. Missing `database` defaults to private.
    pub fn from_json(json: &str) -> ClientResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ClientError::Config(format!("invalid container config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ClientResult<()> {
        if self.container_id.trim().is_empty() {
            return Err(ClientError::Config("container_id is empty".to_string()));
        }
        Ok(())
    }
}
