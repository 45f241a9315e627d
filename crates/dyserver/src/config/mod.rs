//! Configuration types for dyserver.

mod listen;
mod storage;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use listen::{AdminConfig, ListenConfig};
pub use storage::StorageConfig;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Listener for mocked endpoints
    #[serde(default)]
    pub listen: ListenConfig,
    /// Listener for the admin API
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    /// Seed for random response selection; unset draws from OS entropy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub random_seed: Option<u64>,
}

impl ServerConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let contents = std::fs::read_to_string(path)?;
        let config: ServerConfig = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.admin.enabled
            && self.admin.port == self.listen.port
            && self.admin.port != 0
            && self.admin.host == self.listen.host
        {
            anyhow::bail!(
                "Admin API and mock listener cannot share {}:{}",
                self.listen.host,
                self.listen.port
            );
        }

        if let StorageConfig::File { ref data_dir } = self.storage {
            if data_dir.as_os_str().is_empty() {
                anyhow::bail!("storage.data_dir must not be empty for the file backend");
            }
        }

        Ok(())
    }
}
