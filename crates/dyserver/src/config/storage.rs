//! Storage backend selection.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which ConfigStore backend to use; chosen once at start-up
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StorageConfig {
    /// Nothing is persisted
    Memory,
    /// One JSON file per collection under `data_dir`
    File {
        #[serde(default = "default_data_dir")]
        data_dir: PathBuf,
    },
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::File {
            data_dir: default_data_dir(),
        }
    }
}
