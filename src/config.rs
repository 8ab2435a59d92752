//! Configuration for RecordKV
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::snapshot::DEFAULT_MAX_FRAME_SIZE;

/// Main configuration for a RecordKV instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory for the snapshot file
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── storage.db       (snapshot written at close)
    ///     ├── storage.db.tmp   (only while a close is in progress)
    ///     └── storage.db.corrupt (a snapshot that failed to restore)
    pub data_dir: PathBuf,

    /// File name of the snapshot inside `data_dir`
    pub snapshot_file_name: String,

    // -------------------------------------------------------------------------
    // Snapshot Configuration
    // -------------------------------------------------------------------------
    /// Largest payload a single snapshot frame may declare (in bytes)
    pub max_frame_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./recordkv_data"),
            snapshot_file_name: "storage.db".to_string(),
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Full path of the snapshot file
    pub fn snapshot_path(&self) -> PathBuf {
        self.data_dir.join(&self.snapshot_file_name)
    }

    /// Path used while a new snapshot is being written
    pub fn snapshot_tmp_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.tmp", self.snapshot_file_name))
    }

    /// Path a snapshot is moved to when it could not be fully restored
    pub fn snapshot_corrupt_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.corrupt", self.snapshot_file_name))
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory (root for the snapshot file)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the snapshot file name
    pub fn snapshot_file_name(mut self, name: impl Into<String>) -> Self {
        self.config.snapshot_file_name = name.into();
        self
    }

    /// Set the maximum frame payload size (in bytes)
    pub fn max_frame_size(mut self, size: u32) -> Self {
        self.config.max_frame_size = size;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
