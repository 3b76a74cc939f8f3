//! Persistent storage
//!
//! This module handles conversation history persistence and the
//! auto-save policy that decides when a snapshot is written.

pub mod autosave;
pub mod history;

use std::path::PathBuf;

use directories::ProjectDirs;
use thiserror::Error;

/// Errors from the storage layer
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Could not determine application data directory")]
    DataDirUnavailable,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Get the application data directory, creating it if needed
pub fn get_data_dir() -> Result<PathBuf, StorageError> {
    let dirs = ProjectDirs::from("", "", "plantchat").ok_or(StorageError::DataDirUnavailable)?;
    let dir = dirs.data_dir().to_path_buf();
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
