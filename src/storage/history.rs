//! Conversation history storage
//!
//! Saved conversations are keyed by the owning user's email. The file
//! store keeps one JSON document per record in the application data
//! directory; the in-memory store backs tests and ephemeral setups.

use std::fs;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::storage::{get_data_dir, StorageError};
use crate::types::message::Message;
use crate::types::role::ExpertRole;

/// A saved conversation snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatHistoryRecord {
    /// Record identifier; re-saves under the same id overwrite
    pub id: Uuid,
    /// Email of the owning user
    pub owner: String,
    /// Short title derived from the first user message
    pub title: String,
    /// Role the conversation was held under
    pub role: ExpertRole,
    /// Full message sequence at save time
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Keyed persistence of past conversations
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Insert or overwrite a record under its id
    async fn save(&self, record: &ChatHistoryRecord) -> Result<(), StorageError>;

    /// All records owned by `owner`, most recently updated first
    async fn load_all(&self, owner: &str) -> Result<Vec<ChatHistoryRecord>, StorageError>;
}

/// History store writing one JSON file per record
pub struct FileHistoryStore {
    dir: PathBuf,
}

impl FileHistoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at the platform data directory
    pub fn default_location() -> Result<Self, StorageError> {
        Ok(Self::new(get_data_dir()?.join("history")))
    }

    fn record_path(&self, id: Uuid) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }
}

#[async_trait]
impl HistoryStore for FileHistoryStore {
    async fn save(&self, record: &ChatHistoryRecord) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(record)?;
        fs::write(self.record_path(record.id), json)?;
        tracing::debug!("saved conversation {} for {}", record.id, record.owner);
        Ok(())
    }

    async fn load_all(&self, owner: &str) -> Result<Vec<ChatHistoryRecord>, StorageError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let json = fs::read_to_string(&path)?;
            match serde_json::from_str::<ChatHistoryRecord>(&json) {
                Ok(record) if record.owner == owner => records.push(record),
                Ok(_) => {}
                Err(e) => {
                    // Skip unreadable records rather than failing the whole listing
                    tracing::warn!("skipping corrupt history record {}: {}", path.display(), e);
                }
            }
        }

        records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(records)
    }
}

/// In-memory history store
#[derive(Default)]
pub struct MemoryHistoryStore {
    records: DashMap<Uuid, ChatHistoryRecord>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn save(&self, record: &ChatHistoryRecord) -> Result<(), StorageError> {
        self.records.insert(record.id, record.clone());
        Ok(())
    }

    async fn load_all(&self, owner: &str) -> Result<Vec<ChatHistoryRecord>, StorageError> {
        let mut records: Vec<ChatHistoryRecord> = self
            .records
            .iter()
            .filter(|entry| entry.value().owner == owner)
            .map(|entry| entry.value().clone())
            .collect();
        records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(records)
    }
}
