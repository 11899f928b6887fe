// User Directory
// Single-slot record of the last user who logged in. Diagnostic only; the
// authoritative session lives in the browser. Process lifetime, no
// persistence, last write wins.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use super::error::AuthError;

/// Key under which the current-user record is stored
pub const CURRENT_USER_KEY: &str = "current";

/// The stored record. At most one exists at any time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryRecord {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    pub google_id: String,
    pub login_time: DateTime<Utc>,
}

impl DirectoryRecord {
    pub fn new(email: String, name: String, picture: Option<String>, google_id: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email,
            name,
            picture,
            google_id,
            login_time: Utc::now(),
        }
    }
}

/// Upsert request body; fields stay optional so a missing field reaches
/// validation instead of failing deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_id: Option<String>,
}

/// Key-value store capability for directory records.
///
/// The directory itself only ever uses [`CURRENT_USER_KEY`]; the key
/// parameter is what lets a real multi-user store slot in without touching
/// the route or controller logic.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    async fn put(&self, key: &str, record: DirectoryRecord) -> Result<(), AuthError>;
    async fn get(&self, key: &str) -> Result<Option<DirectoryRecord>, AuthError>;
    async fn delete(&self, key: &str) -> Result<(), AuthError>;
}

/// In-memory store. Overwrites are unguarded: concurrent logins race and
/// the last write wins.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    records: Mutex<HashMap<String, DirectoryRecord>>,
}

#[async_trait]
impl DirectoryStore for MemoryDirectory {
    async fn put(&self, key: &str, record: DirectoryRecord) -> Result<(), AuthError> {
        let mut records = self.records.lock().expect("directory mutex poisoned");
        records.insert(key.to_string(), record);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<DirectoryRecord>, AuthError> {
        let records = self.records.lock().expect("directory mutex poisoned");
        Ok(records.get(key).cloned())
    }

    async fn delete(&self, key: &str) -> Result<(), AuthError> {
        let mut records = self.records.lock().expect("directory mutex poisoned");
        records.remove(key);
        Ok(())
    }
}
