//! Shared types describing engine state to UI-facing code

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sync status enumeration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncStatus {
    Idle,
    Syncing,
    /// Waiting for connectivity, not an error
    Offline,
    Error(String),
}

impl SyncStatus {
    pub fn is_error(&self) -> bool {
        matches!(self, SyncStatus::Error(_))
    }
}

impl std::fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncStatus::Idle => write!(f, "idle"),
            SyncStatus::Syncing => write!(f, "syncing"),
            SyncStatus::Offline => write!(f, "waiting for connection"),
            SyncStatus::Error(e) => write!(f, "error: {}", e),
        }
    }
}

/// Observable engine state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub is_online: bool,
    pub sync_status: SyncStatus,
    pub pending_changes: u64,
    pub unresolved_conflicts: u64,
    pub last_sync_timestamp: Option<i64>,
    /// Fraction in `0.0..=1.0` per `{contentType}_{contentId}`
    pub download_progress: BTreeMap<String, f32>,
}
