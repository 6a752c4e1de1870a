//! Shared configuration and status types for campus-sync
//!
//! Kept separate from the engine so that a UI process can read settings and
//! render engine status without linking the sync machinery.

pub mod config;
pub mod types;

// Re-export main types
pub use config::{ConflictPolicy, ProjectConfig, Settings};
pub use types::{EngineStatus, SyncStatus};
