// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod builder;
pub mod catalog;
pub mod classify;
pub mod config;
pub mod dedup;
pub mod entry;
pub mod identity;
pub mod patterns;
pub mod service;
pub mod templates;
pub mod timer;

// ---- Re-exports for stable public API ----
pub use crate::builder::{EntryBuilder, QUALITY_RECHECK_DELAY};
pub use crate::classify::ObservedMatch;
pub use crate::config::Settings;
pub use crate::dedup::{DedupCache, DEDUP_CLEANUP_AGE_SECS, DEDUP_WINDOW_SECS};
pub use crate::entry::{EntryHandle, LootBoard, LootEntry, Quality};
pub use crate::service::{LootService, Notification};
pub use crate::templates::TemplateSet;
