// src/entry.rs
//! The normalized event handed downstream, plus the recorder/display trait.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// Ordinal item rarity. `Ord` carries the minimum-quality comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Quality {
    Poor,
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Quality {
    pub fn from_index(idx: u8) -> Option<Self> {
        match idx {
            0 => Some(Self::Poor),
            1 => Some(Self::Common),
            2 => Some(Self::Uncommon),
            3 => Some(Self::Rare),
            4 => Some(Self::Epic),
            5 => Some(Self::Legendary),
            _ => None,
        }
    }
}

/// One recorded pickup. Owned by the downstream recorder after delivery; the
/// only later mutation is the scheduled quality backfill, which is why the
/// entry travels as a shared handle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LootEntry {
    pub item: String,
    pub icon: Option<String>,
    pub quality: Option<Quality>,
    pub winner: String,
    pub winner_class: Option<String>,
    pub quantity: u32,
    /// Direct pickup, as opposed to a roll win (tracked elsewhere).
    pub direct_loot: bool,
    pub ts: DateTime<Utc>,
    pub complete: bool,
}

/// Strong handle the deferred backfill keeps to the exact record it must
/// update, immune to cache eviction or history reordering.
pub type EntryHandle = Arc<Mutex<LootEntry>>;

/// Downstream recorder/display. Every call is best-effort; the board itself
/// is optional at the service level and absence is never an error.
pub trait LootBoard: Send + Sync {
    fn add_entry(&self, entry: EntryHandle);
    fn show(&self) {}
    fn refresh(&self) {}
}

/// In-memory recorder, primarily for tests and the demo binary.
#[derive(Debug, Default)]
pub struct MemoryBoard {
    entries: Mutex<Vec<EntryHandle>>,
    shows: Mutex<u32>,
    refreshes: Mutex<u32>,
}

impl MemoryBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clones every stored entry. Locks each entry handle in turn; a caller
    /// still holding a guard on one of them will deadlock.
    pub fn snapshot(&self) -> Vec<LootEntry> {
        self.entries
            .lock()
            .expect("board mutex poisoned")
            .iter()
            .map(|e| e.lock().expect("entry mutex poisoned").clone())
            .collect()
    }

    pub fn show_count(&self) -> u32 {
        *self.shows.lock().expect("board mutex poisoned")
    }

    pub fn refresh_count(&self) -> u32 {
        *self.refreshes.lock().expect("board mutex poisoned")
    }
}

impl LootBoard for MemoryBoard {
    fn add_entry(&self, entry: EntryHandle) {
        self.entries.lock().expect("board mutex poisoned").push(entry);
    }
    fn show(&self) {
        *self.shows.lock().expect("board mutex poisoned") += 1;
    }
    fn refresh(&self) {
        *self.refreshes.lock().expect("board mutex poisoned") += 1;
    }
}
