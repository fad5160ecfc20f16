// src/catalog.rs
//! Item metadata collaborator. The catalogue behind it is lazy: both lookups
//! may legitimately return `None` for an item it has not cached yet, and both
//! are safe to call repeatedly.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::entry::Quality;

pub trait ItemCatalog: Send + Sync {
    fn icon_for(&self, item: &str) -> Option<String>;
    fn quality_for(&self, item: &str) -> Option<Quality>;
}

/// Mutable in-memory catalog for tests and the demo binary; items can be
/// "cached" after the fact to exercise the deferred quality backfill.
#[derive(Debug, Default)]
pub struct StaticCatalog {
    items: Mutex<HashMap<String, (Option<String>, Option<Quality>)>>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, item: &str, icon: Option<&str>, quality: Option<Quality>) {
        self.items
            .lock()
            .expect("catalog mutex poisoned")
            .insert(item.to_string(), (icon.map(str::to_string), quality));
    }
}

impl ItemCatalog for StaticCatalog {
    fn icon_for(&self, item: &str) -> Option<String> {
        self.items
            .lock()
            .expect("catalog mutex poisoned")
            .get(item)
            .and_then(|(icon, _)| icon.clone())
    }

    fn quality_for(&self, item: &str) -> Option<Quality> {
        self.items
            .lock()
            .expect("catalog mutex poisoned")
            .get(item)
            .and_then(|(_, q)| *q)
    }
}
