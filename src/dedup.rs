// src/dedup.rs
//! Time-windowed suppression of repeat loot observations. The host emits
//! more than one structurally distinct line for a single physical pickup
//! (a generic "receive loot" line plus a bag-push line); collapsing the same
//! (actor, item) key inside a short window keeps one entry per pickup while
//! still allowing a legitimate re-pickup once the window has elapsed.

use std::collections::HashMap;

/// Age below which a repeated key is treated as a duplicate notification.
pub const DEDUP_WINDOW_SECS: f64 = 2.0;
/// Age beyond which a key may be evicted. Strictly longer than the window,
/// so a key can never be evicted while it could still suppress.
pub const DEDUP_CLEANUP_AGE_SECS: f64 = 5.0;

/// Composite (actor-or-empty, item) keys mapped to last-seen monotonic
/// seconds. Eviction is a lazy full sweep on every new observation; size is
/// bounded by the cleanup horizon and human pickup pace.
#[derive(Debug, Default)]
pub struct DedupCache {
    seen: HashMap<String, f64>,
}

impl DedupCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide admission for one observation at monotonic time `now`.
    /// Suppressed observations leave the stored timestamp untouched;
    /// admitted ones (re-)arm the key at `now`.
    pub fn should_suppress(&mut self, actor_or_empty: &str, item: &str, now: f64) -> bool {
        self.seen.retain(|_, &mut last| now - last <= DEDUP_CLEANUP_AGE_SECS);

        let key = format!("{actor_or_empty}{item}");
        if let Some(&last) = self.seen.get(&key) {
            if now - last < DEDUP_WINDOW_SECS {
                return true;
            }
        }
        self.seen.insert(key, now);
        false
    }

    pub fn clear(&mut self) {
        self.seen.clear();
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
