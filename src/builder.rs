// src/builder.rs
//! Entry construction: policy gate, eager metadata resolution, delivery, and
//! the one-shot deferred quality backfill.

use chrono::Utc;
use metrics::counter;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::debug;

use crate::catalog::ItemCatalog;
use crate::config::Settings;
use crate::entry::{EntryHandle, LootBoard, LootEntry};
use crate::timer::Timer;

/// Fixed delay before the single quality re-check against the catalog.
pub const QUALITY_RECHECK_DELAY: Duration = Duration::from_millis(500);

pub struct EntryBuilder {
    catalog: Arc<dyn ItemCatalog>,
    timer: Arc<dyn Timer>,
    board: Option<Arc<dyn LootBoard>>,
}

impl EntryBuilder {
    pub fn new(
        catalog: Arc<dyn ItemCatalog>,
        timer: Arc<dyn Timer>,
        board: Option<Arc<dyn LootBoard>>,
    ) -> Self {
        Self {
            catalog,
            timer,
            board,
        }
    }

    /// Build and deliver one entry, or nothing if policy says so.
    ///
    /// Unresolved quality at build time is not an error: the entry goes out
    /// immediately with quality unset and exactly one re-check is scheduled.
    /// A late-resolved quality is written into the already-delivered entry;
    /// the minimum-quality filter is never re-applied after delivery.
    pub fn build(
        &self,
        settings: &Settings,
        winner: &str,
        winner_class: Option<String>,
        item: &str,
        quantity: u32,
    ) -> Option<EntryHandle> {
        if !settings.track_direct_loot {
            return None;
        }

        let icon = self.catalog.icon_for(item);
        let quality = self.catalog.quality_for(item);

        if let Some(q) = quality {
            if q < settings.min_quality {
                debug!(target: "loot", %item, ?q, "below minimum quality, dropped");
                counter!("loot_dropped_quality_total").increment(1);
                return None;
            }
        }

        let entry: EntryHandle = Arc::new(Mutex::new(LootEntry {
            item: item.to_string(),
            icon,
            quality,
            winner: winner.to_string(),
            winner_class,
            quantity,
            direct_loot: true,
            ts: Utc::now(),
            complete: true,
        }));

        if quality.is_none() {
            self.schedule_backfill(item, entry.clone());
        }

        if let Some(board) = &self.board {
            board.add_entry(entry.clone());
            if settings.auto_show {
                board.show();
            }
        }
        counter!("loot_entries_total").increment(1);

        Some(entry)
    }

    /// The callback holds a strong handle to the one entry it may update, so
    /// it needs no lookup and survives any dedup eviction in the meantime.
    fn schedule_backfill(&self, item: &str, entry: EntryHandle) {
        let catalog = self.catalog.clone();
        let board = self.board.clone();
        let item = item.to_string();

        self.timer.after(
            QUALITY_RECHECK_DELAY,
            Box::new(move || {
                let Some(q) = catalog.quality_for(&item) else {
                    debug!(target: "loot", %item, "quality still unresolved after recheck");
                    return;
                };
                if let Ok(mut e) = entry.lock() {
                    e.quality = Some(q);
                }
                if let Some(board) = &board {
                    board.refresh();
                }
            }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;
    use crate::entry::{MemoryBoard, Quality};
    use crate::timer::ManualTimer;

    struct Rig {
        catalog: Arc<StaticCatalog>,
        timer: Arc<ManualTimer>,
        board: Arc<MemoryBoard>,
        builder: EntryBuilder,
    }

    fn rig() -> Rig {
        let catalog = Arc::new(StaticCatalog::new());
        let timer = Arc::new(ManualTimer::new());
        let board = Arc::new(MemoryBoard::new());
        let builder = EntryBuilder::new(
            catalog.clone(),
            timer.clone(),
            Some(board.clone() as Arc<dyn LootBoard>),
        );
        Rig {
            catalog,
            timer,
            board,
            builder,
        }
    }

    #[test]
    fn disabled_tracking_builds_nothing() {
        let r = rig();
        let settings = Settings {
            track_direct_loot: false,
            ..Settings::default()
        };
        assert!(r
            .builder
            .build(&settings, "Kel", None, "[Ore]", 5)
            .is_none());
        assert!(r.board.snapshot().is_empty());
        assert_eq!(r.timer.pending(), 0);
    }

    #[test]
    fn below_threshold_is_dropped_entirely() {
        let r = rig();
        r.catalog.insert("[Gray Rag]", None, Some(Quality::Common));
        let settings = Settings {
            min_quality: Quality::Rare,
            ..Settings::default()
        };
        assert!(r
            .builder
            .build(&settings, "Kel", None, "[Gray Rag]", 1)
            .is_none());
        assert!(r.board.snapshot().is_empty());
    }

    #[test]
    fn at_threshold_is_delivered() {
        let r = rig();
        r.catalog.insert("[Saber]", Some("icon/saber"), Some(Quality::Rare));
        let settings = Settings {
            min_quality: Quality::Rare,
            ..Settings::default()
        };
        let entry = r
            .builder
            .build(&settings, "Kel", Some("Rogue".into()), "[Saber]", 1)
            .unwrap();
        // Guard scoped: snapshot() below re-locks every stored entry.
        {
            let e = entry.lock().unwrap();
            assert_eq!(e.quality, Some(Quality::Rare));
            assert_eq!(e.icon.as_deref(), Some("icon/saber"));
            assert_eq!(e.winner_class.as_deref(), Some("Rogue"));
            assert!(e.complete && e.direct_loot);
        }
        assert_eq!(r.board.snapshot().len(), 1);
        // Quality was resolved eagerly; no recheck needed.
        assert_eq!(r.timer.pending(), 0);
    }

    #[test]
    fn unresolved_quality_is_backfilled_in_place() {
        let r = rig();
        let settings = Settings::default();

        // Catalogue has not cached the item yet.
        let entry = r
            .builder
            .build(&settings, "Kel", None, "[Fresh Drop]", 1)
            .unwrap();
        assert_eq!(entry.lock().unwrap().quality, None);
        assert_eq!(r.board.snapshot().len(), 1);
        assert_eq!(r.timer.delays(), vec![QUALITY_RECHECK_DELAY]);

        // The catalogue catches up before the recheck fires.
        r.catalog.insert("[Fresh Drop]", None, Some(Quality::Epic));
        r.timer.fire_all();

        // Same delivered entry, updated in place, board refreshed once,
        // still exactly one delivery.
        assert_eq!(entry.lock().unwrap().quality, Some(Quality::Epic));
        assert_eq!(r.board.snapshot().len(), 1);
        assert_eq!(r.board.refresh_count(), 1);
    }

    #[test]
    fn backfill_never_reapplies_the_quality_filter() {
        let r = rig();
        let settings = Settings {
            min_quality: Quality::Rare,
            ..Settings::default()
        };

        let entry = r
            .builder
            .build(&settings, "Kel", None, "[Late Junk]", 1)
            .unwrap();

        // Resolves below the threshold after delivery: the entry stays.
        r.catalog.insert("[Late Junk]", None, Some(Quality::Poor));
        r.timer.fire_all();

        assert_eq!(entry.lock().unwrap().quality, Some(Quality::Poor));
        assert_eq!(r.board.snapshot().len(), 1);
    }

    #[test]
    fn quality_still_unknown_leaves_entry_untouched() {
        let r = rig();
        let entry = r
            .builder
            .build(&Settings::default(), "Kel", None, "[Mystery]", 1)
            .unwrap();
        r.timer.fire_all();
        assert_eq!(entry.lock().unwrap().quality, None);
        assert_eq!(r.board.refresh_count(), 0);
    }

    #[test]
    fn absent_board_still_builds() {
        let catalog = Arc::new(StaticCatalog::new());
        let timer = Arc::new(ManualTimer::new());
        let builder = EntryBuilder::new(catalog, timer, None);
        let entry = builder.build(&Settings::default(), "Kel", None, "[X]", 2);
        assert!(entry.is_some());
    }
}
