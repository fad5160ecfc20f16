// src/service.rs
//! Pipeline wiring and lifecycle: one inbound notification event in, at most
//! one recorded entry out. Owns the compiled matchers, the dedup cache, and
//! the monotonic clock; collaborators come in as shared trait objects.

use anyhow::Result;
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::debug;

use crate::builder::EntryBuilder;
use crate::catalog::ItemCatalog;
use crate::classify::ObservedMatch;
use crate::config::Settings;
use crate::dedup::DedupCache;
use crate::entry::{EntryHandle, LootBoard};
use crate::identity::{resolve_actor, LocalIdentity, SourceDirectory};
use crate::patterns::{self, MatcherSet};
use crate::templates::TemplateSet;
use crate::timer::Timer;

/// The single notification-type event the service subscribes to.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub source_id: Option<String>,
}

/// One-time metrics registration.
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("loot_messages_total", "Notification lines observed.");
        describe_counter!("loot_matches_total", "Lines classified as a pickup.");
        describe_counter!(
            "loot_suppressed_total",
            "Pickups suppressed as duplicates inside the dedup window."
        );
        describe_counter!("loot_entries_total", "Entries delivered downstream.");
        describe_counter!(
            "loot_dropped_quality_total",
            "Pickups dropped by the minimum-quality filter."
        );
    });
}

pub struct LootService {
    matchers: MatcherSet,
    dedup: Mutex<DedupCache>,
    settings: RwLock<Option<Settings>>,
    local: Arc<dyn LocalIdentity>,
    directory: Arc<dyn SourceDirectory>,
    builder: EntryBuilder,
    epoch: Instant,
}

impl LootService {
    /// Compile matchers and wire the collaborators. `settings = None` leaves
    /// the pipeline dormant until `set_settings` is called.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        templates: &TemplateSet,
        settings: Option<Settings>,
        local: Arc<dyn LocalIdentity>,
        directory: Arc<dyn SourceDirectory>,
        catalog: Arc<dyn ItemCatalog>,
        timer: Arc<dyn Timer>,
        board: Option<Arc<dyn LootBoard>>,
    ) -> Result<Self> {
        Ok(Self {
            matchers: patterns::compile(templates)?,
            dedup: Mutex::new(DedupCache::new()),
            settings: RwLock::new(settings),
            local,
            directory,
            builder: EntryBuilder::new(catalog, timer, board),
            epoch: Instant::now(),
        })
    }

    /// Late configuration arrival (the config store loads after the session).
    pub fn set_settings(&self, settings: Option<Settings>) {
        *self.settings.write().expect("settings lock poisoned") = settings;
    }

    /// Handle one inbound notification with the service's own clock.
    pub fn handle_notification(
        &self,
        message: &str,
        source_id: Option<&str>,
    ) -> Option<EntryHandle> {
        let now = self.epoch.elapsed().as_secs_f64();
        self.handle_at(message, source_id, now)
    }

    /// Clock-explicit variant, used directly by tests.
    ///
    /// Classification touches no mutable state; the dedup cache is the only
    /// mutation on this path and is taken behind its own lock.
    pub fn handle_at(
        &self,
        message: &str,
        source_id: Option<&str>,
        now: f64,
    ) -> Option<EntryHandle> {
        ensure_metrics_described();
        counter!("loot_messages_total").increment(1);

        // No configuration yet: the whole pipeline is a silent no-op.
        let settings = self
            .settings
            .read()
            .expect("settings lock poisoned")
            .clone()?;

        let hit = self.matchers.classify(message)?;
        counter!("loot_matches_total").increment(1);

        if self.suppress(&hit, now) {
            counter!("loot_suppressed_total").increment(1);
            debug!(target: "loot", item = %hit.item, "duplicate notification suppressed");
            return None;
        }

        let actor = resolve_actor(&hit, source_id, &*self.local, &*self.directory);
        self.builder
            .build(&settings, &actor.name, actor.class, &hit.item, hit.quantity)
    }

    /// Dedup admission keyed on the captured actor (empty for own pickups),
    /// so the burst of self lines collapses regardless of identity lookups.
    fn suppress(&self, hit: &ObservedMatch, now: f64) -> bool {
        self.dedup
            .lock()
            .expect("dedup lock poisoned")
            .should_suppress(hit.actor.as_deref().unwrap_or(""), &hit.item, now)
    }

    /// Drain the host event channel until it closes; this is the one
    /// registered handler for the notification event type. Closing the
    /// channel is the deregistration.
    pub async fn run(self: Arc<Self>, mut rx: mpsc::Receiver<Notification>) {
        while let Some(ev) = rx.recv().await {
            self.handle_notification(&ev.message, ev.source_id.as_deref());
        }
        self.shutdown();
    }

    /// Synchronous teardown. In-flight backfill callbacks are not cancelled:
    /// they are idempotent and mutate a value nobody will read again.
    pub fn shutdown(&self) {
        self.dedup.lock().expect("dedup lock poisoned").clear();
        debug!(target: "loot", "loot service shut down");
    }

    #[cfg(test)]
    pub(crate) fn dedup_len(&self) -> usize {
        self.dedup.lock().expect("dedup lock poisoned").len()
    }
}
