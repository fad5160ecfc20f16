//! Demo that feeds a short session's worth of notifications through the
//! pipeline, including a duplicate burst and an item whose quality only
//! resolves after the deferred recheck.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use loot_watcher::catalog::StaticCatalog;
use loot_watcher::entry::MemoryBoard;
use loot_watcher::identity::{LocalIdentity, SourceDirectory};
use loot_watcher::timer::TokioTimer;
use loot_watcher::{LootBoard, LootService, Notification, Quality, Settings, TemplateSet};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

struct DemoIdentity;
impl LocalIdentity for DemoIdentity {
    fn player_name(&self) -> String {
        "Aldric".into()
    }
    fn player_class(&self) -> String {
        "Paladin".into()
    }
}

struct DemoDirectory(HashMap<String, String>);
impl SourceDirectory for DemoDirectory {
    fn class_for_source(&self, source_id: &str) -> Option<String> {
        self.0.get(source_id).cloned()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "debug".into()))
        .init();

    let catalog = Arc::new(StaticCatalog::new());
    catalog.insert("[Sword of Dawn]", Some("icon/sword"), Some(Quality::Epic));
    catalog.insert("[Heavy Ingot]", Some("icon/ingot"), Some(Quality::Uncommon));
    // "[Strange Gem]" is deliberately left uncached so the 0.5s recheck
    // has something to backfill.

    let board = Arc::new(MemoryBoard::new());
    let directory = DemoDirectory(HashMap::from([("src-nerzhul".into(), "Warrior".into())]));

    let service = Arc::new(LootService::new(
        &TemplateSet::load_default()?,
        Some(Settings::default()),
        Arc::new(DemoIdentity),
        Arc::new(directory),
        catalog.clone(),
        Arc::new(TokioTimer),
        Some(board.clone() as Arc<dyn LootBoard>),
    )?);

    let (tx, rx) = mpsc::channel::<Notification>(32);
    let runner = tokio::spawn(service.clone().run(rx));

    let session = [
        ("You receive loot: [Sword of Dawn].", None),
        // Same pickup, announced again through the push template.
        ("You receive item: [Sword of Dawn].", None),
        ("Nerzhul receives loot: [Heavy Ingot]x3.", Some("src-nerzhul")),
        ("You receive loot: [Strange Gem].", None),
        ("Nerzhul has gone offline.", Some("src-nerzhul")),
    ];
    for (message, source_id) in session {
        tx.send(Notification {
            message: message.into(),
            source_id: source_id.map(str::to_string),
        })
        .await?;
    }
    drop(tx);
    runner.await?;

    // Let the quality recheck fire, with the catalogue now caught up.
    catalog.insert("[Strange Gem]", Some("icon/gem"), Some(Quality::Rare));
    tokio::time::sleep(Duration::from_millis(700)).await;

    for e in board.snapshot() {
        println!(
            "{} x{} -> {} ({}, quality {:?})",
            e.item,
            e.quantity,
            e.winner,
            e.winner_class.as_deref().unwrap_or("unknown"),
            e.quality
        );
    }
    println!("loot-demo done");
    Ok(())
}
