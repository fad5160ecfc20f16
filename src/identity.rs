// src/identity.rs
//! Actor resolution: turn a classification result into a display name plus
//! archetype/class, using the local session identity for own pickups and an
//! external source-id directory for everyone else.

use crate::classify::ObservedMatch;

/// Local session identity. Always defined once a session exists.
pub trait LocalIdentity: Send + Sync {
    fn player_name(&self) -> String;
    fn player_class(&self) -> String;
}

/// Identity lookup keyed by an opaque source identifier. A stale, unknown or
/// absent identifier yields `None`; this must never fail harder than that.
pub trait SourceDirectory: Send + Sync {
    fn class_for_source(&self, source_id: &str) -> Option<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedActor {
    pub name: String,
    /// Unset class is missing enrichment, not an error.
    pub class: Option<String>,
}

pub fn resolve_actor(
    hit: &ObservedMatch,
    source_id: Option<&str>,
    local: &dyn LocalIdentity,
    directory: &dyn SourceDirectory,
) -> ResolvedActor {
    match &hit.actor {
        None => ResolvedActor {
            name: local.player_name(),
            class: Some(local.player_class()),
        },
        Some(name) => ResolvedActor {
            name: name.clone(),
            class: source_id.and_then(|sid| directory.class_for_source(sid)),
        },
    }
}
