// src/classify.rs
//! First-match-wins classification of a raw notification line against the
//! compiled matcher lists: own templates first (in precedence order), then
//! other-actor templates. At most one matcher fires per message.

use crate::patterns::{CompiledMatcher, MatcherSet};

/// Transient classification result. `actor` is the captured name for
/// other-actor matches and `None` for own matches (the caller fills it from
/// local identity). `quantity` is always >= 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedMatch {
    pub actor: Option<String>,
    pub item: String,
    pub quantity: u32,
}

/// Pull the quantity capture out, falling back to 1 when the template has no
/// quantity field or the capture is not a usable integer.
fn quantity_at(caps: &regex::Captures<'_>, idx: usize, has_quantity: bool) -> u32 {
    if !has_quantity {
        return 1;
    }
    caps.get(idx)
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .filter(|&q| q >= 1)
        .unwrap_or(1)
}

fn try_own(m: &CompiledMatcher, message: &str) -> Option<ObservedMatch> {
    let caps = m.captures(message)?;
    Some(ObservedMatch {
        actor: None,
        item: caps.get(1)?.as_str().to_string(),
        quantity: quantity_at(&caps, 2, m.has_quantity),
    })
}

fn try_other(m: &CompiledMatcher, message: &str) -> Option<ObservedMatch> {
    let caps = m.captures(message)?;
    Some(ObservedMatch {
        actor: Some(caps.get(1)?.as_str().to_string()),
        item: caps.get(2)?.as_str().to_string(),
        quantity: quantity_at(&caps, 3, m.has_quantity),
    })
}

impl MatcherSet {
    /// Classify one message. Own matchers are exhausted before any
    /// other-actor matcher is consulted; the first structural match wins.
    pub fn classify(&self, message: &str) -> Option<ObservedMatch> {
        for m in &self.own {
            if let Some(hit) = try_own(m, message) {
                return Some(hit);
            }
        }
        for m in &self.other {
            if let Some(hit) = try_other(m, message) {
                return Some(hit);
            }
        }
        None
    }
}
