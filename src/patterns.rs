// src/patterns.rs
//! Template-to-matcher compilation. Each localized format string becomes an
//! anchored regex: literal characters are escaped so structurally significant
//! characters (brackets, dots) match verbatim, `%s` becomes a text capture
//! and `%d` a digit capture. Compilation happens once at startup; the
//! resulting `MatcherSet` is read-only afterward.

use anyhow::{Context, Result};
use regex::Regex;

use crate::templates::TemplateSet;

/// Whether a template describes the local player's own pickup or another
/// participant's. Own templates carry no actor capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    Own,
    Other,
}

#[derive(Debug)]
pub struct CompiledMatcher {
    re: Regex,
    pub audience: Audience,
    pub has_quantity: bool,
}

impl CompiledMatcher {
    pub fn captures<'t>(&self, message: &'t str) -> Option<regex::Captures<'t>> {
        self.re.captures(message)
    }
}

/// Ordered matcher lists; order within each list is the declaration order of
/// the template roles (multi before single, primary before push) and is the
/// precedence used by classification.
#[derive(Debug, Default)]
pub struct MatcherSet {
    pub own: Vec<CompiledMatcher>,
    pub other: Vec<CompiledMatcher>,
}

/// Escape the template literally, then open up the two placeholder kinds.
fn template_to_regex(template: &str) -> Result<Regex> {
    let body = regex::escape(template)
        .replace("%s", "(.+)")
        .replace("%d", r"(\d+)");
    Regex::new(&format!("^{body}$"))
        .with_context(|| format!("compiling loot template {template:?}"))
}

fn compile_roles(
    roles: &[(Option<&str>, bool)],
    audience: Audience,
    out: &mut Vec<CompiledMatcher>,
) -> Result<()> {
    for (raw, has_quantity) in roles {
        // Absent template (localization gap) is skipped, never an error.
        let Some(raw) = raw else { continue };
        out.push(CompiledMatcher {
            re: template_to_regex(raw)?,
            audience,
            has_quantity: *has_quantity,
        });
    }
    Ok(())
}

pub fn compile(set: &TemplateSet) -> Result<MatcherSet> {
    let mut compiled = MatcherSet::default();
    compile_roles(&set.self_roles(), Audience::Own, &mut compiled.own)?;
    compile_roles(&set.other_roles(), Audience::Other, &mut compiled.other)?;
    Ok(compiled)
}
