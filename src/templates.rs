// src/templates.rs
//! Localized notification templates. Eight roles, any of which a given
//! localization may omit; placeholders are `%s` (text) and `%d` (integer).

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_TEMPLATES_PATH: &str = "LOOT_TEMPLATES_PATH";
pub const DEFAULT_TEMPLATES_PATH: &str = "config/loot_templates.toml";

/// The raw, localization-supplied format strings. Immutable once compiled
/// into a `MatcherSet`; missing entries are skipped at compile time.
///
/// Placeholder order is positional and fixed: other-audience templates put
/// the actor `%s` before the item `%s`, and the quantity `%d` comes last.
/// A localization that reorders placeholders would swap captured fields.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateSet {
    pub self_multi: Option<String>,
    pub self_single: Option<String>,
    pub self_push_multi: Option<String>,
    pub self_push_single: Option<String>,
    pub other_multi: Option<String>,
    pub other_single: Option<String>,
    pub other_push_multi: Option<String>,
    pub other_push_single: Option<String>,
}

impl Default for TemplateSet {
    /// English client strings.
    fn default() -> Self {
        Self {
            self_multi: Some("You receive loot: %sx%d.".into()),
            self_single: Some("You receive loot: %s.".into()),
            self_push_multi: Some("You receive item: %sx%d.".into()),
            self_push_single: Some("You receive item: %s.".into()),
            other_multi: Some("%s receives loot: %sx%d.".into()),
            other_single: Some("%s receives loot: %s.".into()),
            other_push_multi: Some("%s receives item: %sx%d.".into()),
            other_push_single: Some("%s receives item: %s.".into()),
        }
    }
}

impl TemplateSet {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let set: TemplateSet = toml::from_str(s).context("parsing template TOML")?;
        Ok(set)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading templates from {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Resolve templates using env var + fallback:
    /// 1) $LOOT_TEMPLATES_PATH
    /// 2) config/loot_templates.toml
    /// 3) built-in English defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_TEMPLATES_PATH) {
            return Self::from_path(&PathBuf::from(p));
        }
        let fallback = PathBuf::from(DEFAULT_TEMPLATES_PATH);
        if fallback.exists() {
            return Self::from_path(&fallback);
        }
        Ok(Self::default())
    }

    /// Self-audience templates with their quantity flags, in precedence
    /// order: multi before single, primary before push.
    pub fn self_roles(&self) -> [(Option<&str>, bool); 4] {
        [
            (self.self_multi.as_deref(), true),
            (self.self_single.as_deref(), false),
            (self.self_push_multi.as_deref(), true),
            (self.self_push_single.as_deref(), false),
        ]
    }

    /// Other-audience templates, same ordering rules.
    pub fn other_roles(&self) -> [(Option<&str>, bool); 4] {
        [
            (self.other_multi.as_deref(), true),
            (self.other_single.as_deref(), false),
            (self.other_push_multi.as_deref(), true),
            (self.other_push_single.as_deref(), false),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_all_roles() {
        let t = TemplateSet::default();
        assert!(t.self_roles().iter().all(|(s, _)| s.is_some()));
        assert!(t.other_roles().iter().all(|(s, _)| s.is_some()));
    }

    #[test]
    fn toml_with_gaps_parses() {
        let t = TemplateSet::from_toml_str(
            r#"
self_single = "Du erhältst Beute: %s."
other_single = "%s erhält Beute: %s."
"#,
        )
        .unwrap();
        assert!(t.self_single.is_some());
        assert!(t.self_multi.is_none());
        assert!(t.other_push_single.is_none());
    }

    #[serial_test::serial]
    #[test]
    fn load_default_prefers_env_path_then_builtins() {
        let dir = std::env::temp_dir().join("loot_watcher_templates_test");
        std::fs::create_dir_all(&dir).unwrap();
        let p = dir.join("templates.toml");
        std::fs::write(&p, "self_single = \"Loot: %s.\"\n").unwrap();

        std::env::set_var(ENV_TEMPLATES_PATH, p.display().to_string());
        let t = TemplateSet::load_default().unwrap();
        assert_eq!(t.self_single.as_deref(), Some("Loot: %s."));
        assert!(t.other_single.is_none());
        std::env::remove_var(ENV_TEMPLATES_PATH);

        // Without the env var (and no config/ fallback checked in), the
        // built-in English strings apply.
        if !PathBuf::from(DEFAULT_TEMPLATES_PATH).exists() {
            let d = TemplateSet::load_default().unwrap();
            assert_eq!(d.self_single, TemplateSet::default().self_single);
        }
    }

    #[test]
    fn role_order_is_multi_single_then_push() {
        let t = TemplateSet::default();
        let roles = t.self_roles();
        assert!(roles[0].1 && !roles[1].1 && roles[2].1 && !roles[3].1);
        assert!(roles[0].0.unwrap().contains("loot"));
        assert!(roles[2].0.unwrap().contains("item"));
    }
}
