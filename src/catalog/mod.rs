//! Catalog loader (C1, §4.1).
//!
//! Loads the hero catalog and lineup template catalog once at process start
//! and exposes read-only, indexed lookups. Grounded on the teacher's
//! `data::data_registry::DataRegistry::load` ("load all static data from
//! disk, return an `Arc` so handlers/threads can share it") and
//! `data::officer::load_canonical_officers` (a single JSON file, one struct
//! wrapping a `Vec<T>`, `serde_json::from_str` + `std::io::Error::other` on
//! parse failure).

pub mod loader;

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::model::hero_catalog::HeroEntry;
use crate::model::lineup_template::LineupTemplate;

pub const DEFAULT_HERO_CATALOG_PATH: &str = "data/heroes/catalog.json";
pub const DEFAULT_LINEUP_TEMPLATES_PATH: &str = "data/lineups/templates.json";

#[derive(Debug)]
pub enum CatalogError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Io(e) => write!(f, "{e}"),
            CatalogError::Parse(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for CatalogError {}

#[derive(Debug, Deserialize)]
struct HeroCatalogFile {
    heroes: Vec<HeroEntry>,
}

#[derive(Debug, Deserialize)]
struct LineupTemplateFile {
    templates: HashMap<String, LineupTemplate>,
}

/// Process-wide, immutable catalog (§3). Build once with [Catalog::load] and
/// share via `Arc`; every subsequent call is a pure read.
#[derive(Debug)]
pub struct Catalog {
    heroes_by_name: HashMap<String, HeroEntry>,
    /// `loader::normalize_lookup(name) -> canonical name`, so a roster import
    /// or a hand-typed hero name that differs only in case/whitespace still
    /// resolves (e.g. a CSV export with `"jessie"` or `"Jessie "`).
    normalized_index: HashMap<String, String>,
    templates_by_key: HashMap<String, LineupTemplate>,
}

impl Catalog {
    /// Load both catalogs from disk. Failure here is fatal at startup (§4.1).
    pub fn load(
        hero_catalog_path: impl AsRef<Path>,
        lineup_templates_path: impl AsRef<Path>,
    ) -> Result<Arc<Catalog>, CatalogError> {
        let heroes = load_json::<HeroCatalogFile>(hero_catalog_path)?.heroes;
        let templates = load_json::<LineupTemplateFile>(lineup_templates_path)?.templates;

        let normalized_index = loader::build_name_index(heroes.iter().map(|h| h.name.as_str()));
        let heroes_by_name = heroes.into_iter().map(|h| (h.name.clone(), h)).collect();

        Ok(Arc::new(Catalog {
            heroes_by_name,
            normalized_index,
            templates_by_key: templates,
        }))
    }

    /// Exact lookup, falling back to a normalized (lowercase, whitespace-
    /// collapsed) match. Returns `None` when the hero is not in the catalog
    /// under either form — callers that need the Unknown-default behavior
    /// described in §3 should use [Catalog::effective_entry].
    pub fn lookup(&self, name: &str) -> Option<&HeroEntry> {
        self.heroes_by_name.get(name).or_else(|| {
            let canonical = self.normalized_index.get(&loader::normalize_lookup(name))?;
            self.heroes_by_name.get(canonical)
        })
    }

    /// Lookup with the §3 Unknown fallback: `{class: Unknown, generation: 99,
    /// tier: C}` when the name is not in the catalog.
    pub fn effective_entry(&self, name: &str) -> HeroEntry {
        self.lookup(name).cloned().unwrap_or_else(|| HeroEntry::unknown(name))
    }

    pub fn template(&self, mode_key: &str) -> Option<&LineupTemplate> {
        self.templates_by_key.get(mode_key)
    }

    pub fn all_heroes(&self) -> impl Iterator<Item = &HeroEntry> {
        self.heroes_by_name.values()
    }

    pub fn hero_count(&self) -> usize {
        self.heroes_by_name.len()
    }

    pub fn template_count(&self) -> usize {
        self.templates_by_key.len()
    }
}

fn load_json<T: for<'de> Deserialize<'de>>(path: impl AsRef<Path>) -> Result<T, CatalogError> {
    let raw = fs::read_to_string(path).map_err(CatalogError::Io)?;
    serde_json::from_str(&raw).map_err(CatalogError::Parse)
}

#[cfg(test)]
impl Catalog {
    /// Build a catalog in memory, bypassing file I/O. Used by other
    /// modules' unit tests.
    pub(crate) fn for_tests(heroes: Vec<HeroEntry>, templates: HashMap<String, LineupTemplate>) -> Catalog {
        let normalized_index = loader::build_name_index(heroes.iter().map(|h| h.name.as_str()));
        Catalog {
            heroes_by_name: heroes.into_iter().map(|h| (h.name.clone(), h)).collect(),
            normalized_index,
            templates_by_key: templates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::hero_catalog::{HeroClass, Tier};

    fn sample_catalog() -> Catalog {
        let mut heroes_by_name = HashMap::new();
        heroes_by_name.insert(
            "Vulcanus".to_string(),
            HeroEntry {
                name: "Vulcanus".to_string(),
                generation: 3,
                class: HeroClass::Lancer,
                rarity: "Mythic".to_string(),
                tier_overall: Tier::SPlus,
                tier_expedition: Tier::SPlus,
                tier_exploration: Tier::S,
            },
        );
        let normalized_index = loader::build_name_index(heroes_by_name.keys().map(String::as_str));
        Catalog {
            heroes_by_name,
            normalized_index,
            templates_by_key: HashMap::new(),
        }
    }

    #[test]
    fn lookup_returns_none_for_missing_hero() {
        let catalog = sample_catalog();
        assert!(catalog.lookup("Nobody").is_none());
    }

    #[test]
    fn lookup_resolves_case_and_whitespace_insensitively() {
        let catalog = sample_catalog();
        assert_eq!(catalog.lookup("vulcanus").unwrap().name, "Vulcanus");
        assert_eq!(catalog.lookup("  Vulcanus  ").unwrap().name, "Vulcanus");
    }

    #[test]
    fn effective_entry_falls_back_to_unknown_defaults() {
        let catalog = sample_catalog();
        let entry = catalog.effective_entry("Nobody");
        assert_eq!(entry.generation, 99);
        assert_eq!(entry.tier_overall, Tier::C);
        assert_eq!(entry.class, HeroClass::Unknown);
    }

    #[test]
    fn effective_entry_returns_real_entry_when_present() {
        let catalog = sample_catalog();
        let entry = catalog.effective_entry("Vulcanus");
        assert_eq!(entry.generation, 3);
        assert_eq!(entry.tier_overall, Tier::SPlus);
    }
}
