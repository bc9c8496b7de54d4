//! Hero scorer (C2, §4.2).
//!
//! `power` is an internal ranking score only — never surfaced as a "real"
//! stat (§4.2). The exact weights are preserved verbatim from spec.md; per
//! DESIGN §9 Open Questions, they are not "rationalized" or rebalanced here.

use crate::catalog::Catalog;
use crate::model::hero_catalog::HeroEntry;
use crate::model::owned_hero::OwnedHero;

/// `power(owned, catalogEntry?) -> int` (§4.2).
pub fn power(owned: &OwnedHero, catalog_entry: Option<&HeroEntry>) -> i64 {
    let mut total: i64 = 0;
    total += owned.level as i64 * 10;
    total += owned.stars as i64 * 50;
    total += owned.ascension as i64 * 30;
    for slot in &owned.gear {
        total += slot.quality as i64 * 15 + (slot.level as i64) / 10;
    }
    total += owned.expedition_skill_1() as i64 * 20;
    if let Some(entry) = catalog_entry {
        total += entry.tier_expedition.ordinal() * 25;
    }
    total
}

/// `tierScore`: the catalog's `tierOverall` ordinal normalized to `[0, 1]`.
/// spec.md §4.3 compares `tierScore × genRelevance` against thresholds like
/// `0.4`/`0.5`; this normalization is the Open-Questions decision recorded
/// in DESIGN.md (the spec does not spell out the formula beyond the
/// ordinal mapping used for `power`'s `tierExpedition` term).
pub fn tier_score(entry: &HeroEntry) -> f64 {
    entry.tier_overall.ordinal() as f64 / 6.0
}

/// `generationRelevance(name, currentGen) -> float` (§4.2).
pub fn generation_relevance(entry: &HeroEntry, current_gen: u32) -> f64 {
    let d = current_gen as i64 - entry.generation as i64;
    let base = if d <= 0 {
        1.0
    } else {
        match d {
            1 => 0.9,
            2 => 0.7,
            3 => 0.5,
            _ => 0.3,
        }
    };
    if entry.tier_overall == crate::model::hero_catalog::Tier::SPlus && d <= 3 {
        (base + 0.15_f64).min(1.0)
    } else {
        base
    }
}

/// `rankByValue(owned[], currentGen) -> name[]` (§4.2): descending by
/// `tierScore × relevance × (0.5 + 0.5 × min(1, level/50))`.
pub fn rank_by_value(owned: &[OwnedHero], current_gen: u32, catalog: &Catalog) -> Vec<String> {
    let mut scored: Vec<(String, f64)> = owned
        .iter()
        .map(|hero| {
            let entry = catalog.effective_entry(&hero.name);
            let relevance = generation_relevance(&entry, current_gen);
            let level_factor = 0.5 + 0.5 * (hero.level as f64 / 50.0).min(1.0);
            let value = tier_score(&entry) * relevance * level_factor;
            (hero.name.clone(), value)
        })
        .collect();

    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.into_iter().map(|(name, _)| name).collect()
}

/// `currentGeneration(serverAgeDays)` (§4.2): piecewise bands 1..8 for days
/// 0..520, extended in 80-day increments beyond that (spec.md permits this
/// extension as long as 1..8 for days 0..520 matches exactly).
pub fn current_generation(server_age_days: u32) -> u32 {
    const BANDS: [u32; 7] = [40, 120, 200, 280, 360, 440, 520];
    for (index, &bound) in BANDS.iter().enumerate() {
        if server_age_days < bound {
            return (index + 1) as u32;
        }
    }
    let overflow = server_age_days - 520;
    8 + overflow / 80
}
