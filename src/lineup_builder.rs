//! Lineup builder (C5, §4.5): slot-filling and power-ranking for a chosen
//! game mode.

use std::collections::HashSet;

use crate::catalog::Catalog;
use crate::model::hero_catalog::HeroClass;
use crate::model::lineup_template::{LineupTemplate, Slot};
use crate::model::{AssignedSlot, Confidence, JoinerRecommendation, LineupRecommendation, OwnedHero, TroopRatio};
use crate::scorer;

const PLACEHOLDER_RATIO: TroopRatio = TroopRatio { infantry: 33, lancer: 33, marksman: 34 };

/// A hero eligible for slot assignment, abstracted over "heroes I own" vs.
/// "every catalog hero up to this generation" (§4.5's general-lineup
/// variant).
struct Candidate {
    name: String,
    class: HeroClass,
    generation: u32,
    power: i64,
    status: String,
}

fn owned_candidates(owned: &[OwnedHero], catalog: &Catalog) -> Vec<Candidate> {
    owned
        .iter()
        .map(|hero| {
            let entry = catalog.effective_entry(&hero.name);
            Candidate {
                name: hero.name.clone(),
                class: entry.class,
                generation: entry.generation,
                power: scorer::power(hero, catalog.lookup(&hero.name)),
                status: format!("Lv{}", hero.level),
            }
        })
        .collect()
}

fn catalog_candidates(catalog: &Catalog, max_generation: u32) -> Vec<Candidate> {
    catalog
        .all_heroes()
        .filter(|entry| entry.generation <= max_generation)
        .map(|entry| Candidate {
            name: entry.name.clone(),
            class: entry.class,
            generation: entry.generation,
            power: entry.tier_overall.ordinal(),
            status: format!("Gen {}", entry.generation),
        })
        .collect()
}

struct Assignment {
    slots: Vec<AssignedSlot>,
    confidence: Confidence,
    missing_key_heroes: Vec<String>,
}

fn assign_slots(template: &LineupTemplate, pool: &[Candidate], max_generation: u32) -> Assignment {
    let mut used: HashSet<String> = HashSet::new();
    let mut slots = Vec::with_capacity(template.slots.len());
    let mut missing_key_heroes = Vec::new();

    let critical = template.slots.iter().filter(|s| !s.is_filler()).count();
    let mut filled = 0;

    for slot in &template.slots {
        if slot.is_filler() {
            slots.push(filler_slot(slot));
            continue;
        }

        let chosen = choose_preferred(slot, pool, &used, max_generation)
            .or_else(|| choose_by_class(slot, pool, &used, max_generation));

        match chosen {
            Some(candidate_name) => {
                let candidate = pool.iter().find(|c| c.name == candidate_name).expect("chosen candidate exists in pool");
                used.insert(candidate.name.clone());
                filled += 1;
                slots.push(AssignedSlot {
                    hero: Some(candidate.name.clone()),
                    hero_class: candidate.class,
                    slot_role: slot.role.clone(),
                    role: slot.role.clone(),
                    is_lead: slot.is_lead,
                    power: candidate.power,
                    status: candidate.status.clone(),
                });
            }
            None => {
                let needed_class = slot.class.map(class_label).unwrap_or("Hero");
                slots.push(AssignedSlot {
                    hero: None,
                    hero_class: slot.class.unwrap_or(HeroClass::Unknown),
                    slot_role: slot.role.clone(),
                    role: slot.role.clone(),
                    is_lead: slot.is_lead,
                    power: 0,
                    status: format!("Need {needed_class}"),
                });
                for name in slot.preferred.iter().take(2) {
                    if !pool.iter().any(|c| &c.name == name) && !missing_key_heroes.contains(name) {
                        missing_key_heroes.push(name.clone());
                    }
                }
            }
        }
    }

    let confidence = if filled == critical {
        Confidence::High
    } else if critical > 0 && filled * 2 >= critical {
        Confidence::Medium
    } else {
        Confidence::Low
    };

    Assignment { slots, confidence, missing_key_heroes }
}

fn filler_slot(slot: &Slot) -> AssignedSlot {
    AssignedSlot {
        hero: Some("Any hero".to_string()),
        hero_class: slot.class.unwrap_or(HeroClass::Unknown),
        slot_role: slot.role.clone(),
        role: "Filler".to_string(),
        is_lead: false,
        power: 0,
        status: "Filler slot".to_string(),
    }
}

fn class_label(class: HeroClass) -> &'static str {
    match class {
        HeroClass::Infantry => "Infantry",
        HeroClass::Lancer => "Lancer",
        HeroClass::Marksman => "Marksman",
        HeroClass::Unknown => "Hero",
    }
}

fn eligible<'a>(pool: &'a [Candidate], used: &HashSet<String>, max_generation: u32, name: &str) -> Option<&'a Candidate> {
    pool.iter()
        .find(|c| c.name == name && !used.contains(&c.name) && c.generation <= max_generation)
}

/// Lead slots take the first eligible preferred hero, in list order. Non-lead
/// slots take the highest-power eligible preferred hero, ties broken by
/// earlier position in `preferred`.
fn choose_preferred(slot: &Slot, pool: &[Candidate], used: &HashSet<String>, max_generation: u32) -> Option<String> {
    if slot.is_lead {
        slot.preferred
            .iter()
            .find_map(|name| eligible(pool, used, max_generation, name))
            .map(|c| c.name.clone())
    } else {
        slot.preferred
            .iter()
            .filter_map(|name| eligible(pool, used, max_generation, name))
            .max_by_key(|c| c.power)
            .map(|c| c.name.clone())
    }
}

fn choose_by_class(slot: &Slot, pool: &[Candidate], used: &HashSet<String>, max_generation: u32) -> Option<String> {
    let class = slot.class?;
    pool.iter()
        .filter(|c| c.class == class && !used.contains(&c.name) && c.generation <= max_generation)
        .max_by_key(|c| c.power)
        .map(|c| c.name.clone())
}

fn build_recommended_to_get(
    template: &LineupTemplate,
    pool: &[Candidate],
    missing_key_heroes: &[String],
    max_generation: u32,
) -> Vec<String> {
    let mut recommended = Vec::new();
    for key_hero in &template.key_heroes {
        if pool.iter().any(|c| &c.name == key_hero) {
            continue;
        }
        recommended.push(key_hero.clone());
    }
    for missing in missing_key_heroes {
        if !recommended.contains(missing) {
            recommended.push(missing.clone());
        }
    }
    let _ = max_generation;
    recommended.truncate(4);
    recommended
}

fn compose_notes(
    template: &LineupTemplate,
    assignment: &Assignment,
    mode_key: &str,
    pool: &[Candidate],
) -> String {
    let mut notes = template.notes.clone();
    if let Some(ratio_explanation) = &template.ratio_explanation {
        notes.push('\n');
        notes.push_str(ratio_explanation);
    }
    if assignment.confidence != Confidence::High {
        if let Some(warning) = &template.joiner_warning {
            notes.push('\n');
            notes.push_str(warning);
        }
    }

    if mode_key == "rally_joiner_attack" || mode_key == "rally_joiner_defense" {
        let canonical_joiner = if mode_key == "rally_joiner_attack" { "Jessie" } else { "Sergey" };
        match pool.iter().find(|c| c.name == canonical_joiner) {
            None => {
                notes.push('\n');
                notes.push_str(&format!(
                    "{canonical_joiner} not available — joining without the right joiner wastes the skill slot."
                ));
            }
            Some(_) => {
                let in_slot_one = assignment.slots.first().and_then(|s| s.hero.as_deref()) == Some(canonical_joiner);
                if !in_slot_one {
                    notes.push('\n');
                    notes.push_str(&format!("Put {canonical_joiner} in slot 1 — only that slot's skill applies."));
                }
            }
        }
    }

    if mode_key == "garrison" {
        if let Some(lead) = assignment.slots.iter().find(|s| s.is_lead) {
            let lead_names_in_lineup: HashSet<&str> = assignment.slots.iter().filter_map(|s| s.hero.as_deref()).collect();
            for sustain_name in &template.sustain_heroes {
                if lead_names_in_lineup.contains(sustain_name.as_str()) {
                    continue;
                }
                if let Some(candidate) = pool.iter().find(|c| &c.name == sustain_name) {
                    if lead.power > 0 && candidate.power as f64 >= 0.8 * lead.power as f64 {
                        let hint = template
                            .hero_explanations
                            .get(sustain_name)
                            .cloned()
                            .unwrap_or_default();
                        notes.push('\n');
                        notes.push_str(&format!("{sustain_name} might be better for garrison - {hint}"));
                        break;
                    }
                }
            }
        }
    }

    notes
}

fn unknown_mode_result(mode_key: &str) -> LineupRecommendation {
    LineupRecommendation {
        mode: mode_key.to_string(),
        slots: Vec::new(),
        troop_ratio: PLACEHOLDER_RATIO,
        notes: format!("Unknown mode: {mode_key}"),
        confidence: Confidence::Low,
        recommended_to_get: Vec::new(),
    }
}

/// Build a lineup personalized to the caller's owned roster.
pub fn build_lineup(catalog: &Catalog, mode_key: &str, owned: &[OwnedHero], max_generation: u32) -> LineupRecommendation {
    let Some(template) = catalog.template(mode_key) else {
        return unknown_mode_result(mode_key);
    };

    let pool = owned_candidates(owned, catalog);
    let assignment = assign_slots(template, &pool, max_generation);
    let recommended_to_get = build_recommended_to_get(template, &pool, &assignment.missing_key_heroes, max_generation);
    let notes = compose_notes(template, &assignment, mode_key, &pool);

    LineupRecommendation {
        mode: mode_key.to_string(),
        slots: assignment.slots,
        troop_ratio: template.troop_ratio,
        notes,
        confidence: assignment.confidence,
        recommended_to_get,
    }
}

/// Build a non-personalized lineup over the universe of catalog heroes
/// available at `max_generation` (the "general guide" variant of §4.5).
pub fn build_general_lineup(catalog: &Catalog, mode_key: &str, max_generation: u32) -> LineupRecommendation {
    let Some(template) = catalog.template(mode_key) else {
        return unknown_mode_result(mode_key);
    };

    let pool = catalog_candidates(catalog, max_generation);
    let assignment = assign_slots(template, &pool, max_generation);
    let recommended_to_get = build_recommended_to_get(template, &pool, &assignment.missing_key_heroes, max_generation);
    let notes = compose_notes(template, &assignment, mode_key, &pool);

    LineupRecommendation {
        mode: mode_key.to_string(),
        slots: assignment.slots,
        troop_ratio: template.troop_ratio,
        notes,
        confidence: assignment.confidence,
        recommended_to_get,
    }
}

/// Canonical joiner recommendation (§4.5, separate entry point from the
/// slot-filling algorithm above).
pub fn joiner_recommendation(owned: &[OwnedHero], is_attack: bool) -> JoinerRecommendation {
    let canonical: Vec<&str> = if is_attack { vec!["Jessie", "Jeronimo"] } else { vec!["Sergey", "Patrick", "Natalia"] };

    for name in canonical {
        if let Some(hero) = owned.iter().find(|h| h.name == name) {
            let skill = hero.expedition_skill_1();
            let action = if skill < 5 {
                format!("Max {name}'s expedition skill")
            } else {
                "Ready to join!".to_string()
            };
            let critical_note = if is_attack {
                "ONLY slot 1 hero's top-right skill (Stand of Arms: +25% DMG dealt) applies when joining!".to_string()
            } else {
                "ONLY slot 1 hero's top-right skill (Defenders' Edge: -20% DMG taken) applies when joining!".to_string()
            };
            return JoinerRecommendation {
                hero: Some(name.to_string()),
                skill_level: Some(skill),
                max_skill: 5,
                recommendation: Some(format!("Use {name} in slot 1. Skill at L{skill}/5.")),
                action,
                critical_note: Some(critical_note),
            };
        }
    }

    JoinerRecommendation {
        hero: None,
        skill_level: None,
        max_skill: 5,
        recommendation: Some(format!("No good {} joiner owned.", if is_attack { "attack" } else { "defense" })),
        action: "REMOVE ALL HEROES when joining".to_string(),
        critical_note: Some(
            "Sending no heroes is better than contributing a bad skill that bumps out a good one.".to_string(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::model::hero_catalog::{HeroEntry, Tier};
    use crate::model::owned_hero::GearSlot;

    fn entry(name: &str, generation: u32, class: HeroClass, tier: Tier) -> HeroEntry {
        HeroEntry {
            name: name.to_string(),
            generation,
            class,
            rarity: "Mythic".to_string(),
            tier_overall: tier,
            tier_expedition: tier,
            tier_exploration: tier,
        }
    }

    fn hero(name: &str, level: u8, stars: u8) -> OwnedHero {
        OwnedHero {
            name: name.to_string(),
            level,
            stars,
            ascension: 0,
            expedition_skill_levels: [1, 1, 1],
            exploration_skill_levels: [1, 1, 1],
            gear: [GearSlot::default(); 4],
            mythic_gear: None,
        }
    }

    fn slot(class: HeroClass, role: &str, is_lead: bool, preferred: &[&str]) -> Slot {
        Slot {
            class: Some(class),
            role: role.to_string(),
            is_lead,
            preferred: preferred.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn bear_trap_template() -> LineupTemplate {
        LineupTemplate {
            name: "Bear Trap".to_string(),
            slots: vec![
                slot(HeroClass::Lancer, "Lead", true, &["Vulcanus"]),
                slot(HeroClass::Marksman, "DPS", false, &["Blanchette", "Alonso"]),
                slot(HeroClass::Marksman, "DPS", false, &["Jeronimo"]),
            ],
            troop_ratio: TroopRatio { infantry: 0, lancer: 10, marksman: 90 },
            notes: "Ranged damage race.".to_string(),
            key_heroes: vec!["Vulcanus".to_string()],
            hero_explanations: HashMap::new(),
            ratio_explanation: Some("90% Marksman exploits the bear's slow approach.".to_string()),
            joiner_warning: None,
            sustain_heroes: Vec::new(),
        }
    }

    fn bear_trap_catalog() -> Catalog {
        Catalog::for_tests(
            vec![
                entry("Vulcanus", 3, HeroClass::Lancer, Tier::SPlus),
                entry("Blanchette", 2, HeroClass::Marksman, Tier::S),
                entry("Alonso", 1, HeroClass::Marksman, Tier::B),
                entry("Jeronimo", 2, HeroClass::Marksman, Tier::A),
            ],
            HashMap::from([("bear_trap".to_string(), bear_trap_template())]),
        )
    }

    #[test]
    fn bear_trap_assigns_lead_then_highest_power_then_remaining() {
        let catalog = bear_trap_catalog();
        let owned = vec![hero("Vulcanus", 80, 5), hero("Blanchette", 70, 5), hero("Jeronimo", 80, 5)];
        let result = build_lineup(&catalog, "bear_trap", &owned, 8);

        assert_eq!(result.slots[0].hero.as_deref(), Some("Vulcanus"));
        assert_eq!(result.slots[1].hero.as_deref(), Some("Blanchette"));
        assert_eq!(result.slots[2].hero.as_deref(), Some("Jeronimo"));
        assert_eq!(result.confidence, Confidence::High);
    }

    #[test]
    fn missing_lead_hero_produces_placeholder_and_recommended_to_get() {
        let catalog = bear_trap_catalog();
        let owned = vec![hero("Alonso", 60, 3)];
        let result = build_lineup(&catalog, "bear_trap", &owned, 8);

        assert_eq!(result.slots[0].hero, None);
        assert_eq!(result.slots[0].status, "Need Lancer");
        assert!(result.recommended_to_get.contains(&"Vulcanus".to_string()));
        assert_ne!(result.confidence, Confidence::High);
    }

    #[test]
    fn unknown_mode_returns_low_confidence_placeholder() {
        let catalog = bear_trap_catalog();
        let result = build_lineup(&catalog, "nonexistent_mode", &[], 8);
        assert_eq!(result.confidence, Confidence::Low);
        assert!(result.notes.contains("Unknown mode"));
    }

    #[test]
    fn empty_roster_has_low_confidence_and_placeholders_for_every_critical_slot() {
        let catalog = bear_trap_catalog();
        let result = build_lineup(&catalog, "bear_trap", &[], 8);
        assert_eq!(result.confidence, Confidence::Low);
        assert!(result.slots.iter().all(|s| s.hero.is_none()));
    }

    #[test]
    fn joiner_recommendation_falls_back_when_no_canonical_joiner_owned() {
        let rec = joiner_recommendation(&[hero("Alonso", 50, 3)], true);
        assert_eq!(rec.hero, None);
        assert_eq!(rec.action, "REMOVE ALL HEROES when joining");
    }

    #[test]
    fn joiner_recommendation_uses_first_owned_canonical_hero() {
        let mut jessie = hero("Jessie", 60, 5);
        jessie.expedition_skill_levels[0] = 5;
        let rec = joiner_recommendation(&[jessie], true);
        assert_eq!(rec.hero.as_deref(), Some("Jessie"));
        assert_eq!(rec.action, "Ready to join!");
    }
}
