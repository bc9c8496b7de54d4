//! Hero analyzer (C3, §4.3): hero-focused upgrade recommendations.

use std::collections::HashSet;

use crate::catalog::Catalog;
use crate::model::{Category, OwnedHero, Profile, Recommendation, SpendingProfile, Source};
use crate::scorer;

/// Stand of Arms (Jessie, attack joiner) bonus per skill level, 1-indexed by level.
const JESSIE_BONUS_PER_LEVEL: [u8; 5] = [5, 10, 15, 20, 25];
/// Defenders' Edge (Sergey, defense joiner) bonus per skill level.
const SERGEY_BONUS_PER_LEVEL: [u8; 5] = [4, 8, 12, 16, 20];

/// Marquee heroes per generation, used by `acquire_gen{n}`.
fn generation_marquee_heroes(generation: u32) -> &'static [&'static str] {
    match generation {
        2 => &["Flint", "Philly", "Alonso"],
        3 => &["Logan", "Mia", "Greg"],
        4 => &["Ahmose", "Reina", "Lynn"],
        5 => &["Hector", "Wu Ming"],
        6 => &["Patrick", "Charlie", "Cloris"],
        7 => &["Gordon", "Renee", "Eugene"],
        _ => &[],
    }
}

fn hero_focus_limit(spending_profile: SpendingProfile) -> usize {
    match spending_profile {
        SpendingProfile::F2p => 3,
        SpendingProfile::Minnow => 4,
        SpendingProfile::Dolphin => 6,
        SpendingProfile::Orca => 10,
        SpendingProfile::Whale => usize::MAX,
    }
}

fn find_owned<'a>(owned: &'a [OwnedHero], name: &str) -> Option<&'a OwnedHero> {
    owned.iter().find(|h| h.name == name)
}

/// Produce hero-focused recommendations per §4.3. Each rule triggers
/// independently; only `no_heroes` short-circuits the rest.
pub fn analyze(profile: &Profile, owned: &[OwnedHero], catalog: &Catalog) -> Vec<Recommendation> {
    if owned.is_empty() {
        return vec![no_heroes_recommendation()];
    }

    let mut recs = Vec::new();
    let current_gen = scorer::current_generation(profile.server_age_days);

    recs.extend(level_main_three(owned, catalog));
    recs.extend(joiner_heroes(owned, profile));
    recs.extend(generation_heroes(owned, current_gen));

    let ranked = scorer::rank_by_value(owned, current_gen, catalog);
    let focus_limit = hero_focus_limit(profile.spending_profile);
    let top_heroes: HashSet<&str> = ranked.iter().map(String::as_str).take(focus_limit).collect();

    recs.extend(skill_gaps(owned, catalog, current_gen, &top_heroes, profile));
    recs.extend(star_progression(owned, catalog, current_gen, &top_heroes, profile));

    if profile.is_farm_account {
        recs.extend(farm_account(owned, &ranked, profile));
    }

    recs.sort_by_key(|r| r.priority);
    recs
}

fn no_heroes_recommendation() -> Recommendation {
    Recommendation::new(
        "no_heroes",
        1,
        "Add heroes to your profile",
        Category::Hero,
        Source::Rules,
    )
    .with_hero("Any")
    .with_reason("No heroes tracked. Add your heroes to get personalized recommendations.")
    .with_tag("all")
}

fn level_main_three(owned: &[OwnedHero], catalog: &Catalog) -> Vec<Recommendation> {
    let high_level_count = owned.iter().filter(|h| h.level >= 40).count();
    if high_level_count >= 3 {
        return Vec::new();
    }

    let slots_to_fill = 3 - high_level_count;
    owned
        .iter()
        .filter(|h| h.level < 40)
        .filter(|h| catalog.effective_entry(&h.name).tier_overall >= crate::model::Tier::A)
        .take(slots_to_fill)
        .map(|h| {
            let tier = catalog.effective_entry(&h.name).tier_overall;
            Recommendation::new("level_main_three", 1, format!("Level {} to 40+", h.name), Category::Hero, Source::Rules)
                .with_hero(h.name.clone())
                .with_reason(format!(
                    "{tier:?} tier hero, only Lv{}. Focus main 3 heroes before spreading investment.",
                    h.level
                ))
                .with_resources("Hero XP items, Meat for barracks")
                .with_tag("all")
        })
        .collect()
}

fn joiner_heroes(owned: &[OwnedHero], profile: &Profile) -> Vec<Recommendation> {
    let mut recs = Vec::new();
    let rally_priority = profile.priorities.rally;
    let castle_priority = profile.priorities.castle;

    if rally_priority >= 3 {
        match find_owned(owned, "Jessie") {
            None => recs.push(
                Recommendation::new(
                    "unlock_jessie",
                    if rally_priority >= 4 { 1 } else { 2 },
                    "Unlock Jessie",
                    Category::Hero,
                    Source::Rules,
                )
                .with_hero("Jessie")
                .with_reason("Best attack joiner. Her Stand of Arms (+5-25% DMG) is the top skill when joining rallies.")
                .with_resources("Jessie shards from events/shop")
                .with_tag("rally")
                .with_tag("svs"),
            ),
            Some(jessie) => {
                let skill = jessie.expedition_skill_1();
                if skill < 5 {
                    let bonus = JESSIE_BONUS_PER_LEVEL[(skill.max(1) - 1) as usize];
                    recs.push(
                        Recommendation::new(
                            "level_jessie_skill",
                            if rally_priority >= 4 { 1 } else { 2 },
                            format!("Max Jessie's expedition skill (currently Lv{skill})"),
                            Category::Hero,
                            Source::Rules,
                        )
                        .with_hero("Jessie")
                        .with_reason(format!(
                            "Stand of Arms at +{bonus}% -> +25% at L5. Put her slot 1 when joining rallies!"
                        ))
                        .with_resources("Expedition Manuals")
                        .with_tag("rally")
                        .with_tag("svs"),
                    );
                }
            }
        }
    }

    if castle_priority >= 3 {
        match find_owned(owned, "Sergey") {
            None => recs.push(
                Recommendation::new("unlock_sergey", 2, "Unlock Sergey", Category::Hero, Source::Rules)
                    .with_hero("Sergey")
                    .with_reason("Best defense joiner. His Defenders' Edge (-4-20% DMG taken) protects garrison.")
                    .with_resources("Sergey shards from events/shop")
                    .with_tag("castle")
                    .with_tag("garrison"),
            ),
            Some(sergey) => {
                let skill = sergey.expedition_skill_1();
                if skill < 5 {
                    let bonus = SERGEY_BONUS_PER_LEVEL[(skill.max(1) - 1) as usize];
                    recs.push(
                        Recommendation::new(
                            "level_sergey_skill",
                            2,
                            format!("Level Sergey's expedition skill (currently Lv{skill})"),
                            Category::Hero,
                            Source::Rules,
                        )
                        .with_hero("Sergey")
                        .with_reason(format!(
                            "Defenders' Edge at -{bonus}% -> -20% at L5. Put him slot 1 when reinforcing!"
                        ))
                        .with_resources("Expedition Manuals")
                        .with_tag("castle")
                        .with_tag("garrison"),
                    );
                }
            }
        }
    }

    recs
}

fn generation_heroes(owned: &[OwnedHero], current_gen: u32) -> Vec<Recommendation> {
    if current_gen < 2 {
        return Vec::new();
    }

    let owned_names: HashSet<&str> = owned.iter().map(|h| h.name.as_str()).collect();
    // spec.md §4.3: `max(2, currentGen - 1)` through `currentGen`.
    let start = current_gen.saturating_sub(1).max(2);
    let mut recs = Vec::new();

    for gen in start..=current_gen {
        let marquee = generation_marquee_heroes(gen);
        if marquee.is_empty() {
            continue;
        }
        if marquee.iter().any(|name| owned_names.contains(name)) {
            continue;
        }
        let priority = if gen == current_gen { 2 } else { 3 };
        let hero_names = marquee.iter().take(2).cloned().collect::<Vec<_>>().join(", ");
        recs.push(
            Recommendation::new(
                &format!("acquire_gen{gen}"),
                priority,
                format!("Acquire Gen {gen} heroes"),
                Category::Hero,
                Source::Rules,
            )
            .with_hero(hero_names.clone())
            .with_reason(format!("Gen {gen} heroes are significant upgrades. {hero_names} recommended."))
            .with_resources("Hero shards from events, packs, or VIP shop")
            .with_tag("svs")
            .with_tag("rally")
            .with_tag("progression"),
        );
    }

    recs
}

fn skill_gaps(
    owned: &[OwnedHero],
    catalog: &Catalog,
    current_gen: u32,
    top_heroes: &HashSet<&str>,
    profile: &Profile,
) -> Vec<Recommendation> {
    let mut recs = Vec::new();
    let rally_priority = profile.priorities.rally;
    let pve_priority = profile.priorities.exploration;
    let gate_by_focus = matches!(
        profile.spending_profile,
        SpendingProfile::F2p | SpendingProfile::Minnow
    );

    for hero in owned {
        let entry = catalog.effective_entry(&hero.name);
        let relevance = scorer::generation_relevance(&entry, current_gen);
        if scorer::tier_score(&entry) * relevance < 0.4 {
            continue;
        }

        let is_top_hero = top_heroes.contains(hero.name.as_str());
        if gate_by_focus && !is_top_hero {
            continue;
        }
        let priority_bonus = if is_top_hero { 0 } else { 1 };

        let exp_skill = *hero.expedition_skill_levels.iter().max().unwrap_or(&1);
        if rally_priority >= 3 && exp_skill < 5 && hero.level >= 30 {
            let mut reason = format!("{:?} tier hero. Expedition skills boost rally/SvS performance.", entry.tier_overall);
            if !is_top_hero && profile.spending_profile == SpendingProfile::Dolphin {
                reason.push_str(" Lower priority — focus on core heroes first.");
            }
            recs.push(
                Recommendation::new(
                    "upgrade_expedition_skill",
                    2 + priority_bonus,
                    format!("Upgrade {}'s expedition skill to L{}", hero.name, exp_skill + 1),
                    Category::Hero,
                    Source::Rules,
                )
                .with_hero(hero.name.clone())
                .with_reason(reason)
                .with_resources("Expedition Manuals")
                .with_tag("rally")
                .with_tag("svs"),
            );
        }

        let expl_skill = *hero.exploration_skill_levels.iter().max().unwrap_or(&1);
        if pve_priority >= 3 && expl_skill < 5 && hero.level >= 30 {
            let mut reason = format!("{:?} tier hero. Exploration skills help clear PvE content.", entry.tier_overall);
            if !is_top_hero && profile.spending_profile == SpendingProfile::Dolphin {
                reason.push_str(" Lower priority — focus on core heroes first.");
            }
            recs.push(
                Recommendation::new(
                    "upgrade_exploration_skill",
                    3 + priority_bonus,
                    format!("Upgrade {}'s exploration skill to L{}", hero.name, expl_skill + 1),
                    Category::Hero,
                    Source::Rules,
                )
                .with_hero(hero.name.clone())
                .with_reason(reason)
                .with_resources("Exploration Manuals")
                .with_tag("pve")
                .with_tag("exploration"),
            );
        }
    }

    recs
}

fn star_progression(
    owned: &[OwnedHero],
    catalog: &Catalog,
    current_gen: u32,
    top_heroes: &HashSet<&str>,
    profile: &Profile,
) -> Vec<Recommendation> {
    let mut recs = Vec::new();
    let gate_by_focus = matches!(
        profile.spending_profile,
        SpendingProfile::F2p | SpendingProfile::Minnow
    );

    for hero in owned {
        let entry = catalog.effective_entry(&hero.name);
        let relevance = scorer::generation_relevance(&entry, current_gen);
        if scorer::tier_score(&entry) * relevance < 0.5 {
            continue;
        }
        if hero.stars >= 5 || hero.level < 40 {
            continue;
        }

        let is_top_hero = top_heroes.contains(hero.name.as_str());
        if gate_by_focus && !is_top_hero {
            continue;
        }
        let priority_bonus = if is_top_hero { 0 } else { 1 };

        let mut reason = format!(
            "{:?} tier hero at {} stars. Star upgrades provide significant stat boosts.",
            entry.tier_overall, hero.stars
        );
        match profile.spending_profile {
            SpendingProfile::F2p => reason.push_str(" Save universal shards for top 3 heroes only."),
            SpendingProfile::Minnow if !is_top_hero => {
                reason.push_str(" Lower priority — focus resources on core heroes.")
            }
            _ => {}
        }

        recs.push(
            Recommendation::new(
                "ascend_stars",
                3 + priority_bonus,
                format!("Ascend {} to {} stars", hero.name, hero.stars + 1),
                Category::Hero,
                Source::Rules,
            )
            .with_hero(hero.name.clone())
            .with_reason(reason)
            .with_resources(format!("{} shards or universal shards", hero.name))
            .with_tag("all"),
        );
    }

    recs
}

fn farm_account(owned: &[OwnedHero], ranked: &[String], profile: &Profile) -> Vec<Recommendation> {
    let mut recs = Vec::new();

    if ranked.len() > 1 {
        recs.push(
            Recommendation::new("farm_hero_focus", 1, "Focus on 1-2 heroes only", Category::Hero, Source::Rules)
                .with_hero("Farm Focus")
                .with_reason(
                    "Farm accounts should minimize hero investment. Pick 1 main hero (usually your \
                     strongest infantry) and possibly 1 joiner hero.",
                )
                .with_resources("Redirect other resources to main account")
                .with_tag("farm"),
        );
    }

    if profile.priorities.svs >= 3 {
        match find_owned(owned, "Jessie") {
            Some(jessie) => {
                let skill = jessie.expedition_skill_1();
                if skill < 5 {
                    recs.push(
                        Recommendation::new(
                            "farm_jessie_skill",
                            2,
                            "Max Jessie's expedition skill on farm",
                            Category::Hero,
                            Source::Rules,
                        )
                        .with_hero("Jessie")
                        .with_reason(format!(
                            "Farm accounts joining rallies should max Jessie's Stand of Arms (currently L{skill}). \
                             Other heroes don't matter."
                        ))
                        .with_resources("Expedition Manuals")
                        .with_tag("farm")
                        .with_tag("rally"),
                    );
                }
            }
            None => recs.push(
                Recommendation::new(
                    "farm_unlock_jessie",
                    2,
                    "Unlock Jessie on farm account",
                    Category::Hero,
                    Source::Rules,
                )
                .with_hero("Jessie")
                .with_reason(
                    "For farm accounts joining rallies, Jessie is the only hero that matters. Get her and \
                     max her expedition skill.",
                )
                .with_resources("Jessie shards from events")
                .with_tag("farm")
                .with_tag("rally"),
            ),
        }
    }

    let has_exploration_investment = owned
        .iter()
        .any(|h| h.exploration_skill_levels.iter().any(|&level| level > 1));
    if has_exploration_investment {
        recs.push(
            Recommendation::new("farm_skip_exploration", 3, "Skip exploration skills on farm", Category::Hero, Source::Rules)
                .with_hero("Farm Focus")
                .with_reason("Exploration skills are wasted on farm accounts. Save manuals for your main account.")
                .with_resources("Transfer resources to main")
                .with_tag("farm"),
        );
    }

    recs
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::model::owned_hero::GearSlot;
    use crate::model::{AllianceRole, Priorities};

    fn empty_catalog() -> Catalog {
        Catalog::for_tests(Vec::new(), HashMap::new())
    }

    fn profile(priorities: Priorities, spending: SpendingProfile, is_farm: bool) -> Profile {
        Profile {
            server_age_days: 60,
            furnace_level: 20,
            furnace_fc_level: None,
            spending_profile: spending,
            alliance_role: AllianceRole::Filler,
            priorities,
            is_farm_account: is_farm,
            linked_main_profile_id: None,
        }
    }

    fn hero(name: &str, level: u8) -> OwnedHero {
        OwnedHero {
            name: name.to_string(),
            level,
            stars: 1,
            ascension: 0,
            expedition_skill_levels: [1, 1, 1],
            exploration_skill_levels: [1, 1, 1],
            gear: [GearSlot::default(); 4],
            mythic_gear: None,
        }
    }

    #[test]
    fn empty_roster_returns_single_no_heroes_recommendation() {
        let catalog = empty_catalog();
        let profile = profile(
            Priorities { svs: 3, rally: 3, castle: 3, exploration: 3, gathering: 3 },
            SpendingProfile::F2p,
            false,
        );
        let recs = analyze(&profile, &[], &catalog);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].rule_id, "no_heroes");
    }

    #[test]
    fn missing_jessie_with_high_rally_priority_recommends_unlock() {
        let catalog = empty_catalog();
        let profile = profile(
            Priorities { svs: 1, rally: 4, castle: 1, exploration: 1, gathering: 1 },
            SpendingProfile::F2p,
            false,
        );
        let owned = vec![hero("Alonso", 45)];
        let recs = analyze(&profile, &owned, &catalog);
        let unlock = recs.iter().find(|r| r.rule_id == "unlock_jessie").expect("expected unlock_jessie rec");
        assert_eq!(unlock.priority, 1);
    }

    #[test]
    fn farm_account_with_multiple_heroes_recommends_focus() {
        let catalog = empty_catalog();
        let profile = profile(
            Priorities { svs: 1, rally: 1, castle: 1, exploration: 1, gathering: 1 },
            SpendingProfile::F2p,
            true,
        );
        let owned = vec![hero("Alonso", 45), hero("Molly", 45)];
        let recs = analyze(&profile, &owned, &catalog);
        assert!(recs.iter().any(|r| r.rule_id == "farm_hero_focus"));
    }
}
