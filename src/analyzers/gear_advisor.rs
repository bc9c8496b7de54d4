//! Gear advisor (C4, §4.4): chief-gear and hero-gear recommendations.

use crate::model::chief_gear::{ChiefGearSlotKind, CHIEF_GEAR_PRIORITY_ORDER};
use crate::model::{Category, ChiefGear, GearTier, OwnedHero, Profile, Recommendation, SpendingProfile, Source};

/// Hard-coded reason text per slot, in [CHIEF_GEAR_PRIORITY_ORDER] order.
fn slot_reason(kind: ChiefGearSlotKind) -> &'static str {
    match kind {
        ChiefGearSlotKind::Ring => "Universal attack buff for ALL troops",
        ChiefGearSlotKind::Amulet => "PvP decisive - affects kill rates in SvS",
        ChiefGearSlotKind::Gloves => "Boosts marksman heroes (Alonso, Molly)",
        ChiefGearSlotKind::Boots => "Boosts lancer heroes",
        ChiefGearSlotKind::Helmet => "Defensive - less impactful than attack stats",
        ChiefGearSlotKind::Armor => "Defensive - least priority",
    }
}

fn hero_gear_limit(spending: SpendingProfile) -> usize {
    match spending {
        SpendingProfile::F2p => 1,
        SpendingProfile::Minnow => 2,
        SpendingProfile::Dolphin => 3,
        SpendingProfile::Orca => 4,
        SpendingProfile::Whale => usize::MAX,
    }
}

/// Candidate hero-gear targets outside f2p's Molly/Alonso special case,
/// in priority order.
const HERO_GEAR_TARGETS: [&str; 3] = ["Alonso", "Jeronimo", "Molly"];

fn has_gear(hero: &OwnedHero) -> bool {
    hero.gear.iter().any(|slot| slot.quality > 0)
}

pub fn analyze(profile: &Profile, chief_gear: Option<&ChiefGear>, owned: &[OwnedHero]) -> Vec<Recommendation> {
    let mut recs = Vec::new();
    recs.extend(chief_gear_recs(chief_gear));
    recs.extend(hero_gear_recs(profile.spending_profile, owned));
    recs.extend(common_mistakes(chief_gear, owned));

    recs.sort_by_key(|r| r.priority);
    recs
}

fn chief_gear_recs(chief_gear: Option<&ChiefGear>) -> Vec<Recommendation> {
    let chief_gear = match chief_gear {
        None => {
            return vec![
                Recommendation::new(
                    "ring_first",
                    1,
                    "Focus on upgrading Ring to Legendary",
                    Category::Gear,
                    Source::Rules,
                )
                .with_reason("Ring affects ALL troop attack. Top priority for everyone.")
                .with_resources("Hardened Alloy, Polishing Solution, Design Plans")
                .with_tag("all")
                .with_tag("svs")
                .with_tag("rally"),
                Recommendation::new(
                    "amulet_second",
                    2,
                    "Upgrade Amulet to Legendary",
                    Category::Gear,
                    Source::Rules,
                )
                .with_reason("Amulet provides Lethality - crucial for PvP kill rates.")
                .with_resources("Hardened Alloy, Polishing Solution, Design Plans")
                .with_tag("svs")
                .with_tag("rally")
                .with_tag("pvp"),
            ];
        }
        Some(g) => g,
    };

    let mut recs = Vec::new();
    for (index, &kind) in CHIEF_GEAR_PRIORITY_ORDER.iter().enumerate() {
        let quality = chief_gear.slot(kind).quality;
        let ordinal = quality.ordinal();
        if ordinal >= GearTier::Legendary.ordinal() {
            continue;
        }
        let base_priority = (index + 1) as u8;
        let priority = if ordinal < GearTier::Rare.ordinal() {
            base_priority.saturating_sub(1).max(1)
        } else {
            base_priority
        };
        recs.push(
            Recommendation::new(
                &format!("upgrade_{}", kind.label().to_lowercase()),
                priority,
                format!("Upgrade {} to Legendary (currently {:?})", kind.label(), quality),
                Category::Gear,
                Source::Rules,
            )
            .with_reason(slot_reason(kind))
            .with_resources("Hardened Alloy, Polishing Solution, Design Plans")
            .with_tag("all"),
        );
    }

    let ring_ordinal = chief_gear.ring.quality.ordinal();
    let amulet_ordinal = chief_gear.amulet.quality.ordinal();
    if ring_ordinal >= GearTier::Legendary.ordinal() && amulet_ordinal >= GearTier::Legendary.ordinal() {
        if ring_ordinal < GearTier::Mythic.ordinal() {
            recs.push(
                Recommendation::new("mythic_ring", 2, "Push Ring to Mythic", Category::Gear, Source::Rules)
                    .with_reason("Legendary Ring done. Mythic Ring is long-term goal for max attack.")
                    .with_resources("Lunar Amber, Mythic materials")
                    .with_tag("endgame"),
            );
        }
        if amulet_ordinal < GearTier::Mythic.ordinal() {
            recs.push(
                Recommendation::new("mythic_amulet", 3, "Push Amulet to Mythic", Category::Gear, Source::Rules)
                    .with_reason("Legendary Amulet done. Mythic Amulet is next priority.")
                    .with_resources("Lunar Amber, Mythic materials")
                    .with_tag("endgame"),
            );
        }
    }

    recs
}

fn hero_gear_recs(spending: SpendingProfile, owned: &[OwnedHero]) -> Vec<Recommendation> {
    let mut recs = Vec::new();
    let geared: Vec<&OwnedHero> = owned.iter().filter(|h| has_gear(h)).collect();
    let geared_count = geared.len();
    let limit = hero_gear_limit(spending);

    if spending == SpendingProfile::F2p {
        if geared_count > 1 {
            recs.push(
                Recommendation::new(
                    "f2p_hero_gear_limit",
                    1,
                    "Stop spreading hero gear investment",
                    Category::Gear,
                    Source::Rules,
                )
                .with_reason(format!(
                    "F2P should only gear 1 hero (you have {geared_count}). Chief Gear Ring/Amulet should be priority."
                ))
                .with_resources("N/A - this is a warning")
                .with_tag("f2p")
                .with_tag("efficiency"),
            );
        } else if geared_count == 0 {
            recs.push(
                Recommendation::new(
                    "f2p_first_hero_gear",
                    3,
                    "Consider hero gear for Molly OR Alonso (not both)",
                    Category::Gear,
                    Source::Rules,
                )
                .with_hero("Molly or Alonso")
                .with_reason("F2P can invest in one field DPS hero. Only after Ring/Amulet are at Legendary.")
                .with_resources("Hero Gear XP, Essence Stones")
                .with_tag("f2p")
                .with_tag("field_pvp"),
            );
        }
    }

    if spending != SpendingProfile::Whale {
        for joiner in ["Jessie", "Sergey"] {
            if geared.iter().any(|h| h.name == joiner) {
                recs.push(
                    Recommendation::new(
                        "no_joiner_gear",
                        1,
                        format!("Don't invest more hero gear in {joiner}"),
                        Category::Gear,
                        Source::Rules,
                    )
                    .with_hero(joiner)
                    .with_reason(format!(
                        "{joiner} is a joiner hero. Only their expedition skill matters in rallies - hero gear is wasted."
                    ))
                    .with_resources("N/A - redirect to Chief Gear")
                    .with_tag("warning")
                    .with_tag("efficiency"),
                );
            }
        }
    }

    if matches!(spending, SpendingProfile::Minnow | SpendingProfile::Dolphin | SpendingProfile::Orca) {
        for target in HERO_GEAR_TARGETS {
            let owns_target = owned.iter().any(|h| h.name == target);
            let already_geared = geared.iter().any(|h| h.name == target);
            if owns_target && !already_geared && geared_count < limit {
                recs.push(
                    Recommendation::new(
                        &format!("hero_gear_{}", target.to_lowercase()),
                        3,
                        format!("Start hero gear on {target}"),
                        Category::Gear,
                        Source::Rules,
                    )
                    .with_hero(target)
                    .with_reason(format!("{target} is a good hero gear target. Used across multiple modes."))
                    .with_resources("Hero Gear XP, Essence Stones, Mithril")
                    .with_tag("hero_gear"),
                );
            }
        }
    }

    recs
}

fn common_mistakes(chief_gear: Option<&ChiefGear>, owned: &[OwnedHero]) -> Vec<Recommendation> {
    let Some(chief_gear) = chief_gear else {
        return Vec::new();
    };
    let mut recs = Vec::new();
    let geared_any = owned.iter().any(|h| has_gear(h));

    let ring_ordinal = chief_gear.ring.quality.ordinal();
    let amulet_ordinal = chief_gear.amulet.quality.ordinal();
    if geared_any && (ring_ordinal < GearTier::Legendary.ordinal() || amulet_ordinal < GearTier::Legendary.ordinal()) {
        recs.push(
            Recommendation::new(
                "chief_before_hero",
                1,
                "Prioritize Chief Gear Ring/Amulet over Hero Gear",
                Category::Gear,
                Source::Rules,
            )
            .with_reason(
                "Chief Gear multiplies ALL damage. Hero Gear only affects one hero. Ring/Amulet to Legendary first.",
            )
            .with_resources("Hardened Alloy, Polishing Solution")
            .with_tag("warning")
            .with_tag("efficiency"),
        );
    }

    let helmet_ordinal = chief_gear.helmet.quality.ordinal();
    let armor_ordinal = chief_gear.armor.quality.ordinal();
    if helmet_ordinal > ring_ordinal || armor_ordinal > amulet_ordinal {
        recs.push(
            Recommendation::new(
                "attack_before_defense",
                2,
                "Stop upgrading Infantry defensive gear",
                Category::Gear,
                Source::Rules,
            )
            .with_reason("Defensive gear is low priority. Ring/Amulet attack stats win more battles than infantry defense.")
            .with_resources("N/A - redirect materials to Ring/Amulet")
            .with_tag("warning"),
        );
    }

    recs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::chief_gear::ChiefGearSlot;
    use crate::model::owned_hero::GearSlot;
    use crate::model::{AllianceRole, Priorities};

    fn gear_at(ring: GearTier, amulet: GearTier) -> ChiefGear {
        ChiefGear {
            ring: ChiefGearSlot { quality: ring },
            amulet: ChiefGearSlot { quality: amulet },
            helmet: ChiefGearSlot { quality: GearTier::Common },
            armor: ChiefGearSlot { quality: GearTier::Common },
            gloves: ChiefGearSlot { quality: GearTier::Common },
            boots: ChiefGearSlot { quality: GearTier::Common },
        }
    }

    fn f2p_profile() -> Profile {
        Profile {
            server_age_days: 60,
            furnace_level: 20,
            furnace_fc_level: None,
            spending_profile: SpendingProfile::F2p,
            alliance_role: AllianceRole::Filler,
            priorities: Priorities { svs: 3, rally: 3, castle: 3, exploration: 3, gathering: 3 },
            is_farm_account: false,
            linked_main_profile_id: None,
        }
    }

    fn geared_hero(name: &str) -> OwnedHero {
        let mut gear = [GearSlot::default(); 4];
        gear[0].quality = 3;
        OwnedHero {
            name: name.to_string(),
            level: 60,
            stars: 3,
            ascension: 2,
            expedition_skill_levels: [3, 3, 3],
            exploration_skill_levels: [1, 1, 1],
            gear,
            mythic_gear: None,
        }
    }

    #[test]
    fn no_chief_gear_emits_starter_recs() {
        let recs = analyze(&f2p_profile(), None, &[]);
        assert_eq!(recs[0].rule_id, "ring_first");
        assert_eq!(recs[1].rule_id, "amulet_second");
    }

    #[test]
    fn f2p_over_investment_and_chief_before_hero_both_trigger() {
        let gear = gear_at(GearTier::Rare, GearTier::Common);
        let owned = vec![geared_hero("Alonso"), geared_hero("Molly")];
        let recs = analyze(&f2p_profile(), Some(&gear), &owned);

        let f2p_limit = recs.iter().find(|r| r.rule_id == "f2p_hero_gear_limit").expect("expected f2p_hero_gear_limit");
        assert_eq!(f2p_limit.priority, 1);
        let chief_first = recs.iter().find(|r| r.rule_id == "chief_before_hero").expect("expected chief_before_hero");
        assert_eq!(chief_first.priority, 1);

        let ring = recs.iter().find(|r| r.rule_id == "upgrade_ring").expect("expected upgrade_ring");
        assert_eq!(ring.priority, 1);
        // Amulet is Common (ordinal 1), below Rare, so the §4.4 bump applies: max(1, 2-1) = 1.
        let amulet = recs.iter().find(|r| r.rule_id == "upgrade_amulet").expect("expected upgrade_amulet");
        assert_eq!(amulet.priority, 1);
    }

    #[test]
    fn mythic_push_only_when_ring_and_amulet_both_legendary() {
        let gear = gear_at(GearTier::Legendary, GearTier::Legendary);
        let recs = analyze(&f2p_profile(), Some(&gear), &[]);
        assert!(recs.iter().any(|r| r.rule_id == "mythic_ring"));
        assert!(recs.iter().any(|r| r.rule_id == "mythic_amulet"));
    }

    #[test]
    fn joiner_gear_warning_skipped_for_whale() {
        let gear = gear_at(GearTier::Legendary, GearTier::Legendary);
        let owned = vec![geared_hero("Jessie")];
        let mut profile = f2p_profile();
        profile.spending_profile = SpendingProfile::Whale;
        let recs = analyze(&profile, Some(&gear), &owned);
        assert!(!recs.iter().any(|r| r.rule_id == "no_joiner_gear"));
    }
}
