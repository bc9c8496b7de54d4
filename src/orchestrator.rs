//! Recommendation orchestrator (C8, §4.8): fan out to the rule analyzers,
//! merge, sort, dedupe, and truncate.
//!
//! Grounded on the teacher's `optimizer::mod` -> `ranking` pipeline shape:
//! generate candidates from independent sources, collect into one `Vec`,
//! sort once, then apply a single dedupe/truncate pass.

use std::collections::HashSet;

use crate::analyzers::{gear_advisor, hero_analyzer, progression};
use crate::catalog::Catalog;
use crate::model::{ChiefGear, OwnedHero, Profile, Recommendation};

/// §4.8: generate -> concatenate -> sort by (priority, insertion order) ->
/// dedupe by case-insensitive action -> truncate to `limit`.
///
/// An empty `owned` set short-circuits to hero_analyzer's single
/// `no_heroes` recommendation (§8 boundary behavior); gear and progression
/// rules are not consulted in that case.
pub fn recommend(
    catalog: &Catalog,
    profile: &Profile,
    owned: &[OwnedHero],
    chief_gear: Option<&ChiefGear>,
    limit: usize,
) -> Vec<Recommendation> {
    if owned.is_empty() {
        let mut recs = hero_analyzer::analyze(profile, owned, catalog);
        recs.truncate(limit);
        return recs;
    }

    let mut merged = Vec::new();
    merged.extend(hero_analyzer::analyze(profile, owned, catalog));
    merged.extend(gear_advisor::analyze(profile, chief_gear, owned));
    merged.extend(progression::analyze(profile));

    merged.sort_by(|a, b| a.priority.cmp(&b.priority));

    let mut seen = HashSet::new();
    merged.retain(|rec| seen.insert(rec.action.to_lowercase()));

    merged.truncate(limit);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AllianceRole, Priorities, SpendingProfile};
    use std::collections::HashMap;

    fn profile() -> Profile {
        Profile {
            server_age_days: 100,
            furnace_level: 15,
            furnace_fc_level: None,
            spending_profile: SpendingProfile::F2p,
            alliance_role: AllianceRole::Filler,
            priorities: Priorities { svs: 3, rally: 3, castle: 3, exploration: 3, gathering: 3 },
            is_farm_account: false,
            linked_main_profile_id: None,
        }
    }

    fn empty_catalog() -> Catalog {
        Catalog::for_tests(Vec::new(), HashMap::new())
    }

    #[test]
    fn empty_roster_returns_exactly_no_heroes() {
        let recs = recommend(&empty_catalog(), &profile(), &[], None, 10);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].rule_id, "no_heroes");
    }

    #[test]
    fn results_are_sorted_by_priority_ascending() {
        let owned = vec![crate::model::OwnedHero {
            name: "Alonso".to_string(),
            level: 20,
            stars: 1,
            ascension: 0,
            expedition_skill_levels: [1, 1, 1],
            exploration_skill_levels: [1, 1, 1],
            gear: Default::default(),
            mythic_gear: None,
        }];
        let recs = recommend(&empty_catalog(), &profile(), &owned, None, 10);
        for window in recs.windows(2) {
            assert!(window[0].priority <= window[1].priority);
        }
    }

    #[test]
    fn dedupes_by_case_insensitive_action() {
        let mut recs = vec![
            Recommendation::new("a", 1, "Do The Thing", crate::model::Category::Hero, crate::model::Source::Rules),
            Recommendation::new("b", 2, "do the thing", crate::model::Category::Hero, crate::model::Source::Rules),
        ];
        let mut seen = HashSet::new();
        recs.retain(|r| seen.insert(r.action.to_lowercase()));
        assert_eq!(recs.len(), 1);
    }

    #[test]
    fn repeated_calls_are_deterministic() {
        let owned = vec![crate::model::OwnedHero {
            name: "Alonso".to_string(),
            level: 20,
            stars: 1,
            ascension: 0,
            expedition_skill_levels: [1, 1, 1],
            exploration_skill_levels: [1, 1, 1],
            gear: Default::default(),
            mythic_gear: None,
        }];
        let first = recommend(&empty_catalog(), &profile(), &owned, None, 10);
        let second = recommend(&empty_catalog(), &profile(), &owned, None, 10);
        let first_ids: Vec<&str> = first.iter().map(|r| r.rule_id.as_str()).collect();
        let second_ids: Vec<&str> = second.iter().map(|r| r.rule_id.as_str()).collect();
        assert_eq!(first_ids, second_ids);
    }
}
