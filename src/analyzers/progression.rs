//! Progression tracker (C6, §4.6): maps a profile to a phase and emits
//! phase-appropriate recommendations.

use crate::model::{Category, Profile, Recommendation, Source};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    EarlyGrowth,
    CoreBuilding,
    PreFortressCity,
    FortressCityPush,
}

#[derive(Debug, Clone)]
pub struct PhaseInfo {
    pub phase_id: String,
    pub phase_name: String,
    pub focus_areas: Vec<String>,
    pub common_mistakes: Vec<String>,
    pub bottlenecks: Vec<String>,
    pub next_milestone: String,
}

/// Parse the numeric prefix out of a `"FC<n>-<m>"` string, e.g. `"FC3-2"` -> `(3, 2)`.
pub fn parse_fc_level(raw: &str) -> Option<(u32, u32)> {
    let rest = raw.strip_prefix("FC")?;
    let (major, minor) = rest.split_once('-')?;
    Some((major.parse().ok()?, minor.parse().ok()?))
}

fn phase_for(profile: &Profile) -> Phase {
    if profile.furnace_level < 10 {
        Phase::EarlyGrowth
    } else if profile.furnace_level < 20 {
        Phase::CoreBuilding
    } else if profile.furnace_level < 30 {
        Phase::PreFortressCity
    } else {
        Phase::FortressCityPush
    }
}

pub fn phase_info(profile: &Profile) -> PhaseInfo {
    match phase_for(profile) {
        Phase::EarlyGrowth => PhaseInfo {
            phase_id: "early_growth".to_string(),
            phase_name: "Early Growth".to_string(),
            focus_areas: vec![
                "Furnace upgrades".to_string(),
                "Research queue".to_string(),
                "Joining alliance rallies for free rewards".to_string(),
            ],
            common_mistakes: vec!["Spending gems on speedups instead of saving for events".to_string()],
            bottlenecks: vec!["Building queue times".to_string()],
            next_milestone: "Reach Furnace 10".to_string(),
        },
        Phase::CoreBuilding => PhaseInfo {
            phase_id: "core_building".to_string(),
            phase_name: "Core Building".to_string(),
            focus_areas: vec![
                "Hero leveling on 2-3 core heroes".to_string(),
                "Chief Gear Ring/Amulet".to_string(),
                "Troop training capacity".to_string(),
            ],
            common_mistakes: vec!["Spreading hero gear across too many heroes".to_string()],
            bottlenecks: vec!["Resource production vs. troop upkeep".to_string()],
            next_milestone: "Reach Furnace 20".to_string(),
        },
        Phase::PreFortressCity => PhaseInfo {
            phase_id: "pre_fortress_city".to_string(),
            phase_name: "Pre-Fortress City".to_string(),
            focus_areas: vec![
                "Maxing Furnace 30 prerequisites".to_string(),
                "Stockpiling materials ahead of the FC push".to_string(),
            ],
            common_mistakes: vec!["Starting Fortress City research before Furnace 30".to_string()],
            bottlenecks: vec!["Fortress City unlock requirements".to_string()],
            next_milestone: "Reach Furnace 30 and unlock Fortress City".to_string(),
        },
        Phase::FortressCityPush => {
            let (tier, sub_tier) = profile
                .furnace_fc_level
                .as_deref()
                .and_then(parse_fc_level)
                .unwrap_or((1, 1));
            PhaseInfo {
                phase_id: format!("fc{tier}_push"),
                phase_name: format!("Fortress City {tier}-{sub_tier} Push"),
                focus_areas: vec![
                    "Fortress City sub-tier research order".to_string(),
                    "Mythic chief gear and hero gear".to_string(),
                ],
                common_mistakes: vec!["Rushing sub-tiers out of research-dependency order".to_string()],
                bottlenecks: vec!["Fortress City material costs scale steeply per sub-tier".to_string()],
                next_milestone: format!("Reach FC{}-{}", tier, sub_tier + 1),
            }
        }
    }
}

pub fn analyze(profile: &Profile) -> Vec<Recommendation> {
    let info = phase_info(profile);
    let mut recs = vec![
        Recommendation::new(
            &format!("phase_focus_{}", info.phase_id),
            3,
            format!("Focus on: {}", info.focus_areas.join(", ")),
            Category::Progression,
            Source::Rules,
        )
        .with_reason(format!("Currently in {}. {}", info.phase_name, info.next_milestone))
        .with_tag("progression"),
    ];

    if let Some(mistake) = info.common_mistakes.first() {
        recs.push(
            Recommendation::new(
                &format!("phase_mistake_{}", info.phase_id),
                2,
                format!("Avoid: {mistake}"),
                Category::Progression,
                Source::Rules,
            )
            .with_reason(mistake.clone())
            .with_tag("progression"),
        );
    }

    recs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AllianceRole, Priorities, SpendingProfile};

    fn profile_with_furnace(level: u32, fc: Option<&str>) -> Profile {
        Profile {
            server_age_days: 200,
            furnace_level: level,
            furnace_fc_level: fc.map(str::to_string),
            spending_profile: SpendingProfile::F2p,
            alliance_role: AllianceRole::Filler,
            priorities: Priorities { svs: 3, rally: 3, castle: 3, exploration: 3, gathering: 3 },
            is_farm_account: false,
            linked_main_profile_id: None,
        }
    }

    #[test]
    fn parses_fc_level_numeric_prefix() {
        assert_eq!(parse_fc_level("FC3-2"), Some((3, 2)));
        assert_eq!(parse_fc_level("garbage"), None);
    }

    #[test]
    fn phase_boundaries_follow_furnace_level() {
        assert_eq!(phase_for(&profile_with_furnace(5, None)), Phase::EarlyGrowth);
        assert_eq!(phase_for(&profile_with_furnace(15, None)), Phase::CoreBuilding);
        assert_eq!(phase_for(&profile_with_furnace(25, None)), Phase::PreFortressCity);
        assert_eq!(phase_for(&profile_with_furnace(30, None)), Phase::FortressCityPush);
    }

    #[test]
    fn fortress_city_phase_reads_fc_sub_tier() {
        let info = phase_info(&profile_with_furnace(32, Some("FC4-1")));
        assert_eq!(info.phase_id, "fc4_push");
        assert_eq!(info.next_milestone, "Reach FC4-2");
    }
}
