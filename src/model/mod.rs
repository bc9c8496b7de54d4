//! Value types for the advisory engine (DESIGN §3).
//!
//! Everything here is a plain serde struct/enum, mirroring the teacher's
//! `data::hostile::HostileRecord` / `data::officer::Officer` shape: no ORM,
//! no `getattr`-style duck typing, one canonical type per concept.

pub mod chief_gear;
pub mod conversation;
pub mod hero_catalog;
pub mod lineup;
pub mod lineup_template;
pub mod owned_hero;
pub mod profile;
pub mod rate_state;
pub mod recommendation;
pub mod user;

pub use chief_gear::{ChiefGear, ChiefGearSlot, ChiefGearSlotKind, GearTier};
pub use conversation::ConversationRecord;
pub use hero_catalog::{HeroClass, HeroEntry, Tier};
pub use lineup::{AssignedSlot, Confidence, JoinerRecommendation, LineupRecommendation, TroopRatio};
pub use lineup_template::{LineupTemplate, Slot};
pub use owned_hero::{GearSlot, OwnedHero};
pub use profile::{AllianceRole, Priorities, Profile, SpendingProfile};
pub use rate_state::UserRateState;
pub use recommendation::{Category, Recommendation, Source};
pub use user::{User, UserRole};
