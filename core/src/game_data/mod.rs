mod bosses;
mod professions;

pub use bosses::{
    BossInfo, Encounter, boss_info, encounter_for_species, encounter_name, encounter_species,
};
pub use professions::profession_name;

/// Skill ids of commonly tracked boons.
pub mod buff_ids {
    pub const MIGHT: u32 = 740;
    pub const FURY: u32 = 725;
    pub const QUICKNESS: u32 = 1187;
    pub const ALACRITY: u32 = 30328;
}

/// Client language the log was recorded under. Name lookups take it so
/// localized tables can be added without touching call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameLanguage {
    #[default]
    English,
    French,
    German,
    Spanish,
    Chinese,
}
