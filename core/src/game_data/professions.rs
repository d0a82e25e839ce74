//! Profession and elite specialization names.

use phf::phf_map;

static PROFESSIONS: phf::Map<u32, &'static str> = phf_map! {
    1u32 => "Guardian",
    2u32 => "Warrior",
    3u32 => "Engineer",
    4u32 => "Ranger",
    5u32 => "Thief",
    6u32 => "Elementalist",
    7u32 => "Mesmer",
    8u32 => "Necromancer",
    9u32 => "Revenant",
};

static ELITE_SPECS: phf::Map<u32, &'static str> = phf_map! {
    5u32 => "Druid",
    7u32 => "Daredevil",
    18u32 => "Berserker",
    27u32 => "Dragonhunter",
    34u32 => "Reaper",
    40u32 => "Chronomancer",
    43u32 => "Scrapper",
    48u32 => "Tempest",
    52u32 => "Herald",
    55u32 => "Soulbeast",
    56u32 => "Weaver",
    57u32 => "Holosmith",
    58u32 => "Deadeye",
    59u32 => "Mirage",
    60u32 => "Scourge",
    61u32 => "Spellbreaker",
    62u32 => "Firebrand",
    64u32 => "Renegade",
};

/// Display name for a player's profession, preferring the elite
/// specialization when one is equipped. Unknown ids degrade to a generic
/// entry rather than failing.
pub fn profession_name(profession: u32, elite_spec: u32) -> &'static str {
    if elite_spec != 0
        && let Some(&name) = ELITE_SPECS.get(&elite_spec)
    {
        return name;
    }
    PROFESSIONS.get(&profession).copied().unwrap_or("Unknown")
}
