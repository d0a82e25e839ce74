//! Boss and encounter identification data
//!
//! Maps recorder species ids to boss metadata and groups simultaneous
//! bosses into one encounter. Lookups are pure and total: unknown ids
//! resolve to `None`/generic entries, never an error.

use phf::phf_map;

use super::GameLanguage;

/// The boss-defined unit of analysis a log belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum Encounter {
    ValeGuardian,
    Gorseval,
    Sabetha,
    Slothasor,
    Matthias,
    KeepConstruct,
    Xera,
    Cairn,
    MursaatOverseer,
    Samarog,
    Deimos,
    SoullessHorror,
    Dhuum,
    ConjuredAmalgamate,
    TwinLargos,
    Qadim,
    Adina,
    Sabir,
    QadimThePeerless,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BossInfo {
    pub name: &'static str,
    pub encounter: Encounter,
}

static BOSSES: phf::Map<u16, BossInfo> = phf_map! {
    15438u16 => BossInfo { name: "Vale Guardian", encounter: Encounter::ValeGuardian },
    15429u16 => BossInfo { name: "Gorseval the Multifarious", encounter: Encounter::Gorseval },
    15375u16 => BossInfo { name: "Sabetha the Saboteur", encounter: Encounter::Sabetha },
    16123u16 => BossInfo { name: "Slothasor", encounter: Encounter::Slothasor },
    16115u16 => BossInfo { name: "Matthias Gabrel", encounter: Encounter::Matthias },
    16235u16 => BossInfo { name: "Keep Construct", encounter: Encounter::KeepConstruct },
    16246u16 => BossInfo { name: "Xera", encounter: Encounter::Xera },
    17194u16 => BossInfo { name: "Cairn the Indomitable", encounter: Encounter::Cairn },
    17172u16 => BossInfo { name: "Mursaat Overseer", encounter: Encounter::MursaatOverseer },
    17188u16 => BossInfo { name: "Samarog", encounter: Encounter::Samarog },
    17154u16 => BossInfo { name: "Deimos", encounter: Encounter::Deimos },
    19767u16 => BossInfo { name: "Soulless Horror", encounter: Encounter::SoullessHorror },
    19450u16 => BossInfo { name: "Dhuum", encounter: Encounter::Dhuum },
    43974u16 => BossInfo { name: "Conjured Amalgamate", encounter: Encounter::ConjuredAmalgamate },
    21105u16 => BossInfo { name: "Nikare", encounter: Encounter::TwinLargos },
    21089u16 => BossInfo { name: "Kenut", encounter: Encounter::TwinLargos },
    20934u16 => BossInfo { name: "Qadim", encounter: Encounter::Qadim },
    22006u16 => BossInfo { name: "Cardinal Adina", encounter: Encounter::Adina },
    21964u16 => BossInfo { name: "Cardinal Sabir", encounter: Encounter::Sabir },
    22000u16 => BossInfo { name: "Qadim the Peerless", encounter: Encounter::QadimThePeerless },
};

pub fn boss_info(species_id: u16) -> Option<&'static BossInfo> {
    BOSSES.get(&species_id)
}

pub fn encounter_for_species(species_id: u16) -> Option<Encounter> {
    BOSSES.get(&species_id).map(|info| info.encounter)
}

/// All species ids that constitute one encounter, in detection-priority
/// order. Most encounters have exactly one boss.
pub fn encounter_species(encounter: Encounter) -> &'static [u16] {
    match encounter {
        Encounter::ValeGuardian => &[15438],
        Encounter::Gorseval => &[15429],
        Encounter::Sabetha => &[15375],
        Encounter::Slothasor => &[16123],
        Encounter::Matthias => &[16115],
        Encounter::KeepConstruct => &[16235],
        Encounter::Xera => &[16246],
        Encounter::Cairn => &[17194],
        Encounter::MursaatOverseer => &[17172],
        Encounter::Samarog => &[17188],
        Encounter::Deimos => &[17154],
        Encounter::SoullessHorror => &[19767],
        Encounter::Dhuum => &[19450],
        Encounter::ConjuredAmalgamate => &[43974],
        Encounter::TwinLargos => &[21105, 21089],
        Encounter::Qadim => &[20934],
        Encounter::Adina => &[22006],
        Encounter::Sabir => &[21964],
        Encounter::QadimThePeerless => &[22000],
    }
}

/// Canonical encounter display name. Names are currently shipped in
/// English only; other languages fall back to it.
pub fn encounter_name(encounter: Encounter, _language: GameLanguage) -> &'static str {
    match encounter {
        Encounter::ValeGuardian => "Vale Guardian",
        Encounter::Gorseval => "Gorseval",
        Encounter::Sabetha => "Sabetha",
        Encounter::Slothasor => "Slothasor",
        Encounter::Matthias => "Matthias Gabrel",
        Encounter::KeepConstruct => "Keep Construct",
        Encounter::Xera => "Xera",
        Encounter::Cairn => "Cairn",
        Encounter::MursaatOverseer => "Mursaat Overseer",
        Encounter::Samarog => "Samarog",
        Encounter::Deimos => "Deimos",
        Encounter::SoullessHorror => "Soulless Horror",
        Encounter::Dhuum => "Dhuum",
        Encounter::ConjuredAmalgamate => "Conjured Amalgamate",
        Encounter::TwinLargos => "Twin Largos",
        Encounter::Qadim => "Qadim",
        Encounter::Adina => "Cardinal Adina",
        Encounter::Sabir => "Cardinal Sabir",
        Encounter::QadimThePeerless => "Qadim the Peerless",
    }
}
