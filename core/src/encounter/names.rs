//! Encounter naming strategies
//!
//! Naming is pluggable over a single capability: given encounter data and
//! a language, produce a name or `None`. Providers never fail — "name
//! unknown" is a valid answer callers must handle.

use crate::game_data::{self, GameLanguage};

use super::EncounterData;

pub trait EncounterNameProvider: Send + Sync {
    fn encounter_name(&self, data: &EncounterData, language: GameLanguage) -> Option<String>;
}

/// Uses the display name of one of the encounter's bosses as the
/// encounter name.
pub struct BossEncounterNameProvider {
    /// If the encounter has multiple bosses, the index of the boss chosen.
    pub boss_index: usize,
}

impl BossEncounterNameProvider {
    pub fn new(boss_index: usize) -> Self {
        Self { boss_index }
    }
}

impl Default for BossEncounterNameProvider {
    fn default() -> Self {
        Self::new(0)
    }
}

impl EncounterNameProvider for BossEncounterNameProvider {
    fn encounter_name(&self, data: &EncounterData, _language: GameLanguage) -> Option<String> {
        data.targets
            .get(self.boss_index)
            .map(|boss| boss.name.clone())
    }
}

/// Uses the canonical name from the game-data registry for identified
/// encounters. Returns `None` for logs whose encounter was not
/// identified.
pub struct RegistryEncounterNameProvider;

impl EncounterNameProvider for RegistryEncounterNameProvider {
    fn encounter_name(&self, data: &EncounterData, language: GameLanguage) -> Option<String> {
        data.encounter
            .map(|encounter| game_data::encounter_name(encounter, language).to_string())
    }
}

/// Tries providers in priority order and takes the first name any of
/// them produces.
pub struct CompositeNameProvider {
    providers: Vec<Box<dyn EncounterNameProvider>>,
}

impl CompositeNameProvider {
    pub fn new(providers: Vec<Box<dyn EncounterNameProvider>>) -> Self {
        Self { providers }
    }

    /// The default naming chain: registry name first, boss display name
    /// as the fallback.
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(RegistryEncounterNameProvider),
            Box::new(BossEncounterNameProvider::default()),
        ])
    }
}

impl EncounterNameProvider for CompositeNameProvider {
    fn encounter_name(&self, data: &EncounterData, language: GameLanguage) -> Option<String> {
        self.providers
            .iter()
            .find_map(|p| p.encounter_name(data, language))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::model::{Agent, AgentKind};

    fn npc(name: &str, species_id: u16) -> Arc<Agent> {
        Arc::new(Agent {
            name: name.to_string(),
            kind: AgentKind::Npc { species_id },
            ..Agent::unknown()
        })
    }

    #[test]
    fn empty_target_list_yields_no_name() {
        let provider = BossEncounterNameProvider::default();
        let data = EncounterData::default();
        assert_eq!(
            provider.encounter_name(&data, GameLanguage::English),
            None,
            "callers must treat a missing name as unknown, not crash"
        );
    }

    #[test]
    fn boss_index_selects_the_target() {
        let data = EncounterData::new(None, vec![npc("Nikare", 21105), npc("Kenut", 21089)]);
        let provider = BossEncounterNameProvider::new(1);
        assert_eq!(
            provider.encounter_name(&data, GameLanguage::English),
            Some("Kenut".to_string())
        );
    }

    #[test]
    fn out_of_range_index_yields_no_name() {
        let data = EncounterData::new(None, vec![npc("Nikare", 21105), npc("Kenut", 21089)]);
        let provider = BossEncounterNameProvider::new(5);
        assert_eq!(provider.encounter_name(&data, GameLanguage::English), None);
    }

    #[test]
    fn composite_takes_first_non_null() {
        let data = EncounterData::new(
            Some(crate::game_data::Encounter::TwinLargos),
            vec![npc("Nikare", 21105)],
        );
        let composite = CompositeNameProvider::standard();
        assert_eq!(
            composite.encounter_name(&data, GameLanguage::English),
            Some("Twin Largos".to_string())
        );

        // Without a registry identification the boss name falls through.
        let unidentified = EncounterData::new(None, vec![npc("Nikare", 21105)]);
        assert_eq!(
            composite.encounter_name(&unidentified, GameLanguage::English),
            Some("Nikare".to_string())
        );
    }
}
