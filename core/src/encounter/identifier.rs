//! Encounter identification
//!
//! Selects the ordered list of target agents that constitute the
//! encounter, using the game-data boss registry. Handles encounters that
//! span multiple simultaneous bosses (one registry encounter listing
//! several species).

use tracing::debug;

use crate::game_data::{self, Encounter};
use crate::model::{AgentRef, BuiltModel};

use super::EncounterData;
use super::results::{
    AgentDeathResultDeterminer, CombinedResultDeterminer, ConstantResultDeterminer,
    ResultDeterminer,
};
use crate::EncounterResult;

pub struct EncounterIdentifier;

impl EncounterIdentifier {
    /// Refine the builder's candidate targets into the final encounter
    /// data. Detection order: registry species order, then agent table
    /// order within a species.
    pub fn identify(model: &BuiltModel) -> EncounterData {
        let encounter = detect_encounter(model);

        let Some(encounter) = encounter else {
            // Unregistered encounter: keep whatever the recorder flagged.
            return EncounterData::new(None, model.initial_targets.clone());
        };

        let mut targets: Vec<AgentRef> = Vec::new();
        for &species in game_data::encounter_species(encounter) {
            for agent in model.agents.agents() {
                if agent.species_id() == Some(species) {
                    targets.push(agent.clone());
                }
            }
        }

        debug!(?encounter, targets = targets.len(), "identified encounter");
        EncounterData::new(Some(encounter), targets)
    }

    /// The default outcome strategy for identified targets: every boss
    /// has to die. Logs without targets can only ever be `Unknown`.
    pub fn default_result_determiner(data: &EncounterData) -> Box<dyn ResultDeterminer> {
        if data.targets.is_empty() {
            return Box::new(ConstantResultDeterminer(EncounterResult::Unknown));
        }
        let children: Vec<Box<dyn ResultDeterminer>> = data
            .targets
            .iter()
            .map(|t| {
                Box::new(AgentDeathResultDeterminer::new(t.clone())) as Box<dyn ResultDeterminer>
            })
            .collect();
        match CombinedResultDeterminer::new(children) {
            Ok(combined) => Box::new(combined),
            // Unreachable given the emptiness check above; degrade rather
            // than panic if it ever is.
            Err(_) => Box::new(ConstantResultDeterminer(EncounterResult::Unknown)),
        }
    }
}

fn detect_encounter(model: &BuiltModel) -> Option<Encounter> {
    // Prefer the recorder's designated target species.
    if let Some(encounter) = model
        .initial_targets
        .first()
        .and_then(|t| t.species_id())
        .and_then(game_data::encounter_for_species)
    {
        return Some(encounter);
    }
    // Fall back to scanning the agent table for any registered boss.
    model
        .agents
        .agents()
        .iter()
        .filter_map(|a| a.species_id())
        .find_map(game_data::encounter_for_species)
}
