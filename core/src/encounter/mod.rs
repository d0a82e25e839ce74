pub mod identifier;
pub mod names;
pub mod results;

use crate::game_data::Encounter;
use crate::model::AgentRef;

/// Outcome classification for one log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub enum EncounterResult {
    Success,
    Failure,
    /// "Don't know" is always a valid answer in this domain and is
    /// preferred over aborting analysis of an otherwise usable log.
    #[default]
    Unknown,
}

impl std::fmt::Display for EncounterResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EncounterResult::Success => "Success",
            EncounterResult::Failure => "Failure",
            EncounterResult::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

/// The target agents that constitute the encounter.
///
/// Insertion order is detection order (registry species order, then agent
/// table order), not combat order.
#[derive(Debug, Clone, Default)]
pub struct EncounterData {
    pub encounter: Option<Encounter>,
    pub targets: Vec<AgentRef>,
}

impl EncounterData {
    pub fn new(encounter: Option<Encounter>, targets: Vec<AgentRef>) -> Self {
        Self { encounter, targets }
    }
}
