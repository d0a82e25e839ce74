//! EVTC combat log analysis engine
//!
//! Turns raw EVTC recordings into a structured, analyzable timeline:
//! typed agents/skills/events, reconstructed buff intervals, an
//! identified encounter with a derived name, an outcome verdict, and
//! per-agent statistics. The engine performs no I/O: callers hand it raw
//! log bytes and consume the immutable analysis output.

pub mod buffs;
pub mod encounter;
pub mod evtc;
pub mod game_data;
pub mod model;
pub mod statistics;

mod analyzer;

#[cfg(test)]
pub(crate) mod test_util;

// Re-exports for convenience
pub use analyzer::{LogAnalysis, LogAnalyzer};
pub use buffs::{BuffSimulator, BuffStack, StackRemovalOrder};
pub use encounter::identifier::EncounterIdentifier;
pub use encounter::names::{
    BossEncounterNameProvider, CompositeNameProvider, EncounterNameProvider,
    RegistryEncounterNameProvider,
};
pub use encounter::results::{
    AgentDeathResultDeterminer, AgentExitCombatDeterminer, AgentHealthResultDeterminer,
    CombinedResultDeterminer, ConstantResultDeterminer, InvalidConfiguration,
    ResultDeterminer, RewardResultDeterminer,
};
pub use encounter::{EncounterData, EncounterResult};
pub use evtc::{LogError, LogHeader, LogReader, RawLog};
pub use game_data::{Encounter, GameLanguage, boss_info, encounter_name, profession_name};
pub use model::{
    Agent, AgentKind, AgentRef, AgentTable, BuffRemoval, BuiltModel, Event, EventKind,
    ModelBuilder, Skill, SkillRef, SkillTable,
};
pub use statistics::{AgentStatistics, BuffUptime, LogStatistics, StatisticsCalculator};
