//! Pipeline façade
//!
//! Runs the full analysis for one log: reader → model builder →
//! encounter identification → result determination → statistics. One
//! invocation per log, synchronous and CPU-bound; everything it builds
//! is owned by the returned [`LogAnalysis`] and never shared across
//! logs, so callers may run analyzers for different logs on separate
//! threads without locking.

use tracing::debug;

use crate::buffs::BuffSimulator;
use crate::encounter::identifier::EncounterIdentifier;
use crate::encounter::names::{CompositeNameProvider, EncounterNameProvider};
use crate::encounter::{EncounterData, EncounterResult};
use crate::evtc::{LogError, LogHeader, LogReader};
use crate::game_data::{GameLanguage, buff_ids};
use crate::model::{AgentTable, Event, ModelBuilder, SkillTable};
use crate::statistics::{LogStatistics, StatisticsCalculator};

/// The complete, immutable output of analyzing one log.
#[derive(Debug)]
pub struct LogAnalysis {
    pub header: LogHeader,
    pub agents: AgentTable,
    pub skills: SkillTable,
    pub events: Vec<Event>,
    pub encounter: EncounterData,
    pub encounter_name: Option<String>,
    pub result: EncounterResult,
    pub statistics: LogStatistics,
    pub end_time: u64,
}

pub struct LogAnalyzer {
    language: GameLanguage,
    name_provider: Box<dyn EncounterNameProvider>,
    simulator: BuffSimulator,
    statistics: StatisticsCalculator,
}

impl Default for LogAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl LogAnalyzer {
    /// Analyzer with the standard naming chain and boon tracking.
    pub fn new() -> Self {
        Self {
            language: GameLanguage::default(),
            name_provider: Box::new(CompositeNameProvider::standard()),
            simulator: BuffSimulator::new(),
            statistics: StatisticsCalculator::new()
                .with_tracked_buff(buff_ids::MIGHT)
                .with_tracked_buff(buff_ids::FURY)
                .with_tracked_buff(buff_ids::QUICKNESS)
                .with_tracked_buff(buff_ids::ALACRITY),
        }
    }

    pub fn with_language(mut self, language: GameLanguage) -> Self {
        self.language = language;
        self
    }

    pub fn with_name_provider(mut self, provider: Box<dyn EncounterNameProvider>) -> Self {
        self.name_provider = provider;
        self
    }

    pub fn with_statistics(mut self, statistics: StatisticsCalculator) -> Self {
        self.statistics = statistics;
        self
    }

    /// Analyze one log from its raw file contents. Fails only on
    /// structural problems with the byte stream; semantic oddities
    /// degrade (sentinel agents, unknown event kinds, `Unknown` results).
    pub fn analyze(&self, bytes: &[u8]) -> Result<LogAnalysis, LogError> {
        let raw = LogReader::read(bytes)?;
        let model = ModelBuilder::build(&raw);
        let encounter = EncounterIdentifier::identify(&model);

        let encounter_name = self.name_provider.encounter_name(&encounter, self.language);
        let determiner = EncounterIdentifier::default_result_determiner(&encounter);
        let result = determiner.result(&model.events);

        let statistics =
            self.statistics
                .calculate(&model.events, &model.agents, &self.simulator, model.end_time);

        debug!(
            name = encounter_name.as_deref().unwrap_or("?"),
            %result,
            "analysis complete"
        );

        Ok(LogAnalysis {
            header: raw.header,
            agents: model.agents,
            skills: model.skills,
            events: model.events,
            encounter,
            encounter_name,
            result,
            statistics,
            end_time: model.end_time,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{LogWriter, damage, health_update, state, state_change};

    /// A small but complete Vale Guardian log: two players, one boss,
    /// a kill.
    fn sample_log() -> Vec<u8> {
        let mut log = LogWriter::new();
        log.boss_species_id = 15438;
        log.player(1000, "Roija", ":Roija.1234", "1");
        log.player(1001, "Deimos Tross", ":Fries.5612", "2");
        log.npc(2000, "Vale Guardian", 15438);
        log.skill(500, "Greatsword Swing");

        log.event(state_change(100, 1000, state::ENTER_COMBAT));
        log.event(state_change(100, 1001, state::ENTER_COMBAT));
        log.event(damage(150, 1000, 2000, 500, 1200));
        log.event(damage(200, 1001, 2000, 500, 900));
        log.event(health_update(250, 2000, 5000));
        log.event(damage(300, 1000, 2000, 500, 1500));
        log.event(state_change(400, 2000, state::CHANGE_DEAD));
        log.event(state_change(450, 1000, state::EXIT_COMBAT));
        log.bytes()
    }

    #[test]
    fn full_pipeline_identifies_and_classifies() {
        let analysis = LogAnalyzer::new()
            .analyze(&sample_log())
            .expect("valid log");

        assert_eq!(analysis.encounter_name.as_deref(), Some("Vale Guardian"));
        assert_eq!(analysis.result, EncounterResult::Success);
        assert_eq!(analysis.encounter.targets.len(), 1);
        assert_eq!(analysis.end_time, 450);

        let roija = analysis
            .statistics
            .agents
            .iter()
            .find(|a| a.name == "Roija")
            .expect("player stats");
        assert_eq!(roija.damage_dealt, 2700);
    }

    #[test]
    fn boss_alive_at_log_end_is_a_failure() {
        let mut log = LogWriter::new();
        log.boss_species_id = 15438;
        log.player(1000, "Roija", ":Roija.1234", "1");
        log.npc(2000, "Vale Guardian", 15438);
        log.skill(500, "Greatsword Swing");
        log.event(damage(150, 1000, 2000, 500, 1200));
        log.event(state_change(400, 1000, state::EXIT_COMBAT));

        let analysis = LogAnalyzer::new().analyze(&log.bytes()).expect("valid log");
        assert_eq!(analysis.result, EncounterResult::Failure);
    }

    #[test]
    fn unidentified_log_degrades_to_unknown() {
        let mut log = LogWriter::new();
        log.player(1000, "Roija", ":Roija.1234", "1");
        log.npc(2000, "Ambient Rabbit", 12345);
        log.event(damage(150, 1000, 2000, 0, 10));

        let analysis = LogAnalyzer::new().analyze(&log.bytes()).expect("valid log");
        assert_eq!(analysis.encounter_name, None);
        assert_eq!(analysis.result, EncounterResult::Unknown);
    }

    #[test]
    fn reanalysis_of_identical_bytes_is_identical() {
        let bytes = sample_log();
        let analyzer = LogAnalyzer::new();
        let first = analyzer.analyze(&bytes).expect("valid log");
        let second = analyzer.analyze(&bytes).expect("valid log");

        assert_eq!(first.events, second.events);
        assert_eq!(first.result, second.result);
        assert_eq!(first.encounter_name, second.encounter_name);
        assert_eq!(
            first.agents.agents().len(),
            second.agents.agents().len()
        );
        for (a, b) in first.agents.agents().iter().zip(second.agents.agents()) {
            assert_eq!(a, b);
        }
    }
}
