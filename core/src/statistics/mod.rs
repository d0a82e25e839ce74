//! Statistics aggregation
//!
//! Derives per-agent summary metrics from the event timeline and the
//! reconstructed buff intervals. Purely derived and stateless per call:
//! inputs are never mutated and recomputation yields identical output.

use hashbrown::HashMap;

use crate::buffs::{BuffSimulator, covered_time};
use crate::game_data::profession_name;
use crate::model::{AgentKind, AgentRef, AgentTable, Event, EventKind};


/// Uptime of one tracked buff on one agent.
#[derive(Debug, Clone, serde::Serialize)]
pub struct BuffUptime {
    pub skill_id: u32,
    pub skill_name: String,
    /// Fraction of the encounter during which at least one stack was up.
    pub uptime: f64,
}

/// Summary metrics for one agent.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AgentStatistics {
    pub name: String,
    pub account: Option<String>,
    pub profession: Option<&'static str>,
    pub damage_dealt: i64,
    pub damage_received: i64,
    pub time_downed_ms: u64,
    pub time_dead_ms: u64,
    pub buff_uptimes: Vec<BuffUptime>,
}

/// The full per-log report.
#[derive(Debug, Clone, serde::Serialize)]
pub struct LogStatistics {
    pub duration_ms: u64,
    pub agents: Vec<AgentStatistics>,
}

#[derive(Debug, Default)]
struct Accumulator {
    damage_dealt: i64,
    damage_received: i64,
    time_downed_ms: u64,
    time_dead_ms: u64,
    downed_since: Option<u64>,
    dead_since: Option<u64>,
}

/// Computes [`LogStatistics`]. Configuration is limited to which buffs
/// to report uptime for.
#[derive(Debug, Default)]
pub struct StatisticsCalculator {
    tracked_buffs: Vec<u32>,
}

impl StatisticsCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tracked_buff(mut self, skill_id: u32) -> Self {
        self.tracked_buffs.push(skill_id);
        self
    }

    pub fn calculate(
        &self,
        events: &[Event],
        agents: &AgentTable,
        simulator: &BuffSimulator,
        end_time: u64,
    ) -> LogStatistics {
        let start_time = events.first().map(|e| e.time).unwrap_or(end_time);
        let duration_ms = end_time.saturating_sub(start_time);

        let mut accumulators: HashMap<(u64, u64), Accumulator> = HashMap::new();

        for event in events {
            match &event.kind {
                EventKind::Damage { amount, .. } if *amount > 0 => {
                    if let Some(source) = &event.source {
                        // Minion damage counts for the owner.
                        let credited = agents
                            .master_of(source)
                            .unwrap_or_else(|| source.clone());
                        accumulators.entry(credited.key()).or_default().damage_dealt +=
                            *amount as i64;
                    }
                    if let Some(target) = &event.target {
                        accumulators
                            .entry(target.key())
                            .or_default()
                            .damage_received += *amount as i64;
                    }
                }
                EventKind::ChangeDown => {
                    if let Some(source) = &event.source {
                        let acc = accumulators.entry(source.key()).or_default();
                        acc.downed_since.get_or_insert(event.time);
                    }
                }
                EventKind::ChangeUp => {
                    if let Some(source) = &event.source {
                        let acc = accumulators.entry(source.key()).or_default();
                        if let Some(since) = acc.downed_since.take() {
                            acc.time_downed_ms += event.time.saturating_sub(since);
                        }
                        if let Some(since) = acc.dead_since.take() {
                            acc.time_dead_ms += event.time.saturating_sub(since);
                        }
                    }
                }
                EventKind::ChangeDead => {
                    if let Some(source) = &event.source {
                        let acc = accumulators.entry(source.key()).or_default();
                        if let Some(since) = acc.downed_since.take() {
                            acc.time_downed_ms += event.time.saturating_sub(since);
                        }
                        acc.dead_since.get_or_insert(event.time);
                    }
                }
                _ => {}
            }
        }

        // States still open at log end run to the last timestamp.
        for acc in accumulators.values_mut() {
            if let Some(since) = acc.downed_since.take() {
                acc.time_downed_ms += end_time.saturating_sub(since);
            }
            if let Some(since) = acc.dead_since.take() {
                acc.time_dead_ms += end_time.saturating_sub(since);
            }
        }

        let mut reports = Vec::new();
        for agent in agents.agents() {
            let acc = accumulators.remove(&agent.key()).unwrap_or_default();
            let active = acc.damage_dealt != 0
                || acc.damage_received != 0
                || acc.time_downed_ms != 0
                || acc.time_dead_ms != 0;
            if !agent.is_player() && !active {
                continue;
            }
            reports.push(self.agent_report(agent, acc, events, simulator, duration_ms, end_time));
        }

        LogStatistics {
            duration_ms,
            agents: reports,
        }
    }

    fn agent_report(
        &self,
        agent: &AgentRef,
        acc: Accumulator,
        events: &[Event],
        simulator: &BuffSimulator,
        duration_ms: u64,
        end_time: u64,
    ) -> AgentStatistics {
        let (account, profession) = match &agent.kind {
            AgentKind::Player {
                account,
                profession,
                elite_spec,
                ..
            } => (
                Some(account.clone()),
                Some(profession_name(*profession, *elite_spec)),
            ),
            _ => (None, None),
        };

        let mut buff_uptimes = Vec::with_capacity(self.tracked_buffs.len());
        for &skill_id in &self.tracked_buffs {
            let stacks = simulator.stacks(events, agent, skill_id, end_time);
            let uptime = if duration_ms == 0 {
                0.0
            } else {
                covered_time(&stacks) as f64 / duration_ms as f64
            };
            let skill_name = stacks
                .first()
                .map(|s| s.buff.name.clone())
                .unwrap_or_default();
            buff_uptimes.push(BuffUptime {
                skill_id,
                skill_name,
                uptime,
            });
        }

        AgentStatistics {
            name: agent.name.clone(),
            account,
            profession,
            damage_dealt: acc.damage_dealt,
            damage_received: acc.damage_received,
            time_downed_ms: acc.time_downed_ms,
            time_dead_ms: acc.time_dead_ms,
            buff_uptimes,
        }
    }
}
