//! Encounter result determination
//!
//! A family of pluggable strategies classifying the outcome of a log from
//! its event sequence. Every determiner is a pure function of the events:
//! no hidden state, reentrant, safe to share read-only across logs being
//! processed concurrently. Determiners never fail; when a signal is
//! absent they degrade to `Unknown`.

use thiserror::Error;

use crate::model::{AgentRef, Event, EventKind};

use super::EncounterResult;

/// Programmer error constructing a determiner. Raised at construction
/// time, never during evaluation.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid determiner configuration: {0}")]
pub struct InvalidConfiguration(pub &'static str);

pub trait ResultDeterminer: Send + Sync {
    fn result(&self, events: &[Event]) -> EncounterResult;
}

/// Always returns the same result. Used for encounters with no reliable
/// terminating signal.
pub struct ConstantResultDeterminer(pub EncounterResult);

impl ResultDeterminer for ConstantResultDeterminer {
    fn result(&self, _events: &[Event]) -> EncounterResult {
        self.0
    }
}

/// Success when the given agent died, failure otherwise.
pub struct AgentDeathResultDeterminer {
    agent: AgentRef,
}

impl AgentDeathResultDeterminer {
    pub fn new(agent: AgentRef) -> Self {
        Self { agent }
    }
}

impl ResultDeterminer for AgentDeathResultDeterminer {
    fn result(&self, events: &[Event]) -> EncounterResult {
        let died = events.iter().any(|e| {
            matches!(e.kind, EventKind::ChangeDead)
                && e.source.as_ref().is_some_and(|a| a.key() == self.agent.key())
        });
        if died {
            EncounterResult::Success
        } else {
            EncounterResult::Failure
        }
    }
}

/// Failure when the agent's last reported health is above a threshold
/// fraction at log end; unknown when it is not, or when the log carries
/// no health data for the agent.
pub struct AgentHealthResultDeterminer {
    agent: AgentRef,
    threshold: f64,
}

impl AgentHealthResultDeterminer {
    pub fn new(agent: AgentRef, threshold: f64) -> Self {
        Self { agent, threshold }
    }
}

impl ResultDeterminer for AgentHealthResultDeterminer {
    fn result(&self, events: &[Event]) -> EncounterResult {
        let last_health = events
            .iter()
            .rev()
            .find_map(|e| match e.kind {
                EventKind::HealthUpdate { fraction }
                    if e.source.as_ref().is_some_and(|a| a.key() == self.agent.key()) =>
                {
                    Some(fraction)
                }
                _ => None,
            });
        match last_health {
            Some(fraction) if fraction > self.threshold => EncounterResult::Failure,
            _ => EncounterResult::Unknown,
        }
    }
}

/// Success when the agent leaves combat and never re-enters it. Used for
/// bosses that despawn rather than die on a kill.
pub struct AgentExitCombatDeterminer {
    agent: AgentRef,
}

impl AgentExitCombatDeterminer {
    pub fn new(agent: AgentRef) -> Self {
        Self { agent }
    }
}

impl ResultDeterminer for AgentExitCombatDeterminer {
    fn result(&self, events: &[Event]) -> EncounterResult {
        let mut in_combat_signal = None;
        for event in events {
            let ours = event
                .source
                .as_ref()
                .is_some_and(|a| a.key() == self.agent.key());
            if !ours {
                continue;
            }
            match event.kind {
                EventKind::ExitCombat => in_combat_signal = Some(false),
                EventKind::EnterCombat { .. } => in_combat_signal = Some(true),
                _ => {}
            }
        }
        match in_combat_signal {
            Some(false) => EncounterResult::Success,
            _ => EncounterResult::Unknown,
        }
    }
}

/// Success when the log contains an encounter reward chest.
pub struct RewardResultDeterminer;

impl ResultDeterminer for RewardResultDeterminer {
    fn result(&self, events: &[Event]) -> EncounterResult {
        let rewarded = events
            .iter()
            .any(|e| matches!(e.kind, EventKind::Reward { .. }));
        if rewarded {
            EncounterResult::Success
        } else {
            EncounterResult::Unknown
        }
    }
}

/// Combines the results of multiple determiners: success if all succeed,
/// unknown if any is unknown, and failure otherwise.
///
/// Unknown dominating mixed success/failure combinations is an
/// intentional domain policy: when determiners disagree, a cautious
/// "don't know" beats a false negative.
pub struct CombinedResultDeterminer {
    determiners: Vec<Box<dyn ResultDeterminer>>,
}

impl CombinedResultDeterminer {
    pub fn new(
        determiners: Vec<Box<dyn ResultDeterminer>>,
    ) -> Result<Self, InvalidConfiguration> {
        if determiners.is_empty() {
            return Err(InvalidConfiguration(
                "at least one determiner has to be provided",
            ));
        }
        Ok(Self { determiners })
    }
}

impl ResultDeterminer for CombinedResultDeterminer {
    fn result(&self, events: &[Event]) -> EncounterResult {
        let results: Vec<EncounterResult> =
            self.determiners.iter().map(|d| d.result(events)).collect();

        if results.iter().all(|r| *r == EncounterResult::Success) {
            EncounterResult::Success
        } else if results.iter().any(|r| *r == EncounterResult::Unknown) {
            EncounterResult::Unknown
        } else {
            EncounterResult::Failure
        }
    }
}
