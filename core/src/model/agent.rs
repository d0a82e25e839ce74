//! Typed agents and the interval-indexed agent table.

use std::sync::Arc;

use hashbrown::HashMap;
use tracing::trace;

use crate::evtc::{RawAgent, RawAgentName};

pub type AgentRef = Arc<Agent>;

/// What kind of participant an agent is. Derived from the recorder's
/// packed profession/elite encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentKind {
    Player {
        account: String,
        subgroup: String,
        profession: u32,
        elite_spec: u32,
    },
    Npc {
        species_id: u16,
    },
    Gadget {
        pseudo_id: u16,
    },
}

/// A participant in the recorded encounter.
///
/// Identity is stable within one log; the recorder-assigned `address` is
/// not, and may be reused for a different logical agent outside this
/// agent's `[first_aware, last_aware)` window. The master back-reference
/// is a lookup key into the agent table, never a direct link.
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    pub name: String,
    pub kind: AgentKind,
    pub address: u64,
    /// Validity window, half-open, in log-relative milliseconds.
    pub first_aware: u64,
    pub last_aware: u64,
    /// Address of the owning agent for minions/illusions.
    pub master_address: Option<u64>,
    pub toughness: u16,
    pub concentration: u16,
    pub healing: u16,
    pub condition: u16,
}

impl Agent {
    pub(crate) fn from_raw(raw: &RawAgent, first_aware: u64, last_aware: u64) -> Self {
        let kind = classify(raw.profession, raw.is_elite, &raw.name);
        let name = if raw.name.character.is_empty() {
            String::from("Unknown")
        } else {
            raw.name.character.clone()
        };
        Agent {
            name,
            kind,
            address: raw.address,
            first_aware,
            last_aware,
            master_address: None,
            toughness: raw.toughness,
            concentration: raw.concentration,
            healing: raw.healing,
            condition: raw.condition,
        }
    }

    /// Sentinel returned for references that resolve to no known agent.
    pub fn unknown() -> Agent {
        Agent {
            name: String::from("Unknown"),
            kind: AgentKind::Gadget { pseudo_id: 0 },
            address: 0,
            first_aware: 0,
            last_aware: 0,
            master_address: None,
            toughness: 0,
            concentration: 0,
            healing: 0,
            condition: 0,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.address == 0
    }

    pub fn is_player(&self) -> bool {
        matches!(self.kind, AgentKind::Player { .. })
    }

    pub fn species_id(&self) -> Option<u16> {
        match self.kind {
            AgentKind::Npc { species_id } => Some(species_id),
            _ => None,
        }
    }

    /// Unique key for one agent within one log. Two agents sharing an
    /// address always differ in `first_aware` (their windows are disjoint).
    pub fn key(&self) -> (u64, u64) {
        (self.address, self.first_aware)
    }
}

fn classify(profession: u32, is_elite: u32, name: &RawAgentName) -> AgentKind {
    if is_elite != u32::MAX {
        return AgentKind::Player {
            account: name.account.trim_start_matches(':').to_string(),
            subgroup: name.subgroup.clone(),
            profession,
            elite_spec: is_elite,
        };
    }
    if profession >> 16 == 0xFFFF {
        AgentKind::Gadget {
            pseudo_id: (profession & 0xFFFF) as u16,
        }
    } else {
        AgentKind::Npc {
            species_id: (profession & 0xFFFF) as u16,
        }
    }
}

/// Interval-indexed lookup from recorder address to agents.
///
/// Each address maps to a list of `(window, agent)` pairs ordered by
/// window start; windows for one address never overlap. Resolution picks
/// the window containing the query timestamp by binary search.
#[derive(Debug)]
pub struct AgentTable {
    agents: Vec<AgentRef>,
    by_address: HashMap<u64, Vec<AgentRef>>,
    unknown: AgentRef,
}

impl AgentTable {
    pub(crate) fn new(agents: Vec<AgentRef>) -> Self {
        let mut by_address: HashMap<u64, Vec<AgentRef>> = HashMap::new();
        for agent in &agents {
            by_address
                .entry(agent.address)
                .or_default()
                .push(Arc::clone(agent));
        }
        for windows in by_address.values_mut() {
            windows.sort_by_key(|a| a.first_aware);
        }
        Self {
            agents,
            by_address,
            unknown: Arc::new(Agent::unknown()),
        }
    }

    /// All agents, in agent-table order.
    pub fn agents(&self) -> &[AgentRef] {
        &self.agents
    }

    pub fn unknown(&self) -> AgentRef {
        Arc::clone(&self.unknown)
    }

    /// Resolve an address reference at a timestamp. Falls back to the
    /// sentinel unknown agent when no validity window matches; the log as
    /// a whole is never rejected for a dangling reference.
    pub fn resolve(&self, address: u64, time: u64) -> AgentRef {
        let Some(windows) = self.by_address.get(&address) else {
            trace!(address, time, "reference to unlisted agent address");
            return self.unknown();
        };

        // Last window starting no later than `time`.
        let idx = windows.partition_point(|a| a.first_aware <= time);
        if idx == 0 {
            // Before the first window: events slightly preceding an
            // agent's first occurrence still belong to it.
            return Arc::clone(&windows[0]);
        }
        let candidate = &windows[idx - 1];
        if time < candidate.last_aware || idx == windows.len() {
            // Inside the window, or past the final window (an agent's
            // trailing events are credited to its last incarnation).
            Arc::clone(candidate)
        } else {
            trace!(address, time, "reference falls between validity windows");
            self.unknown()
        }
    }

    /// Resolve the owning master of a minion agent, active at the minion's
    /// own first-aware time. Returns `None` for masterless agents.
    pub fn master_of(&self, agent: &Agent) -> Option<AgentRef> {
        let master_address = agent.master_address?;
        let master = self.resolve(master_address, agent.first_aware);
        (!master.is_unknown()).then_some(master)
    }
}
