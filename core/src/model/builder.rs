//! Event model builder
//!
//! Resolves the raw tables and flat event records into the immutable
//! typed object graph: agents with validity windows, shared skills, and
//! the chronologically ordered event sequence.
//!
//! The recorder reuses numeric addresses over a file's lifetime, so raw
//! agent records are bucketed by address and each bucket is assigned a
//! time-ordered partition of the log, split at the address's spawn
//! events. Resolution of an address at a timestamp then selects the
//! partition containing it (see [`AgentTable::resolve`]).

use std::sync::Arc;

use hashbrown::{HashMap, HashSet};
use tracing::debug;

use crate::evtc::{RawCombatItem, RawLog};

use super::agent::{Agent, AgentRef, AgentTable};
use super::event::{BuffRemoval, Event, EventKind};
use super::skill::SkillTable;

mod statechange {
    pub const ENTER_COMBAT: u8 = 1;
    pub const EXIT_COMBAT: u8 = 2;
    pub const CHANGE_UP: u8 = 3;
    pub const CHANGE_DEAD: u8 = 4;
    pub const CHANGE_DOWN: u8 = 5;
    pub const SPAWN: u8 = 6;
    pub const DESPAWN: u8 = 7;
    pub const HEALTH_UPDATE: u8 = 8;
    pub const LOG_START: u8 = 9;
    pub const LOG_END: u8 = 10;
    pub const REWARD: u8 = 17;
    pub const BUFF_INITIAL: u8 = 18;
}

/// Output of the builder: everything downstream analysis works from.
#[derive(Debug)]
pub struct BuiltModel {
    pub agents: AgentTable,
    pub skills: SkillTable,
    /// Sorted by timestamp ascending; ties preserve raw record order.
    pub events: Vec<Event>,
    /// Candidate encounter targets from the header's designated species.
    /// Refined by the encounter identifier.
    pub initial_targets: Vec<AgentRef>,
    /// Timestamp of the last raw record.
    pub end_time: u64,
}

pub struct ModelBuilder;

/// Per-address facts gathered in the pre-scan over raw records.
#[derive(Debug, Default)]
struct AddressScan {
    first_seen: u64,
    last_seen: u64,
    seen: bool,
    spawn_times: Vec<u64>,
}

impl AddressScan {
    fn touch(&mut self, time: u64) {
        if !self.seen {
            self.first_seen = time;
            self.seen = true;
        } else {
            self.first_seen = self.first_seen.min(time);
        }
        self.last_seen = self.last_seen.max(time);
    }
}

impl ModelBuilder {
    pub fn build(raw: &RawLog) -> BuiltModel {
        let end_time = raw.events.iter().map(|e| e.time).max().unwrap_or(0);

        let (scans, instance_owners, minion_links) = pre_scan(&raw.events);
        let agents = build_agents(raw, &scans, &instance_owners, &minion_links, end_time);
        let agents = AgentTable::new(agents);
        let skills = SkillTable::new(&raw.skills);

        let mut events: Vec<Event> = raw
            .events
            .iter()
            .map(|item| classify(item, &agents, &skills))
            .collect();
        // Stable by construction: ties keep raw record order, which the
        // buff simulator relies on.
        events.sort_by_key(|e| e.time);

        let initial_targets = initial_targets(raw.header.boss_species_id, &agents);

        debug!(
            agents = agents.agents().len(),
            events = events.len(),
            targets = initial_targets.len(),
            "built event model"
        );

        BuiltModel {
            agents,
            skills,
            events,
            initial_targets,
            end_time,
        }
    }
}

type InstanceOwners = HashMap<u16, u64>;
/// `(minion address, time of first master-carrying record, master instance id)`
type MinionLinks = Vec<(u64, u64, u16)>;

fn pre_scan(items: &[RawCombatItem]) -> (HashMap<u64, AddressScan>, InstanceOwners, MinionLinks) {
    let mut scans: HashMap<u64, AddressScan> = HashMap::new();
    let mut instance_owners: InstanceOwners = HashMap::new();
    let mut minion_links: MinionLinks = Vec::new();
    let mut linked: HashSet<u64> = HashSet::new();

    for item in items {
        if item.src_agent != 0 {
            scans.entry(item.src_agent).or_default().touch(item.time);
            if item.is_statechange == statechange::SPAWN {
                scans
                    .entry(item.src_agent)
                    .or_default()
                    .spawn_times
                    .push(item.time);
            }
            if item.src_instance_id != 0 && item.src_master_instance_id == 0 {
                instance_owners
                    .entry(item.src_instance_id)
                    .or_insert(item.src_agent);
            }
            if item.src_master_instance_id != 0 && linked.insert(item.src_agent) {
                minion_links.push((item.src_agent, item.time, item.src_master_instance_id));
            }
        }
        // Destination is only an agent reference on plain combat records;
        // statechange records overload the field as payload.
        if item.is_statechange == 0 && item.dst_agent != 0 {
            scans.entry(item.dst_agent).or_default().touch(item.time);
            if item.dst_instance_id != 0 && item.dst_master_instance_id == 0 {
                instance_owners
                    .entry(item.dst_instance_id)
                    .or_insert(item.dst_agent);
            }
        }
    }

    // Raw records are not guaranteed to be in time order; partition
    // boundaries must be monotonic or windows overlap.
    for scan in scans.values_mut() {
        scan.spawn_times.sort_unstable();
    }

    (scans, instance_owners, minion_links)
}

fn build_agents(
    raw: &RawLog,
    scans: &HashMap<u64, AddressScan>,
    instance_owners: &InstanceOwners,
    minion_links: &MinionLinks,
    end_time: u64,
) -> Vec<AgentRef> {
    // Bucket raw records by address, preserving table order within each
    // bucket, and remember the original table position of every record so
    // output order stays stable.
    let mut bucket_order: Vec<u64> = Vec::new();
    let mut buckets: HashMap<u64, Vec<usize>> = HashMap::new();
    for (idx, agent) in raw.agents.iter().enumerate() {
        let bucket = buckets.entry(agent.address).or_default();
        if bucket.is_empty() {
            bucket_order.push(agent.address);
        }
        bucket.push(idx);
    }

    let mut agents: Vec<Agent> = vec![Agent::unknown(); raw.agents.len()];
    for address in bucket_order {
        let bucket = &buckets[&address];
        let scan = scans.get(&address);

        if bucket.len() == 1 {
            let (first, last) = match scan {
                Some(s) if s.seen => (s.first_seen, s.last_seen + 1),
                _ => (0, 0),
            };
            agents[bucket[0]] = Agent::from_raw(&raw.agents[bucket[0]], first, last);
            continue;
        }

        // Reused address: partition the timeline at the address's spawn
        // events. Record i owns [boundary(i), boundary(i+1)); missing
        // boundaries collapse to zero-width windows at the log end, so
        // windows stay pairwise disjoint.
        let spawns: &[u64] = scan.map(|s| s.spawn_times.as_slice()).unwrap_or(&[]);
        let mut boundaries = Vec::with_capacity(bucket.len() + 1);
        boundaries.push(0u64);
        for i in 1..bucket.len() {
            boundaries.push(spawns.get(i - 1).copied().unwrap_or(end_time + 1));
        }
        boundaries.push(end_time + 1);

        for (i, &record_idx) in bucket.iter().enumerate() {
            agents[record_idx] =
                Agent::from_raw(&raw.agents[record_idx], boundaries[i], boundaries[i + 1]);
        }
    }

    // Minion/master linking: resolve the master's instance id to an
    // address and attach it to the minion incarnation active at the time
    // of the minion's first master-carrying record. A lookup key only;
    // master lifetime stays independent.
    for &(minion_address, time, master_instance) in minion_links {
        let Some(&master_address) = instance_owners.get(&master_instance) else {
            continue;
        };
        if master_address == minion_address {
            continue;
        }
        if let Some(minion) = agents.iter_mut().find(|a| {
            a.address == minion_address
                && a.master_address.is_none()
                && (a.first_aware..a.last_aware.max(a.first_aware + 1)).contains(&time)
        }) {
            minion.master_address = Some(master_address);
        }
    }

    agents.into_iter().map(Arc::new).collect()
}

fn classify(item: &RawCombatItem, agents: &AgentTable, skills: &SkillTable) -> Event {
    let resolve = |address: u64| -> Option<AgentRef> {
        (address != 0).then(|| agents.resolve(address, item.time))
    };

    let source = resolve(item.src_agent);

    let (kind, source, target) = match item.is_statechange {
        0 => {
            if item.is_activation != 0 {
                let kind = EventKind::SkillCast {
                    skill: skills.resolve(item.skill_id),
                };
                (kind, source, None)
            } else if item.is_buff_remove != 0 {
                // Buff removes are recorded owner-in-source: the agent
                // losing the buff sits in `src_agent`, the remover in
                // `dst_agent`. Flip so `target` is the buff owner.
                let kind = EventKind::BuffRemove {
                    buff: skills.resolve(item.skill_id),
                    removal: match item.is_buff_remove {
                        1 => BuffRemoval::All,
                        2 => BuffRemoval::Single,
                        _ => BuffRemoval::Manual,
                    },
                };
                (kind, resolve(item.dst_agent), source)
            } else if item.buff != 0 && item.buff_dmg == 0 {
                let kind = EventKind::BuffApply {
                    buff: skills.resolve(item.skill_id),
                    duration_ms: item.value,
                };
                (kind, source, resolve(item.dst_agent))
            } else {
                let kind = EventKind::Damage {
                    skill: skills.resolve(item.skill_id),
                    amount: if item.buff != 0 {
                        item.buff_dmg
                    } else {
                        item.value
                    },
                    is_buff_damage: item.buff != 0,
                };
                (kind, source, resolve(item.dst_agent))
            }
        }
        statechange::ENTER_COMBAT => (
            EventKind::EnterCombat {
                subgroup: item.dst_agent,
            },
            source,
            None,
        ),
        statechange::EXIT_COMBAT => (EventKind::ExitCombat, source, None),
        statechange::CHANGE_UP => (EventKind::ChangeUp, source, None),
        statechange::CHANGE_DEAD => (EventKind::ChangeDead, source, None),
        statechange::CHANGE_DOWN => (EventKind::ChangeDown, source, None),
        statechange::SPAWN => (EventKind::Spawn, source, None),
        statechange::DESPAWN => (EventKind::Despawn, source, None),
        statechange::HEALTH_UPDATE => (
            EventKind::HealthUpdate {
                fraction: item.dst_agent as f64 / 10_000.0,
            },
            source,
            None,
        ),
        statechange::LOG_START => (
            EventKind::LogStart {
                server_time: item.value as u32,
                local_time: item.buff_dmg as u32,
            },
            None,
            None,
        ),
        statechange::LOG_END => (
            EventKind::LogEnd {
                server_time: item.value as u32,
                local_time: item.buff_dmg as u32,
            },
            None,
            None,
        ),
        statechange::REWARD => (
            EventKind::Reward {
                reward_id: item.dst_agent,
                reward_type: item.value,
            },
            source,
            None,
        ),
        statechange::BUFF_INITIAL => (
            EventKind::BuffApply {
                buff: skills.resolve(item.skill_id),
                duration_ms: item.value,
            },
            source,
            resolve(item.dst_agent),
        ),
        discriminant => {
            // Forward compatibility: keep timestamp/source/target so
            // downstream consumers can count what they cannot interpret.
            (
                EventKind::Unknown { discriminant },
                source,
                resolve(item.dst_agent),
            )
        }
    };

    Event {
        time: item.time,
        source,
        target,
        kind,
    }
}

fn initial_targets(boss_species_id: u16, agents: &AgentTable) -> Vec<AgentRef> {
    if boss_species_id == 0 {
        return Vec::new();
    }
    agents
        .agents()
        .iter()
        .filter(|a| a.species_id() == Some(boss_species_id))
        .cloned()
        .collect()
}
