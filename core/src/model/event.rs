//! Typed combat events.

use super::agent::AgentRef;
use super::skill::SkillRef;

/// How a buff stack (or all stacks) left its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuffRemoval {
    /// Every stack removed at once (cleanse, death, expiry of the last stack).
    All,
    /// One stack expired by duration.
    Single,
    /// One stack removed out of turn (manual cleanse of a single stack).
    Manual,
}

/// Payload of one typed event.
///
/// The variant set is open-ended: discriminants this build does not
/// understand become [`EventKind::Unknown`] rather than a parse failure,
/// so logs from newer recorders still analyze.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    EnterCombat { subgroup: u64 },
    ExitCombat,
    ChangeUp,
    ChangeDead,
    ChangeDown,
    Spawn,
    Despawn,
    /// New health as a fraction of maximum.
    HealthUpdate { fraction: f64 },
    LogStart { server_time: u32, local_time: u32 },
    LogEnd { server_time: u32, local_time: u32 },
    Reward { reward_id: u64, reward_type: i32 },
    Damage {
        skill: SkillRef,
        amount: i32,
        is_buff_damage: bool,
    },
    BuffApply {
        buff: SkillRef,
        duration_ms: i32,
    },
    BuffRemove {
        buff: SkillRef,
        removal: BuffRemoval,
    },
    SkillCast { skill: SkillRef },
    /// Forward-compatibility variant carrying the raw discriminant.
    Unknown { discriminant: u8 },
}

/// One event on the log timeline. Immutable once built; agents and skills
/// are referenced shared and read-only, never owned.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Log-relative milliseconds. The event sequence is sorted by this
    /// field, stable for ties in raw record order.
    pub time: u64,
    pub source: Option<AgentRef>,
    pub target: Option<AgentRef>,
    pub kind: EventKind,
}

impl Event {
    pub fn is_state_change(&self) -> bool {
        !matches!(
            self.kind,
            EventKind::Damage { .. }
                | EventKind::BuffApply { .. }
                | EventKind::BuffRemove { .. }
                | EventKind::SkillCast { .. }
        )
    }
}
