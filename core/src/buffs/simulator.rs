//! Buff interval reconstruction
//!
//! Replays the apply/remove events for one (target, skill) pair and
//! produces the stack intervals that were active over time. The event
//! sequence must be the builder's output: sorted by timestamp with ties
//! in raw record order. That stability is a correctness precondition
//! here — applies and removes sharing a timestamp must replay in the
//! order the recorder wrote them.

use hashbrown::HashSet;

use crate::model::{Agent, AgentRef, BuffRemoval, Event, EventKind, SkillRef};

use super::BuffStack;

/// Which open stack a single-stack removal closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StackRemovalOrder {
    /// The stack applied earliest expires first (the default).
    #[default]
    OldestFirst,
    /// The most recently applied stack is removed first.
    NewestFirst,
}

/// Reconstructs [`BuffStack`] intervals from the event timeline.
///
/// Stateless per query; the only configuration is the per-skill removal
/// policy for buffs explicitly marked "remove newest".
#[derive(Debug, Default)]
pub struct BuffSimulator {
    remove_newest: HashSet<u32>,
}

struct OpenStack {
    time_start: u64,
    buff: SkillRef,
    source: Option<AgentRef>,
}

impl BuffSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a skill as closing its newest stack first on single-stack
    /// removals.
    pub fn with_remove_newest(mut self, skill_id: u32) -> Self {
        self.remove_newest.insert(skill_id);
        self
    }

    fn removal_order(&self, skill_id: u32) -> StackRemovalOrder {
        if self.remove_newest.contains(&skill_id) {
            StackRemovalOrder::NewestFirst
        } else {
            StackRemovalOrder::OldestFirst
        }
    }

    /// Reconstruct the stack intervals of `skill_id` on `target`.
    /// Intervals still open when the events run out close at `end_time`
    /// (the log's last timestamp).
    pub fn stacks(
        &self,
        events: &[Event],
        target: &Agent,
        skill_id: u32,
        end_time: u64,
    ) -> Vec<BuffStack> {
        let mut open: Vec<OpenStack> = Vec::new();
        let mut closed: Vec<BuffStack> = Vec::new();
        let order = self.removal_order(skill_id);

        for event in events {
            let on_target = event
                .target
                .as_ref()
                .is_some_and(|a| a.key() == target.key());
            if !on_target {
                continue;
            }

            match &event.kind {
                EventKind::BuffApply { buff, .. } if buff.id == skill_id => {
                    open.push(OpenStack {
                        time_start: event.time,
                        buff: buff.clone(),
                        source: event.source.clone(),
                    });
                }
                EventKind::BuffRemove { buff, removal } if buff.id == skill_id => match removal {
                    BuffRemoval::All => {
                        for stack in open.drain(..) {
                            closed.push(close(stack, event.time));
                        }
                    }
                    BuffRemoval::Single | BuffRemoval::Manual => {
                        let victim = match order {
                            StackRemovalOrder::OldestFirst if !open.is_empty() => Some(open.remove(0)),
                            StackRemovalOrder::NewestFirst => open.pop(),
                            _ => None,
                        };
                        if let Some(stack) = victim {
                            closed.push(close(stack, event.time));
                        }
                        // A remove with nothing open is a recorder artifact
                        // (e.g. a pre-log application); ignore it.
                    }
                },
                _ => {}
            }
        }

        for stack in open {
            closed.push(close(stack, end_time));
        }

        closed.sort_by_key(|s| s.time_start);
        closed
    }
}

fn close(stack: OpenStack, time_end: u64) -> BuffStack {
    BuffStack {
        time_start: stack.time_start,
        time_end,
        buff: stack.buff,
        source: stack.source,
    }
}

/// Total time in `[0, end_time)` during which at least one of the given
/// intervals was active. Overlapping stacks count once.
pub(crate) fn covered_time(stacks: &[BuffStack]) -> u64 {
    let mut total = 0u64;
    let mut covered_until = 0u64;
    for stack in stacks {
        // `stacks` is sorted by start time.
        let start = stack.time_start.max(covered_until);
        if stack.time_end > start {
            total += stack.time_end - start;
            covered_until = stack.time_end;
        }
    }
    total
}
